//! In-memory stand-in for the social API.
//!
//! Mirrors the provider's shapes: payloads under `data`, list pagination in
//! `meta`, failures as `{"errors":[{"message":..}]}`. Every `/social` route
//! requires a bearer token from `/auth/login` and a key from
//! `/auth/create-api-key` (or the seeded one).

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

pub const API_KEY_HEADER: &str = "x-noroff-api-key";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Media {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Counts {
    pub comments: u32,
    pub reactions: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: Option<String>,
    pub tags: Vec<String>,
    pub media: Option<Media>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub author: Author,
    #[serde(rename = "_count")]
    pub count: Counts,
}

#[derive(Deserialize)]
pub struct Register {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct PostInput {
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub media: Option<Media>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub page: Option<usize>,
    #[serde(rename = "_tag")]
    pub tag: Option<String>,
}

struct User {
    name: String,
    email: String,
    password: String,
}

#[derive(Default)]
pub struct Store {
    users: HashMap<String, User>,
    tokens: HashMap<String, String>,
    api_keys: HashSet<String>,
    posts: BTreeMap<u64, Post>,
    next_id: u64,
    next_secret: u64,
}

impl Store {
    fn secret(&mut self, prefix: &str) -> String {
        self.next_secret += 1;
        format!("{prefix}-{:08x}", self.next_secret)
    }
}

pub type Db = Arc<RwLock<Store>>;

type Failure = (StatusCode, Json<Value>);
type ApiResult<T> = Result<T, Failure>;

fn failure(status: StatusCode, message: &str) -> Failure {
    (
        status,
        Json(json!({
            "errors": [{ "message": message }],
            "status": status.canonical_reason().unwrap_or_default(),
            "statusCode": status.as_u16(),
        })),
    )
}

fn data<T: Serialize>(value: T) -> Json<Value> {
    Json(json!({ "data": value, "meta": {} }))
}

pub fn app() -> Router {
    app_with_api_key(None)
}

/// Router whose store already accepts `api_key`.
pub fn app_with_api_key(api_key: Option<String>) -> Router {
    let mut store = Store::default();
    store.api_keys.extend(api_key);
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/create-api-key", post(create_api_key))
        .route("/social/posts", get(list_posts).post(create_post))
        .route("/social/posts/{id}", get(get_post).put(update_post).delete(delete_post))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Email of the caller, or 401.
fn authenticate(store: &Store, headers: &HeaderMap) -> ApiResult<String> {
    let token = bearer(headers).ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "Missing authorization header"))?;
    store
        .tokens
        .get(token)
        .cloned()
        .ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "Invalid authorization token"))
}

fn authorize(store: &Store, headers: &HeaderMap) -> ApiResult<String> {
    let email = authenticate(store, headers)?;
    let key = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "No API key header was found"))?;
    if !store.api_keys.contains(key) {
        return Err(failure(StatusCode::UNAUTHORIZED, "Invalid API key"));
    }
    Ok(email)
}

async fn register(State(db): State<Db>, Json(input): Json<Register>) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut store = db.write().await;
    if store.users.contains_key(&input.email) {
        return Err(failure(StatusCode::BAD_REQUEST, "Profile already exists"));
    }
    let profile = json!({ "name": input.name, "email": input.email });
    store.users.insert(
        input.email.clone(),
        User {
            name: input.name,
            email: input.email,
            password: input.password,
        },
    );
    info!(email = %profile["email"], "registered");
    Ok((StatusCode::CREATED, data(profile)))
}

async fn login(State(db): State<Db>, Json(input): Json<Login>) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let (name, email) = match store.users.get(&input.email) {
        Some(user) if user.password == input.password => (user.name.clone(), user.email.clone()),
        _ => return Err(failure(StatusCode::UNAUTHORIZED, "Invalid email or password")),
    };
    let token = store.secret("token");
    store.tokens.insert(token.clone(), email.clone());
    debug!(%email, "issued token");
    Ok(data(json!({ "name": name, "email": email, "accessToken": token })))
}

async fn create_api_key(State(db): State<Db>, headers: HeaderMap) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut store = db.write().await;
    authenticate(&store, &headers)?;
    let key = store.secret("key");
    store.api_keys.insert(key.clone());
    Ok((
        StatusCode::CREATED,
        data(json!({ "name": "API Key", "status": "ACTIVE", "key": key })),
    ))
}

async fn list_posts(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    authorize(&store, &headers)?;

    let limit = query.limit.unwrap_or(100).max(1);
    let page = query.page.unwrap_or(1).max(1);
    let matching: Vec<&Post> = store
        .posts
        .values()
        .rev()
        .filter(|p| query.tag.as_ref().map_or(true, |tag| p.tags.contains(tag)))
        .collect();

    let total = matching.len();
    let page_count = total.div_ceil(limit).max(1);
    let offset = page.saturating_sub(1).saturating_mul(limit);
    let posts: Vec<&Post> = matching.into_iter().skip(offset).take(limit).collect();
    let is_last_page = page >= page_count;
    let previous_page = (page > 1).then(|| page - 1);
    let next_page = (!is_last_page).then(|| page + 1);

    Ok(Json(json!({
        "data": posts,
        "meta": {
            "isFirstPage": page == 1,
            "isLastPage": is_last_page,
            "currentPage": page,
            "previousPage": previous_page,
            "nextPage": next_page,
            "pageCount": page_count,
            "totalCount": total,
        }
    })))
}

async fn get_post(State(db): State<Db>, headers: HeaderMap, Path(id): Path<u64>) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    authorize(&store, &headers)?;
    store
        .posts
        .get(&id)
        .map(data)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "No post with such ID"))
}

async fn create_post(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<PostInput>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut store = db.write().await;
    let email = authorize(&store, &headers)?;
    let name = store.users.get(&email).map(|u| u.name.clone()).unwrap_or_default();

    store.next_id += 1;
    let now = Utc::now();
    let post = Post {
        id: store.next_id,
        title: input.title,
        body: input.body,
        tags: input.tags,
        media: input.media,
        created: input.created.unwrap_or(now),
        updated: now,
        author: Author { name, email },
        count: Counts::default(),
    };
    store.posts.insert(post.id, post.clone());
    Ok((StatusCode::CREATED, data(post)))
}

async fn update_post(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(input): Json<PostInput>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let email = authorize(&store, &headers)?;
    let post = store
        .posts
        .get_mut(&id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "No post with such ID"))?;
    if post.author.email != email {
        return Err(failure(StatusCode::FORBIDDEN, "You are not the owner of this post"));
    }
    post.title = input.title;
    post.body = input.body;
    post.tags = input.tags;
    post.media = input.media;
    post.updated = Utc::now();
    Ok(data(post.clone()))
}

async fn delete_post(State(db): State<Db>, headers: HeaderMap, Path(id): Path<u64>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    let email = authorize(&store, &headers)?;
    let owner = store
        .posts
        .get(&id)
        .map(|p| p.author.email.clone())
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "No post with such ID"))?;
    if owner != email {
        return Err(failure(StatusCode::FORBIDDEN, "You are not the owner of this post"));
    }
    store.posts.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_serializes_count_with_underscore() {
        let now = Utc::now();
        let post = Post {
            id: 1,
            title: "Test".to_string(),
            body: None,
            tags: vec!["feed".to_string()],
            media: None,
            created: now,
            updated: now,
            author: Author {
                name: "kari".to_string(),
                email: "kari@stud.noroff.no".to_string(),
            },
            count: Counts::default(),
        };
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["_count"]["reactions"], 0);
        assert_eq!(json["author"]["name"], "kari");
        assert!(json["body"].is_null());
    }

    #[test]
    fn post_input_defaults_optional_fields() {
        let input: PostInput = serde_json::from_str(r#"{"title":"Only a title"}"#).unwrap();
        assert_eq!(input.title, "Only a title");
        assert!(input.tags.is_empty());
        assert!(input.media.is_none());
        assert!(input.created.is_none());
    }

    #[test]
    fn post_input_rejects_missing_title() {
        let result: Result<PostInput, _> = serde_json::from_str(r#"{"body":"no title"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn failure_body_matches_provider_shape() {
        let (status, Json(body)) = failure(StatusCode::NOT_FOUND, "No post with such ID");
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errors"][0]["message"], "No post with such ID");
        assert_eq!(body["statusCode"], 404);
    }

    #[test]
    fn secrets_are_unique() {
        let mut store = Store::default();
        assert_ne!(store.secret("token"), store.secret("token"));
    }
}
