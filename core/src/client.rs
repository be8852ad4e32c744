//! Stateless HTTP request builder and response parser for the social API.
//!
//! # Design
//! `SocialClient` holds only the base URL and the feed settings and carries
//! no mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`. Credentials are passed per call; the client never
//! reads storage itself.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::credentials::Credentials;
use crate::error::{ApiError, GENERIC_ERROR_MESSAGE};
use crate::feed::PageCursor;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ApiKey, CreatePost, Envelope, LoginUser, Meta, Post, Profile, RegisterUser, UpdatePost};

/// Provider-specific API key header.
pub const API_KEY_HEADER: &str = "x-noroff-api-key";

/// One page of the feed as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub meta: Meta,
}

/// Synchronous, stateless client for the social API.
#[derive(Debug, Clone)]
pub struct SocialClient {
    base_url: String,
    tag: String,
    page_limit: u32,
}

impl SocialClient {
    /// `tag` scopes the feed to this application's posts.
    pub fn new(base_url: &str, tag: &str, page_limit: u32) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            tag: tag.to_string(),
            page_limit: page_limit.max(1),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    // -- auth --------------------------------------------------------------

    pub fn build_register(&self, input: &RegisterUser) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/auth/register", self.base_url),
            headers: json_headers(),
            body: Some(encode(input)?),
        })
    }

    pub fn build_login(&self, input: &LoginUser) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/auth/login", self.base_url),
            headers: json_headers(),
            body: Some(encode(input)?),
        })
    }

    /// Needs only the bearer token; the key does not exist yet.
    pub fn build_create_api_key(&self, token: &str) -> HttpRequest {
        let mut headers = json_headers();
        headers.push(("authorization".to_string(), format!("Bearer {token}")));
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/auth/create-api-key", self.base_url),
            headers,
            body: Some("{}".to_string()),
        }
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<Profile, ApiError> {
        check_success(&response)?;
        parse_data(&response)
    }

    /// The token, when present, is read from `data.accessToken` only.
    pub fn parse_login(&self, response: HttpResponse) -> Result<Profile, ApiError> {
        check_success(&response)?;
        parse_data(&response)
    }

    pub fn parse_create_api_key(&self, response: HttpResponse) -> Result<ApiKey, ApiError> {
        check_success(&response)?;
        parse_data(&response)
    }

    // -- posts -------------------------------------------------------------

    pub fn build_list_posts(&self, credentials: &Credentials, cursor: PageCursor) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!(
                "{}/social/posts?limit={}&page={}&_tag={}&_author=true",
                self.base_url,
                self.page_limit,
                cursor.page(),
                urlencoding::encode(&self.tag),
            ),
            headers: auth_headers(credentials),
            body: None,
        }
    }

    pub fn build_get_post(&self, credentials: &Credentials, id: u64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/social/posts/{id}?_author=true&_comments=true", self.base_url),
            headers: auth_headers(credentials),
            body: None,
        }
    }

    pub fn build_create_post(&self, credentials: &Credentials, input: &CreatePost) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/social/posts", self.base_url),
            headers: auth_headers(credentials),
            body: Some(encode(input)?),
        })
    }

    pub fn build_update_post(
        &self,
        credentials: &Credentials,
        id: u64,
        input: &UpdatePost,
    ) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: format!("{}/social/posts/{id}", self.base_url),
            headers: auth_headers(credentials),
            body: Some(encode(input)?),
        })
    }

    pub fn build_delete_post(&self, credentials: &Credentials, id: u64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/social/posts/{id}", self.base_url),
            headers: auth_headers(credentials),
            body: None,
        }
    }

    pub fn parse_list_posts(&self, response: HttpResponse) -> Result<PostPage, ApiError> {
        check_success(&response)?;
        let envelope: Envelope<Vec<Post>> = decode(&response.body)?;
        Ok(PostPage {
            posts: envelope.data,
            meta: envelope.meta,
        })
    }

    pub fn parse_get_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        check_success(&response)?;
        parse_data(&response)
    }

    pub fn parse_create_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        check_success(&response)?;
        parse_data(&response)
    }

    pub fn parse_update_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        check_success(&response)?;
        parse_data(&response)
    }

    /// Deletion succeeds on exactly 204.
    pub fn parse_delete_post(&self, response: HttpResponse) -> Result<(), ApiError> {
        if response.status == 204 {
            return Ok(());
        }
        Err(request_error(&response))
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn auth_headers(credentials: &Credentials) -> Vec<(String, String)> {
    let mut headers = json_headers();
    headers.push(("authorization".to_string(), format!("Bearer {}", credentials.token)));
    headers.push((API_KEY_HEADER.to_string(), credentials.api_key.clone()));
    headers
}

fn encode<T: Serialize>(input: &T) -> Result<String, ApiError> {
    serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

fn parse_data<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    let envelope: Envelope<T> = decode(&response.body)?;
    Ok(envelope.data)
}

fn check_success(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(request_error(response))
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorItem>,
}

#[derive(Deserialize)]
struct ErrorItem {
    #[serde(default)]
    message: Option<String>,
}

/// Build a `Request` error from the first server-supplied message, if any.
fn request_error(response: &HttpResponse) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .and_then(|body| body.errors.into_iter().find_map(|e| e.message))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
    ApiError::Request {
        status: response.status,
        message,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::types::Media;

    fn client() -> SocialClient {
        SocialClient::new("http://localhost:3000", "feed", 12)
    }

    fn creds() -> Credentials {
        Credentials {
            token: "tok".to_string(),
            api_key: "key".to_string(),
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = SocialClient::new("http://localhost:3000/", "feed", 12);
        let req = client.build_get_post(&creds(), 1);
        assert!(req.path.starts_with("http://localhost:3000/social/posts/1"));
    }

    #[test]
    fn authenticated_requests_carry_bearer_and_api_key() {
        let req = client().build_delete_post(&creds(), 9);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/social/posts/9");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("authorization"), Some("Bearer tok"));
        assert_eq!(req.header(API_KEY_HEADER), Some("key"));
        assert!(req.body.is_none());
    }

    #[test]
    fn login_is_unauthenticated() {
        let input = LoginUser {
            email: "a@stud.noroff.no".to_string(),
            password: "password1".to_string(),
        };
        let req = client().build_login(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/auth/login");
        assert!(req.header("authorization").is_none());
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["email"], "a@stud.noroff.no");
    }

    #[test]
    fn list_request_carries_page_and_tag() {
        let req = client().build_list_posts(&creds(), PageCursor::at(3));
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.path,
            "http://localhost:3000/social/posts?limit=12&page=3&_tag=feed&_author=true"
        );
    }

    #[test]
    fn list_request_encodes_tag() {
        let client = SocialClient::new("http://localhost:3000", "my feed", 5);
        let req = client.build_list_posts(&creds(), PageCursor::first());
        assert!(req.path.contains("_tag=my%20feed"));
    }

    #[test]
    fn get_request_includes_author_and_comments() {
        let req = client().build_get_post(&creds(), 4);
        assert_eq!(
            req.path,
            "http://localhost:3000/social/posts/4?_author=true&_comments=true"
        );
    }

    #[test]
    fn create_body_has_created_and_update_body_does_not() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let input = CreatePost {
            title: "Hello".to_string(),
            body: "World".to_string(),
            tags: vec!["feed".to_string(), "Oslo".to_string()],
            media: Some(Media {
                url: "https://img.example/x.jpg".to_string(),
                alt: Some("x".to_string()),
            }),
            created,
        };
        let req = client().build_create_post(&creds(), &input).unwrap();
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["tags"][1], "Oslo");
        assert_eq!(body["media"]["url"], "https://img.example/x.jpg");
        assert!(body.get("created").is_some());

        let update = UpdatePost {
            title: "Hello".to_string(),
            body: "World".to_string(),
            tags: vec!["feed".to_string()],
            media: None,
        };
        let req = client().build_update_post(&creds(), 2, &update).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/social/posts/2");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert!(body.get("created").is_none());
    }

    #[test]
    fn parse_list_reads_data_and_meta() {
        let body = r#"{"data":[{"id":1,"title":"a"},{"id":2,"title":"b"}],"meta":{"isLastPage":true,"currentPage":2}}"#;
        let page = client().parse_list_posts(response(200, body)).unwrap();
        assert_eq!(page.posts.len(), 2);
        assert!(page.meta.is_last_page);
    }

    #[test]
    fn parse_login_reads_nested_token() {
        let body = r#"{"data":{"name":"kari","email":"kari@stud.noroff.no","accessToken":"abc"},"meta":{}}"#;
        let profile = client().parse_login(response(200, body)).unwrap();
        assert_eq!(profile.access_token.as_deref(), Some("abc"));
    }

    #[test]
    fn parse_login_ignores_top_level_token() {
        let body = r#"{"accessToken":"abc","data":{"name":"kari","email":"kari@stud.noroff.no"}}"#;
        let profile = client().parse_login(response(200, body)).unwrap();
        assert!(profile.access_token.is_none());
    }

    #[test]
    fn error_uses_server_message() {
        let body = r#"{"errors":[{"message":"Invalid email or password"}],"status":"Unauthorized","statusCode":401}"#;
        let err = client().parse_login(response(401, body)).unwrap_err();
        match err {
            ApiError::Request { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid email or password");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn error_falls_back_to_generic_message() {
        let err = client().parse_get_post(response(500, "<html>oops</html>")).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Request { status: 500, ref message } if message == GENERIC_ERROR_MESSAGE
        ));
    }

    #[test]
    fn delete_requires_204() {
        assert!(client().parse_delete_post(response(204, "")).is_ok());
        let err = client().parse_delete_post(response(200, "")).unwrap_err();
        assert!(matches!(err, ApiError::Request { status: 200, .. }));
    }

    #[test]
    fn bad_json_is_a_deserialization_error() {
        let err = client().parse_get_post(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
