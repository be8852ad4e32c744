//! Domain DTOs for the social API.
//!
//! # Design
//! These mirror the provider's JSON (camelCase, payloads wrapped in `data`).
//! Fields the provider may omit or null are `Option`, or default when absent
//! and read `null` as that default, so a sparse record always deserializes; display defaults are applied later
//! by the view layer, never here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Reads `null` the same as an absent field: the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Provider envelope: every payload sits under `data`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub meta: Meta,
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default)]
    pub is_first_page: bool,
    #[serde(default)]
    pub is_last_page: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Media {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Counts {
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reactions: u32,
}

/// A post as returned by the API. The client only holds transient copies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "tags_or_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub media: Option<Media>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
    #[serde(rename = "_count", default)]
    pub count: Option<Counts>,
}

/// `null` tags read as none; `null` entries read as blank labels so the
/// location keeps its index.
fn tags_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(tags
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

impl Post {
    /// Index 1 of `tags` holds the location label by convention.
    pub fn location(&self) -> Option<&str> {
        self.tags
            .get(1)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn reaction_count(&self) -> u32 {
        self.count.as_ref().map(|c| c.reactions).unwrap_or(0)
    }
}

/// Payload for `POST /social/posts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatePost {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
    pub created: DateTime<Utc>,
}

/// Payload for `PUT /social/posts/{id}`; same shape as create minus `created`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdatePost {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
}

/// Payload for `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Payload for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginUser {
    pub email: String,
    pub password: String,
}

/// Profile returned by register and login. Only login carries a token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Payload of `POST /auth/create-api-key`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKey {
    pub name: String,
    pub key: String,
}
