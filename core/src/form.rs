//! Form state for the register, login and post flows.
//!
//! # Design
//! Forms are plain values owned by the caller. The post form carries its own
//! `FormMode`, so which operation a submit performs is decided by data, not
//! by whichever handler happens to be bound.

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::types::{CreatePost, LoginUser, Media, Post, RegisterUser, UpdatePost};
use crate::validate;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    /// Name, then email, then password; the first failure wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::name(&self.name)?;
        validate::email(&self.email)?;
        validate::password(&self.password)
    }

    pub fn to_request(&self) -> RegisterUser {
        RegisterUser {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::required("Email", &self.email)?;
        validate::required("Password", &self.password)
    }

    pub fn to_request(&self) -> LoginUser {
        LoginUser {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

/// Which operation submitting the post form performs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Create,
    Edit {
        id: u64,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub mode: FormMode,
    pub title: String,
    pub body: String,
    pub media_url: String,
    pub media_alt: String,
    pub location: String,
}

impl PostForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the fields from `post` and switch to edit mode.
    pub fn begin_edit(&mut self, post: &Post) {
        let (media_url, media_alt) = match &post.media {
            Some(media) => (media.url.clone(), media.alt.clone().unwrap_or_default()),
            None => (String::new(), String::new()),
        };
        *self = Self {
            mode: FormMode::Edit { id: post.id },
            title: post.title.clone(),
            body: post.body.clone().unwrap_or_default(),
            media_url,
            media_alt,
            location: post.location().unwrap_or_default().to_string(),
        };
    }

    /// Clear all fields and return to create mode.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::required("Title", &self.title)?;
        validate::media_url(&self.media_url)
    }

    /// `tag` goes first so the post shows up in the feed; the location follows.
    fn tags(&self, tag: &str) -> Vec<String> {
        let mut tags = vec![tag.to_string()];
        let location = self.location.trim();
        if !location.is_empty() {
            tags.push(location.to_string());
        }
        tags
    }

    fn media(&self) -> Option<Media> {
        let url = self.media_url.trim();
        if url.is_empty() {
            return None;
        }
        let alt = self.media_alt.trim();
        Some(Media {
            url: url.to_string(),
            alt: (!alt.is_empty()).then(|| alt.to_string()),
        })
    }

    pub fn to_create(&self, tag: &str, created: DateTime<Utc>) -> CreatePost {
        CreatePost {
            title: self.title.trim().to_string(),
            body: self.body.trim().to_string(),
            tags: self.tags(tag),
            media: self.media(),
            created,
        }
    }

    pub fn to_update(&self, tag: &str) -> UpdatePost {
        UpdatePost {
            title: self.title.trim().to_string(),
            body: self.body.trim().to_string(),
            tags: self.tags(tag),
            media: self.media(),
        }
    }
}
