//! Declarative view models for the feed and the detail page.
//!
//! # Design
//! Rendering is reduced to plain field values. Every optional post field is
//! replaced by its own default independently, so any record produces a
//! complete card. A rendering layer only copies these values into markup.

use crate::types::Post;

pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder.jpg";
pub const DEFAULT_AUTHOR: &str = "Anonymous";
pub const DEFAULT_BODY: &str = "No content";
pub const DEFAULT_LOCATION: &str = "Unknown";
pub const DEFAULT_TITLE: &str = "Untitled";

const DATE_FORMAT: &str = "%d.%m.%Y";

/// One card in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub id: u64,
    pub title: String,
    pub image_url: String,
    pub image_alt: String,
    pub author: String,
    pub body: String,
    pub location: String,
    pub created: String,
    pub reactions: u32,
    /// Navigation target when the card is clicked.
    pub href: String,
}

impl PostCard {
    pub fn from_post(post: &Post) -> Self {
        let fields = Fields::of(post);
        Self {
            id: post.id,
            href: detail_href(post.id),
            title: fields.title,
            image_url: fields.image_url,
            image_alt: fields.image_alt,
            author: fields.author,
            body: fields.body,
            location: fields.location,
            created: fields.created,
            reactions: post.reaction_count(),
        }
    }
}

pub fn detail_href(id: u64) -> String {
    format!("/post/?id={id}")
}

/// Full rewrite model for the detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetail {
    pub id: u64,
    pub document_title: String,
    pub title: String,
    pub image_url: String,
    pub image_alt: String,
    pub author: String,
    pub body: String,
    pub location: String,
    pub tags: Vec<String>,
    pub created: String,
    pub reactions: u32,
}

impl PostDetail {
    pub fn from_post(post: &Post, app_name: &str) -> Self {
        let fields = Fields::of(post);
        Self {
            id: post.id,
            document_title: format!("{} | {app_name}", fields.title),
            title: fields.title,
            image_url: fields.image_url,
            image_alt: fields.image_alt,
            author: fields.author,
            body: fields.body,
            location: fields.location,
            tags: post.tags.iter().filter(|t| !t.trim().is_empty()).cloned().collect(),
            created: fields.created,
            reactions: post.reaction_count(),
        }
    }
}

/// The feed container plus its load-more control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedView {
    pub cards: Vec<PostCard>,
    pub load_more_disabled: bool,
}

impl FeedView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page 1 replaces the container, later pages append to it.
    pub fn render_page(&mut self, posts: &[Post], page: u32) {
        if page <= 1 {
            self.cards.clear();
        }
        self.cards.extend(posts.iter().map(PostCard::from_post));
    }

    pub fn set_last_page(&mut self, is_last_page: bool) {
        self.load_more_disabled = is_last_page;
    }
}

struct Fields {
    title: String,
    image_url: String,
    image_alt: String,
    author: String,
    body: String,
    location: String,
    created: String,
}

impl Fields {
    fn of(post: &Post) -> Self {
        let title = non_blank(Some(post.title.as_str())).unwrap_or(DEFAULT_TITLE).to_string();
        let media = post.media.as_ref().filter(|m| !m.url.trim().is_empty());
        let image_url = media.map(|m| m.url.clone()).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());
        let image_alt = non_blank(media.and_then(|m| m.alt.as_deref()))
            .map(str::to_string)
            .unwrap_or_else(|| title.clone());
        Self {
            image_url,
            image_alt,
            author: non_blank(post.author.as_ref().map(|a| a.name.as_str()))
                .unwrap_or(DEFAULT_AUTHOR)
                .to_string(),
            body: non_blank(post.body.as_deref()).unwrap_or(DEFAULT_BODY).to_string(),
            location: post.location().unwrap_or(DEFAULT_LOCATION).to_string(),
            created: post
                .created
                .map(|c| c.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            title,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
