//! Client core for a tag-scoped social posting feed.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for the
//! social API (host-does-IO pattern), keeps the session credentials, checks
//! form input, and turns posts into view models any rendering layer can show.
//!
//! # Design
//! - `SocialClient` is stateless. Each operation is split into `build_*`
//!   (produces request) and `parse_*` (consumes response).
//! - `Transport` is the only place that touches the network.
//! - `Controller` runs the user-facing flows: validate, call, then either
//!   apply the side effect or return a `FlowError`.
//! - Pagination state is a `PageCursor` value passed in and returned, and the
//!   post form's create/edit state is the `FormMode` it carries.

pub mod client;
pub mod config;
pub mod controller;
pub mod credentials;
pub mod error;
pub mod feed;
pub mod form;
pub mod http;
pub mod transport;
pub mod types;
pub mod validate;
pub mod view;

pub use client::{PostPage, SocialClient};
pub use config::ClientConfig;
pub use controller::{Controller, Navigation};
pub use credentials::{CredentialStore, Credentials, FileStorage, MemoryStorage, Storage};
pub use error::{ApiError, FlowError, StorageError, ValidationError};
pub use feed::PageCursor;
pub use form::{FormMode, LoginForm, PostForm, RegisterForm};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{CreatePost, Envelope, Media, Meta, Post, UpdatePost};
pub use view::{FeedView, PostCard, PostDetail};
