//! Validate-then-call flows tying forms, client, transport and storage.
//!
//! # Design
//! Every flow ends in one of two states. On success it performs its side
//! effect (persist credentials, refresh the feed, reset the form) and reports
//! where to go next. On failure it returns a `FlowError` and leaves stored
//! state untouched. Validation always runs before any request is built, and
//! authenticated flows check for credentials before building one.
//!
//! Feed loads take `&mut FeedView` and the cursor by value, so one container
//! has at most one load in flight and the cursor is never shared.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::client::SocialClient;
use crate::config::ClientConfig;
use crate::credentials::{CredentialStore, Credentials, Storage};
use crate::error::FlowError;
use crate::feed::PageCursor;
use crate::form::{FormMode, LoginForm, PostForm, RegisterForm};
use crate::transport::Transport;
use crate::types::Post;
use crate::view::{FeedView, PostDetail};

/// Where the user goes after a successful flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Login,
    Feed,
}

impl Navigation {
    pub fn path(&self) -> &'static str {
        match self {
            Navigation::Login => "/",
            Navigation::Feed => "/feed/",
        }
    }
}

pub struct Controller<T, S> {
    client: SocialClient,
    transport: T,
    store: CredentialStore<S>,
    api_key: Option<String>,
    app_name: String,
}

impl<T: Transport, S: Storage> Controller<T, S> {
    pub fn new(config: &ClientConfig, transport: T, storage: S) -> Self {
        Self {
            client: SocialClient::new(&config.base_url, &config.tag, config.page_limit),
            transport,
            store: CredentialStore::new(storage),
            api_key: config.api_key.clone(),
            app_name: config.app_name.clone(),
        }
    }

    pub fn client(&self) -> &SocialClient {
        &self.client
    }

    pub fn store(&self) -> &CredentialStore<S> {
        &self.store
    }

    fn credentials(&self) -> Result<Credentials, FlowError> {
        match self.store.credentials()? {
            Some(credentials) => Ok(credentials),
            None => {
                debug!("no stored credentials, aborting");
                Err(FlowError::MissingCredentials)
            }
        }
    }

    // -- auth --------------------------------------------------------------

    /// Creates the account; the caller keeps the form values either way.
    pub fn register(&self, form: &RegisterForm) -> Result<Navigation, FlowError> {
        form.validate()?;
        let request = self.client.build_register(&form.to_request())?;
        let profile = self
            .client
            .parse_register(self.transport.execute(request)?)
            .inspect_err(|e| warn!(error = %e, "registration rejected"))?;
        info!(name = %profile.name, "registered");
        Ok(Navigation::Login)
    }

    /// Persists token and API key only once both are in hand.
    pub fn login(&mut self, form: &LoginForm) -> Result<Navigation, FlowError> {
        form.validate()?;
        let request = self.client.build_login(&form.to_request())?;
        let profile = self
            .client
            .parse_login(self.transport.execute(request)?)
            .inspect_err(|e| warn!(error = %e, "login rejected"))?;

        let Some(token) = profile.access_token.filter(|t| !t.trim().is_empty()) else {
            warn!("login response carried no access token");
            return Err(FlowError::MissingToken);
        };

        let api_key = match &self.api_key {
            Some(key) => key.clone(),
            None => {
                let request = self.client.build_create_api_key(&token);
                self.client.parse_create_api_key(self.transport.execute(request)?)?.key
            }
        };

        self.store.save_token(&token)?;
        self.store.save_api_key(&api_key)?;
        info!(name = %profile.name, "logged in");
        Ok(Navigation::Feed)
    }

    /// Always ends on the login view, even if storage could not be cleared.
    pub fn logout(&mut self) -> Navigation {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear credentials");
        }
        info!("logged out");
        Navigation::Login
    }

    // -- feed --------------------------------------------------------------

    /// Fetch `cursor`'s page into `view` and return the updated cursor.
    pub fn load_page(&self, view: &mut FeedView, cursor: PageCursor) -> Result<PageCursor, FlowError> {
        let credentials = self.credentials()?;
        let request = self.client.build_list_posts(&credentials, cursor);
        let page = self
            .client
            .parse_list_posts(self.transport.execute(request)?)
            .inspect_err(|e| warn!(error = %e, page = cursor.page(), "failed to load posts"))?;

        view.render_page(&page.posts, cursor.page());
        view.set_last_page(page.meta.is_last_page);
        debug!(page = cursor.page(), count = page.posts.len(), last = page.meta.is_last_page, "rendered page");
        Ok(cursor.with_last_page(page.meta.is_last_page))
    }

    /// Append the page after `cursor`; a no-op once the last page is shown.
    pub fn load_more(&self, view: &mut FeedView, cursor: PageCursor) -> Result<PageCursor, FlowError> {
        match cursor.next() {
            Some(next) => self.load_page(view, next),
            None => {
                view.set_last_page(true);
                Ok(cursor)
            }
        }
    }

    pub fn fetch_post(&self, id: u64) -> Result<Post, FlowError> {
        let credentials = self.credentials()?;
        let request = self.client.build_get_post(&credentials, id);
        Ok(self
            .client
            .parse_get_post(self.transport.execute(request)?)
            .inspect_err(|e| warn!(error = %e, id, "failed to load post"))?)
    }

    pub fn load_detail(&self, id: u64) -> Result<PostDetail, FlowError> {
        let post = self.fetch_post(id)?;
        Ok(PostDetail::from_post(&post, &self.app_name))
    }

    // -- posts -------------------------------------------------------------

    /// Create or update depending on `form.mode`, then reload page 1.
    ///
    /// Once a request was sent the form is back in create mode; on success
    /// its fields are cleared too.
    pub fn submit_post(&self, form: &mut PostForm, view: &mut FeedView) -> Result<PageCursor, FlowError> {
        form.validate()?;
        let credentials = self.credentials()?;

        let result = match form.mode {
            FormMode::Create => self
                .client
                .build_create_post(&credentials, &form.to_create(self.client.tag(), Utc::now()))
                .and_then(|request| self.client.parse_create_post(self.transport.execute(request)?)),
            FormMode::Edit { id } => self
                .client
                .build_update_post(&credentials, id, &form.to_update(self.client.tag()))
                .and_then(|request| self.client.parse_update_post(self.transport.execute(request)?)),
        };
        form.mode = FormMode::Create;

        let post = result.inspect_err(|e| warn!(error = %e, "failed to save post"))?;
        info!(id = post.id, "saved post");
        form.reset();
        self.load_page(view, PageCursor::first())
    }

    /// Delete `id`, then reload page 1.
    pub fn delete_post(&self, id: u64, view: &mut FeedView) -> Result<PageCursor, FlowError> {
        let credentials = self.credentials()?;
        let request = self.client.build_delete_post(&credentials, id);
        self.client
            .parse_delete_post(self.transport.execute(request)?)
            .inspect_err(|e| warn!(error = %e, id, "failed to delete post"))?;
        info!(id, "deleted post");
        self.load_page(view, PageCursor::first())
    }
}
