//! Error types for the social feed client.
//!
//! # Design
//! `ApiError` covers one request/response cycle. `ValidationError` is raised
//! before any request is built. `FlowError` is what the controller returns to
//! the caller and carries a message fit for showing to the user.

use thiserror::Error;

/// Shown when a failed response carries no readable message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong, please try again";

/// Errors returned by `SocialClient` build/parse methods and transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Request { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),
}

/// A form field rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Name can only contain letters, numbers and underscores")]
    NameCharset,

    #[error("Email must be a valid stud.noroff.no or noroff.no address")]
    EmailDomain,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Image URL must start with http:// or https://")]
    MediaUrl,
}

/// Failures of the credential backing store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage format: {0}")]
    Format(#[from] serde_json::Error),
}

/// Terminal failure of one user action.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Token or API key absent; the action is aborted before any request.
    #[error("not logged in")]
    MissingCredentials,

    /// Login answered with success but without `data.accessToken`.
    #[error("login response did not contain an access token")]
    MissingToken,
}

impl FlowError {
    /// Text to surface to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            FlowError::Validation(e) => e.to_string(),
            FlowError::Api(ApiError::Request { message, .. }) => message.clone(),
            FlowError::Api(_) | FlowError::Storage(_) => GENERIC_ERROR_MESSAGE.to_string(),
            FlowError::MissingCredentials => "Please log in to continue".to_string(),
            FlowError::MissingToken => "Login failed, please try again".to_string(),
        }
    }
}
