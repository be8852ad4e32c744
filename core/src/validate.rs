//! Field rules applied before any request is built.
//!
//! Each function checks its rules in order and returns the first failure.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

pub const MIN_PASSWORD_LEN: usize = 8;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("name pattern"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w\-.]+@(stud\.)?noroff\.no$").expect("email pattern"));

pub fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

pub fn name(value: &str) -> Result<(), ValidationError> {
    required("Name", value)?;
    if !NAME_RE.is_match(value) {
        return Err(ValidationError::NameCharset);
    }
    Ok(())
}

pub fn email(value: &str) -> Result<(), ValidationError> {
    required("Email", value)?;
    if !EMAIL_RE.is_match(value.trim()) {
        return Err(ValidationError::EmailDomain);
    }
    Ok(())
}

pub fn password(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort { min: MIN_PASSWORD_LEN });
    }
    Ok(())
}

/// Empty is allowed: the post is created without media.
pub fn media_url(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.starts_with("http://") || value.starts_with("https://") {
        return Ok(());
    }
    Err(ValidationError::MediaUrl)
}
