//! Client settings from the environment.

use std::env;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "https://v2.api.noroff.dev";
pub const DEFAULT_TAG: &str = "feed";
pub const DEFAULT_PAGE_LIMIT: u32 = 12;
pub const DEFAULT_APP_NAME: &str = "Feed";
pub const DEFAULT_STORE_PATH: &str = "credentials.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings for the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root, without trailing slash.
    pub base_url: String,
    /// Static API key; when absent one is created at login.
    pub api_key: Option<String>,
    /// Tag that scopes the feed to this application.
    pub tag: String,
    /// Posts per page.
    pub page_limit: u32,
    /// Suffix of the detail page's document title.
    pub app_name: String,
    /// Where `FileStorage` keeps the credentials.
    pub storage_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            tag: DEFAULT_TAG.to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
            app_name: DEFAULT_APP_NAME.to_string(),
            storage_path: PathBuf::from(DEFAULT_STORE_PATH),
        }
    }
}

impl ClientConfig {
    /// Read `SOCIAL_*` variables, falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str, default: &str| match lookup(key).filter(|v| !v.trim().is_empty()) {
            Some(value) => value.trim().to_string(),
            None => {
                info!("{key} not set, using default: {default}");
                default.to_string()
            }
        };

        let page_limit = var("SOCIAL_PAGE_LIMIT", &DEFAULT_PAGE_LIMIT.to_string());
        let page_limit = match page_limit.parse::<u32>() {
            Ok(n) if n > 0 => n,
            Ok(_) => {
                return Err(ConfigError::Invalid {
                    key: "SOCIAL_PAGE_LIMIT",
                    value: page_limit,
                    reason: "must be at least 1".to_string(),
                })
            }
            Err(e) => {
                warn!("Invalid SOCIAL_PAGE_LIMIT value: {e}");
                return Err(ConfigError::Invalid {
                    key: "SOCIAL_PAGE_LIMIT",
                    value: page_limit,
                    reason: e.to_string(),
                });
            }
        };

        Ok(Self {
            base_url: var("SOCIAL_API_BASE", DEFAULT_BASE_URL).trim_end_matches('/').to_string(),
            api_key: lookup("SOCIAL_API_KEY").filter(|v| !v.trim().is_empty()),
            tag: var("SOCIAL_TAG", DEFAULT_TAG),
            page_limit,
            app_name: var("SOCIAL_APP_NAME", DEFAULT_APP_NAME),
            storage_path: PathBuf::from(var("SOCIAL_STORE_PATH", DEFAULT_STORE_PATH)),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("SOCIAL_API_BASE", "http://127.0.0.1:3000/"),
            ("SOCIAL_API_KEY", "k"),
            ("SOCIAL_TAG", "mine"),
            ("SOCIAL_PAGE_LIMIT", "5"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.tag, "mine");
        assert_eq!(config.page_limit, 5);
    }

    #[test]
    fn bad_page_limit_is_rejected() {
        assert!(ClientConfig::from_lookup(lookup(&[("SOCIAL_PAGE_LIMIT", "many")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[("SOCIAL_PAGE_LIMIT", "0")])).is_err());
    }
}
