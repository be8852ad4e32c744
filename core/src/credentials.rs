//! Persistent credential storage.
//!
//! # Design
//! `Storage` is a flat string key-value store, the shape of browser local
//! storage. `CredentialStore` fixes the two keys the client uses and adds
//! no validation or expiry: an absent value is a normal state that callers
//! check before making authenticated calls.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

pub const TOKEN_KEY: &str = "token";
pub const API_KEY_KEY: &str = "apiKey";

/// Flat string key-value store.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Process-local storage, lost on drop.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Storage persisted as a single JSON object on disk.
///
/// The file is read on every access and rewritten on every change; a missing
/// file reads as empty.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.store(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.store(&entries)?;
        }
        Ok(())
    }
}

/// Auth material sent with every authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub api_key: String,
}

/// Token and API key under fixed keys.
#[derive(Debug, Clone)]
pub struct CredentialStore<S> {
    storage: S,
}

impl<S: Storage> CredentialStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn save_token(&mut self, token: &str) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, token)
    }

    pub fn save_api_key(&mut self, api_key: &str) -> Result<(), StorageError> {
        self.storage.set(API_KEY_KEY, api_key)
    }

    pub fn token(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(TOKEN_KEY)
    }

    pub fn api_key(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(API_KEY_KEY)
    }

    /// Both values, or `None` if either is missing.
    pub fn credentials(&self) -> Result<Option<Credentials>, StorageError> {
        Ok(match (self.token()?, self.api_key()?) {
            (Some(token), Some(api_key)) => Some(Credentials { token, api_key }),
            _ => None,
        })
    }

    /// Remove token and API key. Both removals are attempted; the first
    /// failure is returned.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        let token = self.storage.remove(TOKEN_KEY);
        let api_key = self.storage.remove(API_KEY_KEY);
        token.and(api_key)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
