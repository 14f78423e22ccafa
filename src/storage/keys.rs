//! Typed accessors for the persisted auth token and remember-me flag

use super::Storage;
use crate::error::Result;
use std::sync::Arc;

pub const DEFAULT_TOKEN_KEY: &str = "token";
pub const DEFAULT_REMEMBER_ME_KEY: &str = "remember_me";

/// Persisted auth token
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn Storage>,
    key: String,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_key(storage, DEFAULT_TOKEN_KEY)
    }

    pub fn with_key(storage: Arc<dyn Storage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Empty tokens count as absent
    pub fn get_token(&self) -> Result<Option<String>> {
        Ok(self.storage.get(&self.key)?.filter(|t| !t.is_empty()))
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        self.storage.set(&self.key, token)
    }

    pub fn remove_token(&self) -> Result<()> {
        self.storage.remove(&self.key)
    }
}

/// The two literals written under the remember-me key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RememberMe {
    On,
    Off,
}

impl RememberMe {
    pub fn as_str(&self) -> &'static str {
        match self {
            RememberMe::On => "on",
            RememberMe::Off => "off",
        }
    }
}

impl From<bool> for RememberMe {
    fn from(on: bool) -> Self {
        if on {
            RememberMe::On
        } else {
            RememberMe::Off
        }
    }
}

/// Persisted "remember me" flag
#[derive(Clone)]
pub struct RememberMeStore {
    storage: Arc<dyn Storage>,
    key: String,
}

impl RememberMeStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_key(storage, DEFAULT_REMEMBER_ME_KEY)
    }

    pub fn with_key(storage: Arc<dyn Storage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// True only when the stored value is exactly `"on"`
    pub fn is_set(&self) -> Result<bool> {
        Ok(self.storage.get(&self.key)?.as_deref() == Some(RememberMe::On.as_str()))
    }

    pub fn set(&self, on: bool) -> Result<()> {
        self.storage.set(&self.key, RememberMe::from(on).as_str())
    }

    pub fn remove(&self) -> Result<()> {
        self.storage.remove(&self.key)
    }
}
