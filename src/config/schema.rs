//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::storage::keys::{DEFAULT_REMEMBER_ME_KEY, DEFAULT_TOKEN_KEY};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub identity: IdentityConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub routes: RoutesConfig,
}

/// Identity (userinfo) endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_userinfo_path")]
    pub userinfo_path: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_userinfo_path() -> String {
    "/api/userinfo".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl IdentityConfig {
    /// Full userinfo URL, tolerant of slashes on either side of the join
    pub fn userinfo_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.userinfo_path.trim_start_matches('/')
        )
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            userinfo_path: default_userinfo_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Where the token and remember-me flag are persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_token_key")]
    pub token_key: String,

    #[serde(default = "default_remember_me_key")]
    pub remember_me_key: String,
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from("./.authsession")
}

fn default_token_key() -> String {
    DEFAULT_TOKEN_KEY.to_string()
}

fn default_remember_me_key() -> String {
    DEFAULT_REMEMBER_ME_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            token_key: default_token_key(),
            remember_me_key: default_remember_me_key(),
        }
    }
}

/// Navigation targets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesConfig {
    /// Route pushed after signout and after a failed signin
    #[serde(default = "default_root_route")]
    pub root: String,
}

fn default_root_route() -> String {
    "/".to_string()
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            root: default_root_route(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.identity.timeout_secs, 10);
        assert_eq!(config.storage.token_key, "token");
        assert_eq!(config.storage.remember_me_key, "remember_me");
        assert_eq!(config.routes.root, "/");
    }

    #[test]
    fn test_userinfo_url_join() {
        let mut identity = IdentityConfig::default();
        identity.base_url = "https://api.example.com/".to_string();
        identity.userinfo_path = "/v1/userinfo".to_string();
        assert_eq!(identity.userinfo_url(), "https://api.example.com/v1/userinfo");

        identity.userinfo_path = "v1/userinfo".to_string();
        assert_eq!(identity.userinfo_url(), "https://api.example.com/v1/userinfo");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[identity]\nbase_url = \"http://id.local\"\n").unwrap();
        assert_eq!(config.identity.base_url, "http://id.local");
        assert_eq!(config.identity.userinfo_path, "/api/userinfo");
        assert_eq!(config.routes.root, "/");
    }
}
