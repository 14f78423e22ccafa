//! REST client for the userinfo endpoint

use super::IdentityProvider;
use crate::auth::{ProfilePayload, UserinfoResponse};
use crate::config::IdentityConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpIdentityClient {
    http: Client,
    url: String,
}

impl HttpIdentityClient {
    pub fn new(config: &IdentityConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.userinfo_url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityClient {
    async fn fetch_profile(&self, token: Option<&str>) -> Result<ProfilePayload> {
        let mut request = self.http.get(&self.url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(url = %self.url, "Fetching user profile");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::IdentityStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        let parsed: UserinfoResponse = serde_json::from_slice(&body)?;
        Ok(parsed.data)
    }
}
