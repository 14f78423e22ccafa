//! Identity endpoint access

pub mod http;

pub use http::HttpIdentityClient;

use crate::auth::ProfilePayload;
use crate::error::Result;
use async_trait::async_trait;

/// Source of the signed-in user's profile
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fetch the profile for `token`, or for whatever credentials the
    /// provider carries on its own when `token` is `None`
    async fn fetch_profile(&self, token: Option<&str>) -> Result<ProfilePayload>;
}
