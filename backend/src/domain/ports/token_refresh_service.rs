//! Driving port for exchanging a refresh token for a new access token.

use async_trait::async_trait;

use crate::domain::Error;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRefreshService: Send + Sync {
    /// Verify `refresh_token` and mint a fresh access token for its subject.
    async fn refresh(&self, refresh_token: &str) -> Result<String, Error>;
}
