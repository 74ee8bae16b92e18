//! Driving port used by the bearer extractor.

use async_trait::async_trait;

use crate::domain::{Error, Principal};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessTokenVerifier: Send + Sync {
    /// Decode an access token into the calling principal.
    ///
    /// Fails with [`crate::domain::ErrorCode::Unauthorized`] for invalid,
    /// expired, or refresh tokens and for users that no longer exist or are
    /// inactive.
    async fn verify(&self, access_token: &str) -> Result<Principal, Error>;
}
