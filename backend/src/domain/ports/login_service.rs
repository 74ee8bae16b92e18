//! Driving port for login use-cases.
//!
//! Inbound adapters call it to exchange credentials for a token pair without
//! knowing the backing directory or signing infrastructure.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, TokenPair, User};

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub tokens: TokenPair,
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and issue access and refresh tokens.
    ///
    /// Unknown emails and wrong passwords fail identically.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error>;
}
