//! Driving port for self-service registration.

use async_trait::async_trait;

use crate::domain::{Email, Error, Registration, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Fail with the duplicate-email error when `email` is already taken.
    ///
    /// Runs before field validation so a taken address is reported even
    /// when other fields are invalid.
    async fn ensure_email_available(&self, email: &Email) -> Result<(), Error>;

    /// Create a directory entry for a validated registration.
    async fn register(&self, registration: Registration) -> Result<User, Error>;
}
