//! Authentication service.
//!
//! Implements registration, login, refresh, and access-token verification
//! over the user directory, password hasher, and token issuer ports.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::domain::ports::{
    AccessTokenVerifier, LoginOutcome, LoginService, PasswordHashError, PasswordHasher,
    RegistrationService, TokenError, TokenIssuer, TokenRefreshService, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    Email, Error, LoginCredentials, Password, PasswordDigest, Principal, Registration, TokenKind,
    TokenPair, User, UserId,
};

/// Verified against when a login names no stored user, so unknown emails
/// cost the same hashing work as wrong passwords.
const DECOY_PASSWORD: &str = "Decoy-Password-0";

fn duplicate_email() -> Error {
    Error::invalid_request("A user with this email already exists.")
        .with_details(json!({ "field": "email", "code": "duplicate_email" }))
}

fn duplicate_username() -> Error {
    Error::invalid_request("Username already taken.")
        .with_details(json!({ "field": "username", "code": "duplicate_username" }))
}

fn invalid_credentials() -> Error {
    Error::invalid_request("Invalid email or password.")
        .with_details(json!({ "code": "invalid_credentials" }))
}

fn account_disabled() -> Error {
    Error::invalid_request("User account is disabled.")
        .with_details(json!({ "code": "account_disabled" }))
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
        UserPersistenceError::DuplicateEmail => duplicate_email(),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

fn map_token_error(error: TokenError) -> Error {
    match error {
        TokenError::Signing { message } => {
            Error::internal(format!("token signing failed: {message}"))
        }
        TokenError::Invalid { .. } | TokenError::Expired | TokenError::WrongKind { .. } => {
            Error::unauthorized("Token is invalid or expired")
                .with_details(json!({ "code": "token_not_valid" }))
        }
    }
}

/// Account use-cases backed by driven ports.
#[derive(Clone)]
pub struct AccountService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    decoy: Arc<OnceCell<PasswordDigest>>,
}

impl<U, H, T> AccountService<U, H, T> {
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            users,
            hasher,
            tokens,
            decoy: Arc::new(OnceCell::new()),
        }
    }
}

impl<U, H, T> AccountService<U, H, T>
where
    H: PasswordHasher,
{
    /// Run one verification against a digest made by the configured hasher.
    ///
    /// The digest is produced on first use so its cost parameters match
    /// those of stored digests. The outcome is discarded.
    async fn verify_decoy(&self, candidate: &str) {
        let hasher = &self.hasher;
        let digest = self
            .decoy
            .get_or_try_init(|| async move {
                let password = Password::new(DECOY_PASSWORD)
                    .map_err(|_| PasswordHashError::hash("decoy password rejected"))?;
                hasher.hash(&password).await
            })
            .await;
        let outcome = match digest {
            Ok(digest) => self.hasher.verify(candidate, digest).await.map(|_| ()),
            Err(err) => Err(err),
        };
        if let Err(err) = outcome {
            warn!(error = %err, "decoy password check failed");
        }
    }
}

impl<U, H, T> AccountService<U, H, T>
where
    U: UserRepository,
    T: TokenIssuer,
{
    async fn email_taken(&self, email: &Email) -> Result<bool, Error> {
        self.users
            .find_by_email(email)
            .await
            .map(|found| found.is_some())
            .map_err(map_user_error)
    }

    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.users.find_by_id(id).await.map_err(map_user_error)
    }

    fn issue(&self, user: &User, kind: TokenKind) -> Result<String, Error> {
        self.tokens.issue(user, kind).map_err(map_token_error)
    }
}

#[async_trait]
impl<U, H, T> RegistrationService for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenIssuer,
{
    async fn ensure_email_available(&self, email: &Email) -> Result<(), Error> {
        if self.email_taken(email).await? {
            return Err(duplicate_email());
        }
        Ok(())
    }

    async fn register(&self, registration: Registration) -> Result<User, Error> {
        self.ensure_email_available(&registration.email).await?;
        let username_handle = registration
            .username
            .as_deref()
            .and_then(|raw| Email::new(raw).ok());
        if let Some(handle) = username_handle {
            if self.email_taken(&handle).await? {
                return Err(duplicate_username());
            }
        }

        let digest = self
            .hasher
            .hash(&registration.password)
            .await
            .map_err(map_hash_error)?;
        let user = registration.to_user(UserId::random());
        self.users
            .insert(&user, &digest)
            .await
            .map_err(map_user_error)?;

        info!(user_id = %user.id(), role = %user.role(), "user registered");
        Ok(user)
    }
}

#[async_trait]
impl<U, H, T> LoginService for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenIssuer,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error> {
        let Ok(email) = Email::new(credentials.email()) else {
            warn!("login rejected: malformed email");
            return Err(invalid_credentials());
        };
        let Some(record) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_error)?
        else {
            self.verify_decoy(credentials.password()).await;
            warn!("login rejected: unknown email");
            return Err(invalid_credentials());
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &record.password_hash)
            .await
            .map_err(map_hash_error)?;
        if !matches {
            warn!(user_id = %record.user.id(), "login rejected: wrong password");
            return Err(invalid_credentials());
        }
        if !record.user.is_active() {
            warn!(user_id = %record.user.id(), "login rejected: account disabled");
            return Err(account_disabled());
        }

        let tokens = TokenPair {
            access: self.issue(&record.user, TokenKind::Access)?,
            refresh: self.issue(&record.user, TokenKind::Refresh)?,
        };
        info!(user_id = %record.user.id(), "login succeeded");
        Ok(LoginOutcome {
            user: record.user,
            tokens,
        })
    }
}

#[async_trait]
impl<U, H, T> TokenRefreshService for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenIssuer,
{
    async fn refresh(&self, refresh_token: &str) -> Result<String, Error> {
        let claims = self
            .tokens
            .verify(refresh_token, TokenKind::Refresh)
            .map_err(map_token_error)?;
        let user = self
            .find_user(&claims.subject)
            .await?
            .ok_or_else(|| Error::unauthorized("User not found"))?;
        if !user.is_active() {
            return Err(account_disabled());
        }
        self.issue(&user, TokenKind::Access)
    }
}

#[async_trait]
impl<U, H, T> AccessTokenVerifier for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenIssuer,
{
    async fn verify(&self, access_token: &str) -> Result<Principal, Error> {
        let claims = self
            .tokens
            .verify(access_token, TokenKind::Access)
            .map_err(map_token_error)?;
        let user = self
            .find_user(&claims.subject)
            .await?
            .ok_or_else(|| Error::unauthorized("User not found"))?;
        if !user.is_active() {
            return Err(Error::unauthorized("User is inactive"));
        }
        Ok(Principal {
            user_id: claims.subject,
            role: claims.role,
        })
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
