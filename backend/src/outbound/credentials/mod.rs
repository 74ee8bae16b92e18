//! Argon2id password hashing adapter.
//!
//! Digests are PHC strings, so parameters travel with each stored hash and
//! older digests keep verifying after the defaults change.

use argon2::password_hash::{self, PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier as _, Version};
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{Password, PasswordDigest};

const SALT_LEN: usize = 16;

/// `PasswordHasher` backed by Argon2id.
///
/// Hashing is CPU-bound and runs on the blocking pool.
#[derive(Debug, Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use explicit cost parameters for new digests.
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

fn hash_blocking(argon2: &Argon2<'_>, password: &str) -> Result<String, PasswordHashError> {
    let mut salt_bytes = [0u8; SALT_LEN];
    getrandom::getrandom(&mut salt_bytes).map_err(|err| PasswordHashError::hash(err.to_string()))?;
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|err| PasswordHashError::hash(err.to_string()))?;
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|digest| digest.to_string())
        .map_err(|err| PasswordHashError::hash(err.to_string()))
}

fn verify_blocking(
    argon2: &Argon2<'_>,
    candidate: &str,
    digest: &str,
) -> Result<bool, PasswordHashError> {
    let parsed = PasswordHash::new(digest)
        .map_err(|err| PasswordHashError::malformed_digest(err.to_string()))?;
    match argon2.verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(PasswordHashError::malformed_digest(err.to_string())),
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordDigest, PasswordHashError> {
        let argon2 = self.argon2();
        let secret = Zeroizing::new(password.expose().to_owned());
        let phc = tokio::task::spawn_blocking(move || hash_blocking(&argon2, &secret))
            .await
            .map_err(|err| PasswordHashError::hash(err.to_string()))??;
        Ok(PasswordDigest::new(phc))
    }

    async fn verify(
        &self,
        candidate: &str,
        digest: &PasswordDigest,
    ) -> Result<bool, PasswordHashError> {
        let argon2 = self.argon2();
        let candidate = Zeroizing::new(candidate.to_owned());
        let digest = digest.as_str().to_owned();
        tokio::task::spawn_blocking(move || verify_blocking(&argon2, &candidate, &digest))
            .await
            .map_err(|err| PasswordHashError::hash(err.to_string()))?
    }
}
