//! HS256 JWT implementation of the `TokenIssuer` port.
//!
//! Expiry is checked against the injected clock rather than the system
//! time so token lifetimes are testable.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{TokenError, TokenIssuer};
use crate::domain::{RoleClaim, TokenClaims, TokenKind, User, UserId};

mod secret;

pub use secret::{
    BuildMode, TOKEN_SECRET_MIN_LEN, TokenSecret, TokenSecretError, token_secret_from_env,
};

/// Lifetimes and issuer stamped into every token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtSettings {
    pub issuer: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl Default for JwtSettings {
    fn default() -> Self {
        Self {
            issuer: "cms".to_owned(),
            access_ttl: Duration::minutes(5),
            refresh_ttl: Duration::days(1),
        }
    }
}

impl JwtSettings {
    fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    sub: String,
    role: String,
    token_type: String,
    iat: i64,
    exp: i64,
    iss: String,
    jti: String,
}

/// Signs and verifies bearer tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    settings: JwtSettings,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtTokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenIssuer")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl JwtTokenIssuer {
    /// Build an issuer from raw secret bytes.
    ///
    /// The keys copy `secret`; callers remain responsible for zeroising it.
    pub fn new(secret: &[u8], settings: JwtSettings, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.validate_aud = false;
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            settings,
            clock,
        }
    }
}

fn map_decode_error(error: jsonwebtoken::errors::Error) -> TokenError {
    match error.kind() {
        ErrorKind::ExpiredSignature => TokenError::expired(),
        ErrorKind::InvalidSignature => TokenError::invalid("signature mismatch"),
        ErrorKind::InvalidIssuer => TokenError::invalid("unexpected issuer"),
        ErrorKind::InvalidAlgorithm => TokenError::invalid("unexpected algorithm"),
        _ => TokenError::invalid(error.to_string()),
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user: &User, kind: TokenKind) -> Result<String, TokenError> {
        let issued_at = self.clock.utc();
        let expires_at = issued_at + self.settings.ttl(kind);
        let claims = JwtClaims {
            sub: user.id().to_string(),
            role: user.role().as_str().to_owned(),
            token_type: kind.as_str().to_owned(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.settings.issuer.clone(),
            jti: Uuid::new_v4().simple().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str, kind: TokenKind) -> Result<TokenClaims, TokenError> {
        let claims = decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map_err(map_decode_error)?
            .claims;

        if claims.exp < self.clock.utc().timestamp() {
            return Err(TokenError::expired());
        }
        if claims.token_type != kind.as_str() {
            return Err(TokenError::wrong_kind(kind.as_str()));
        }
        let subject =
            UserId::new(&claims.sub).map_err(|_| TokenError::invalid("subject is not a user id"))?;
        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
            .ok_or_else(|| TokenError::invalid("expiry out of range"))?;

        Ok(TokenClaims {
            subject,
            role: RoleClaim::from_claim(&claims.role),
            kind,
            expires_at,
        })
    }
}
