//! Port for signing and verifying bearer tokens.

use crate::domain::{TokenClaims, TokenKind, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// Signature, issuer, or structure did not verify.
        Invalid { message: String } => "token is invalid: {message}",
        /// The token is past its expiry.
        Expired => "token has expired",
        /// A token of the other kind was presented.
        WrongKind { expected: String } => "expected a {expected} token",
        /// Signing failed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Issues tokens bound to a user's identity and role.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Sign a token of `kind` for `user`.
    fn issue(&self, user: &User, kind: TokenKind) -> Result<String, TokenError>;

    /// Verify `token` and require it to be of `kind`.
    fn verify(&self, token: &str, kind: TokenKind) -> Result<TokenClaims, TokenError>;
}
