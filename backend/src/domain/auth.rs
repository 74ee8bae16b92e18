//! Authentication primitives: credentials, password policy, and token claims.
//!
//! Inbound payload parsing stays outside the domain; these constructors
//! validate string inputs before a handler talks to a port or service.

use std::fmt;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use super::{Role, UserId};

/// Minimum password length in characters.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials used by the authentication service.
///
/// ## Invariants
/// - `email` is trimmed, lowercased, and non-empty.
/// - `password` is non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use cms_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Example.com ", "Secret123").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// assert_eq!(creds.password(), "Secret123");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalized.to_lowercase(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email string suitable for directory lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A password rule that a candidate failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PasswordRuleViolation {
    #[error("Password must be at least 8 characters long.")]
    TooShort,
    #[error("Password must contain at least one uppercase letter.")]
    MissingUppercase,
    #[error("Password must contain at least one lowercase letter.")]
    MissingLowercase,
}

/// Plaintext password that satisfies the registration policy.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Check every rule and report all violations together.
    ///
    /// # Examples
    /// ```
    /// use cms_backend::domain::{Password, PasswordRuleViolation};
    ///
    /// assert!(Password::new("Secret123").is_ok());
    /// let violations = Password::new("short").unwrap_err();
    /// assert!(violations.contains(&PasswordRuleViolation::TooShort));
    /// assert!(violations.contains(&PasswordRuleViolation::MissingUppercase));
    /// ```
    pub fn new(raw: &str) -> Result<Self, Vec<PasswordRuleViolation>> {
        let mut violations = Vec::new();
        if raw.chars().count() < PASSWORD_MIN {
            violations.push(PasswordRuleViolation::TooShort);
        }
        if !raw.chars().any(char::is_uppercase) {
            violations.push(PasswordRuleViolation::MissingUppercase);
        }
        if !raw.chars().any(char::is_lowercase) {
            violations.push(PasswordRuleViolation::MissingLowercase);
        }
        if violations.is_empty() {
            Ok(Self(Zeroizing::new(raw.to_owned())))
        } else {
            Err(violations)
        }
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Salted one-way hash of a password in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub fn new(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

/// Role carried by a bearer token.
///
/// Tokens signed with a role this build does not know keep the raw value so
/// the authorization policy can deny them explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleClaim {
    Known(Role),
    Unrecognized(String),
}

impl RoleClaim {
    /// Interpret the role string embedded in a token.
    pub fn from_claim(raw: &str) -> Self {
        raw.parse::<Role>()
            .map(Self::Known)
            .unwrap_or_else(|_| Self::Unrecognized(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(role) => role.as_str(),
            Self::Unrecognized(raw) => raw.as_str(),
        }
    }
}

impl From<Role> for RoleClaim {
    fn from(value: Role) -> Self {
        Self::Known(value)
    }
}

/// Authenticated caller decoded from an access token.
///
/// Passed explicitly to every content operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub role: RoleClaim,
}

impl Principal {
    pub fn new(user_id: UserId, role: impl Into<RoleClaim>) -> Self {
        Self {
            user_id,
            role: role.into(),
        }
    }
}

/// Purpose of a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verified contents of a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: UserId,
    pub role: RoleClaim,
    pub kind: TokenKind,
    pub expires_at: DateTime<Utc>,
}

/// Access and refresh tokens issued together at login.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenPair(<redacted>)")
    }
}
