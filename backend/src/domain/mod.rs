//! Domain primitives, policy, and services.
//!
//! Purpose: define strongly typed entities and use-cases used by the HTTP
//! and persistence adapters. Types validate their invariants on
//! construction; adapters never build them from unchecked strings.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, ContentItem: directory and store aggregates.
//! - authorize: the content access decision.
//! - AccountService, ContentService: implementations of the driving ports.

pub mod account_service;
pub mod auth;
pub mod content;
pub mod content_service;
pub mod error;
pub mod policy;
pub mod ports;
pub mod registration;
pub mod trace_id;
pub mod user;
pub mod validation;

pub use self::account_service::AccountService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, Password, PasswordDigest, PasswordRuleViolation,
    Principal, RoleClaim, TokenClaims, TokenKind, TokenPair,
};
pub use self::content::{
    Body, ContentDraft, ContentId, ContentInput, ContentItem, ContentValidationError,
    DocumentRef, SearchTerm, Summary, Title, Visibility,
};
pub use self::content_service::ContentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::policy::{ContentAction, Scope, authorize};
pub use self::registration::{Registration, RegistrationInput};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, Locality, PersonName, PhoneNumber, Pincode, Role, User, UserId, UserProfile,
    UserValidationError,
};
pub use self::validation::FieldErrors;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use cms_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
