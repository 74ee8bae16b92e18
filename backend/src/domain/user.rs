//! User directory data model.
//!
//! Every profile field is a validated newtype so adapters cannot construct a
//! [`User`] that violates the directory's format rules.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum length of an email address.
pub const EMAIL_MAX: usize = 254;
/// Maximum length of a first or last name.
pub const PERSON_NAME_MAX: usize = 30;
/// Maximum length of a city, state, or country.
pub const LOCALITY_MAX: usize = 100;

/// Validation errors raised by the user field constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("Enter a valid email address.")]
    InvalidEmail,
    #[error("This field may not be blank.")]
    Blank,
    #[error("Ensure this field has no more than {max} characters.")]
    TooLong { max: usize },
    #[error("Phone number must be exactly 10 digits.")]
    InvalidPhone,
    #[error("Pincode must be exactly 6 digits.")]
    InvalidPincode,
    #[error("\"{value}\" is not a valid choice.")]
    InvalidRole { value: String },
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its hyphenated string form.
    ///
    /// # Examples
    /// ```
    /// use cms_backend::domain::UserId;
    ///
    /// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
    /// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)*\.[^@\s.]{2,}$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Login handle of a user: a trimmed, lowercased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    ///
    /// # Examples
    /// ```
    /// use cms_backend::domain::Email;
    ///
    /// let email = Email::new("  Ada@Example.COM ").expect("valid email");
    /// assert_eq!(email.as_str(), "ada@example.com");
    /// assert!(Email::new("not-an-email").is_err());
    /// ```
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::Blank);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::TooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

fn bounded_text(value: &str, max: usize) -> Result<String, UserValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(UserValidationError::Blank);
    }
    if trimmed.chars().count() > max {
        return Err(UserValidationError::TooLong { max });
    }
    Ok(trimmed.to_owned())
}

fn exact_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

macro_rules! text_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = UserValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

text_newtype! {
    /// First or last name, 1 to 30 characters once trimmed.
    PersonName
}

impl PersonName {
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        bounded_text(value.as_ref(), PERSON_NAME_MAX).map(Self)
    }
}

text_newtype! {
    /// Ten-digit phone number.
    PhoneNumber
}

impl PhoneNumber {
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if !exact_digits(trimmed, 10) {
            return Err(UserValidationError::InvalidPhone);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

text_newtype! {
    /// Six-digit postal code.
    Pincode
}

impl Pincode {
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if !exact_digits(trimmed, 6) {
            return Err(UserValidationError::InvalidPincode);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

text_newtype! {
    /// City, state, or country name of at most 100 characters.
    Locality
}

impl Locality {
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        bounded_text(value.as_ref(), LOCALITY_MAX).map(Self)
    }
}

/// Role tag assigned to a user at registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Author,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Author => "author",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "author" => Ok(Self::Author),
            other => Err(UserValidationError::InvalidRole {
                value: other.to_owned(),
            }),
        }
    }
}

/// Contact and address details collected at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub phone: PhoneNumber,
    pub pincode: Pincode,
    pub address: Option<String>,
    pub city: Option<Locality>,
    pub state: Option<Locality>,
    pub country: Option<Locality>,
}

/// Directory entry for a registered user. Never carries the credential.
///
/// ## Invariants
/// - `email` is unique across the directory.
/// - `role` does not change after registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    profile: UserProfile,
    role: Role,
    is_active: bool,
}

impl User {
    /// Build an active user.
    pub fn new(id: UserId, email: Email, profile: UserProfile, role: Role) -> Self {
        Self {
            id,
            email,
            profile,
            role,
            is_active: true,
        }
    }

    /// Override the active flag, as stored by the directory.
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

#[cfg(test)]
mod tests {
    //! Field rules for the user directory.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ada@example.com")]
    #[case("first.last+tag@mail.example.org")]
    fn accepts_well_formed_email(#[case] raw: &str) {
        assert!(Email::new(raw).is_ok());
    }

    #[rstest]
    #[case("", UserValidationError::Blank)]
    #[case("ada", UserValidationError::InvalidEmail)]
    #[case("ada@example", UserValidationError::InvalidEmail)]
    #[case("a da@example.com", UserValidationError::InvalidEmail)]
    #[case("ada@@example.com", UserValidationError::InvalidEmail)]
    fn rejects_malformed_email(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(Email::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_overlong_email() {
        let raw = format!("{}@example.com", "a".repeat(250));
        assert_eq!(
            Email::new(raw),
            Err(UserValidationError::TooLong { max: EMAIL_MAX })
        );
    }

    #[rstest]
    fn person_name_counts_characters_not_bytes() {
        let name = "é".repeat(PERSON_NAME_MAX);
        assert!(PersonName::new(&name).is_ok());
        let longer = format!("{name}é");
        assert_eq!(
            PersonName::new(longer),
            Err(UserValidationError::TooLong {
                max: PERSON_NAME_MAX
            })
        );
    }

    #[rstest]
    #[case("9876543210", true)]
    #[case("987654321", false)]
    #[case("98765432101", false)]
    #[case("98765x3210", false)]
    #[case("９８７６５４３２１０", false)]
    fn phone_requires_ten_ascii_digits(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(PhoneNumber::new(raw).is_ok(), ok);
    }

    #[rstest]
    #[case("560001", true)]
    #[case("56000", false)]
    #[case("5600011", false)]
    #[case("56000a", false)]
    fn pincode_requires_six_digits(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(Pincode::new(raw).is_ok(), ok);
    }

    #[rstest]
    #[case("admin", Ok(Role::Admin))]
    #[case("author", Ok(Role::Author))]
    #[case("editor", Err(UserValidationError::InvalidRole { value: "editor".into() }))]
    #[case("Admin", Err(UserValidationError::InvalidRole { value: "Admin".into() }))]
    fn role_parsing(#[case] raw: &str, #[case] expected: Result<Role, UserValidationError>) {
        assert_eq!(raw.parse::<Role>(), expected);
    }

    #[rstest]
    fn role_defaults_to_author() {
        assert_eq!(Role::default(), Role::Author);
    }

    #[rstest]
    fn user_id_rejects_padded_input() {
        assert_eq!(
            UserId::new(" 3fa85f64-5717-4562-b3fc-2c963f66afa6"),
            Err(UserValidationError::InvalidId)
        );
    }
}
