//! Self-service registration payload validation.

use super::validation::{FieldErrors, REQUIRED_MESSAGE};
use super::{
    Email, Locality, Password, PersonName, PhoneNumber, Pincode, Role, UserProfile, UserId, User,
};

/// Raw registration fields as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub pincode: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub role: Option<String>,
}

/// Registration that passed every field rule.
///
/// Uniqueness checks happen later against the directory.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: Email,
    pub password: Password,
    pub username: Option<String>,
    pub profile: UserProfile,
    pub role: Role,
}

impl Registration {
    /// Validate every field and collect all failures.
    ///
    /// # Examples
    /// ```
    /// use cms_backend::domain::{Registration, RegistrationInput, Role};
    ///
    /// let input = RegistrationInput {
    ///     email: Some("ada@example.com".into()),
    ///     password: Some("Secret123".into()),
    ///     first_name: Some("Ada".into()),
    ///     last_name: Some("Lovelace".into()),
    ///     phone: Some("9876543210".into()),
    ///     pincode: Some("560001".into()),
    ///     ..RegistrationInput::default()
    /// };
    /// let registration = Registration::try_from_input(input).expect("valid input");
    /// assert_eq!(registration.role, Role::Author);
    /// ```
    pub fn try_from_input(input: RegistrationInput) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let email = required(&mut errors, "email", input.email.as_deref())
            .and_then(|raw| errors.check("email", Email::new(raw)));
        let password = match input.password.as_deref() {
            None => {
                errors.push("password", REQUIRED_MESSAGE);
                None
            }
            Some(raw) => match Password::new(raw) {
                Ok(password) => Some(password),
                Err(violations) => {
                    for violation in violations {
                        errors.push("password", violation.to_string());
                    }
                    None
                }
            },
        };
        let first_name = required(&mut errors, "first_name", input.first_name.as_deref())
            .and_then(|raw| errors.check("first_name", PersonName::new(raw)));
        let last_name = required(&mut errors, "last_name", input.last_name.as_deref())
            .and_then(|raw| errors.check("last_name", PersonName::new(raw)));
        let phone = required(&mut errors, "phone", input.phone.as_deref())
            .and_then(|raw| errors.check("phone", PhoneNumber::new(raw)));
        let pincode = required(&mut errors, "pincode", input.pincode.as_deref())
            .and_then(|raw| errors.check("pincode", Pincode::new(raw)));
        let city = optional_locality(&mut errors, "city", input.city.as_deref());
        let state = optional_locality(&mut errors, "state", input.state.as_deref());
        let country = optional_locality(&mut errors, "country", input.country.as_deref());
        let role = match input.role.as_deref().map(str::trim) {
            None | Some("") => Some(Role::default()),
            Some(raw) => errors.check("role", raw.parse::<Role>()),
        };
        let address = non_blank(input.address.as_deref());
        let username = non_blank(input.username.as_deref());

        match (email, password, first_name, last_name, phone, pincode, role) {
            (
                Some(email),
                Some(password),
                Some(first_name),
                Some(last_name),
                Some(phone),
                Some(pincode),
                Some(role),
            ) if errors.is_empty() => Ok(Self {
                email,
                password,
                username,
                profile: UserProfile {
                    first_name,
                    last_name,
                    phone,
                    pincode,
                    address,
                    city: city.flatten(),
                    state: state.flatten(),
                    country: country.flatten(),
                },
                role,
            }),
            _ => Err(errors),
        }
    }

    /// Build the directory entry for this registration.
    pub fn to_user(&self, id: UserId) -> User {
        User::new(id, self.email.clone(), self.profile.clone(), self.role)
    }
}

fn required<'a>(
    errors: &mut FieldErrors,
    field: &'static str,
    value: Option<&'a str>,
) -> Option<&'a str> {
    if value.is_none() {
        errors.push(field, REQUIRED_MESSAGE);
    }
    value
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

/// `Some(None)` for an absent or blank value, `None` when validation failed.
fn optional_locality(
    errors: &mut FieldErrors,
    field: &'static str,
    value: Option<&str>,
) -> Option<Option<Locality>> {
    match non_blank(value) {
        None => Some(None),
        Some(text) => errors.check(field, Locality::new(text)).map(Some),
    }
}

#[cfg(test)]
mod tests {
    //! Registration field collection.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn valid_input() -> RegistrationInput {
        RegistrationInput {
            email: Some("Ada@Example.com".into()),
            password: Some("Secret123".into()),
            username: None,
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            phone: Some("9876543210".into()),
            pincode: Some("560001".into()),
            address: Some("12 Analytical Row".into()),
            city: Some("London".into()),
            state: None,
            country: Some("  ".into()),
            role: None,
        }
    }

    #[rstest]
    fn valid_input_builds_registration(valid_input: RegistrationInput) {
        let registration = Registration::try_from_input(valid_input).expect("valid");

        assert_eq!(registration.email.as_str(), "ada@example.com");
        assert_eq!(registration.role, Role::Author);
        assert_eq!(registration.profile.first_name.as_str(), "Ada");
        assert_eq!(
            registration.profile.city.as_ref().map(Locality::as_str),
            Some("London")
        );
        assert!(registration.profile.country.is_none());
        assert!(registration.profile.state.is_none());
    }

    #[rstest]
    fn admin_role_is_accepted(mut valid_input: RegistrationInput) {
        valid_input.role = Some("admin".into());
        let registration = Registration::try_from_input(valid_input).expect("valid");
        assert_eq!(registration.role, Role::Admin);
    }

    #[rstest]
    fn collects_every_failing_field(mut valid_input: RegistrationInput) {
        valid_input.email = Some("nope".into());
        valid_input.password = Some("weak".into());
        valid_input.phone = Some("123".into());
        valid_input.pincode = None;
        valid_input.first_name = Some("x".repeat(31));
        valid_input.role = Some("editor".into());

        let errors = Registration::try_from_input(valid_input).expect_err("invalid");

        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["email", "first_name", "password", "phone", "pincode", "role"]
        );
        assert_eq!(errors.get("password").map(<[String]>::len), Some(2));
        assert_eq!(
            errors.get("phone"),
            Some(&["Phone number must be exactly 10 digits.".to_owned()][..])
        );
        assert_eq!(
            errors.get("pincode"),
            Some(&[REQUIRED_MESSAGE.to_owned()][..])
        );
        assert_eq!(
            errors.get("role"),
            Some(&["\"editor\" is not a valid choice.".to_owned()][..])
        );
    }

    #[rstest]
    fn overlong_city_is_rejected(mut valid_input: RegistrationInput) {
        valid_input.city = Some("c".repeat(101));
        let errors = Registration::try_from_input(valid_input).expect_err("invalid");
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["city"]);
    }

    #[rstest]
    fn to_user_is_active_with_profile(valid_input: RegistrationInput) {
        let registration = Registration::try_from_input(valid_input).expect("valid");
        let id = UserId::random();
        let user = registration.to_user(id);

        assert_eq!(user.id(), &id);
        assert!(user.is_active());
        assert_eq!(user.email(), &registration.email);
    }
}
