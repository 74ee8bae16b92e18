//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use actix_web::test;

use crate::domain::ports::{
    MockAccessTokenVerifier, MockContentCommand, MockContentQuery, MockLoginService,
    MockRegistrationService, MockTokenRefreshService,
};
use crate::domain::{
    Email, Error, PersonName, PhoneNumber, Pincode, Principal, Role, RoleClaim, User, UserId,
    UserProfile,
};
use crate::inbound::http::state::HttpState;

pub const ADMIN_ID: &str = "11111111-1111-1111-1111-111111111111";
pub const AUTHOR_ID: &str = "22222222-2222-2222-2222-222222222222";

/// Token accepted by [`token_table`] for the admin principal.
pub const ADMIN_TOKEN: &str = "admin-token";
/// Token accepted by [`token_table`] for the author principal.
pub const AUTHOR_TOKEN: &str = "author-token";
/// Token accepted by [`token_table`] carrying a role this build does not know.
pub const EDITOR_TOKEN: &str = "editor-token";

pub fn principal(id: &str, role: impl Into<RoleClaim>) -> Principal {
    Principal::new(UserId::new(id).expect("fixture user id"), role)
}

pub fn admin() -> Principal {
    principal(ADMIN_ID, Role::Admin)
}

pub fn author() -> Principal {
    principal(AUTHOR_ID, Role::Author)
}

/// Directory entry for the fixture user `id`.
pub fn user(id: &str, email: &str, role: Role) -> User {
    let profile = UserProfile {
        first_name: PersonName::new("Ada").expect("fixture first name"),
        last_name: PersonName::new("Lovelace").expect("fixture last name"),
        phone: PhoneNumber::new("9876543210").expect("fixture phone"),
        pincode: Pincode::new("560001").expect("fixture pincode"),
        address: None,
        city: None,
        state: None,
        country: None,
    };
    User::new(
        UserId::new(id).expect("fixture user id"),
        Email::new(email).expect("fixture email"),
        profile,
        role,
    )
}

/// Verifier resolving the fixture tokens to fixed principals.
pub fn token_table() -> MockAccessTokenVerifier {
    let mut verifier = MockAccessTokenVerifier::new();
    verifier.expect_verify().returning(|token| match token {
        ADMIN_TOKEN => Ok(admin()),
        AUTHOR_TOKEN => Ok(author()),
        EDITOR_TOKEN => Ok(principal(
            AUTHOR_ID,
            RoleClaim::Unrecognized("editor".to_owned()),
        )),
        _ => Err(Error::unauthorized("Token is invalid or expired")),
    });
    verifier
}

/// Builds [`HttpState`] from mocks; ports left unset panic when called.
#[derive(Default)]
pub struct StateBuilder {
    registration: Option<MockRegistrationService>,
    login: Option<MockLoginService>,
    refresh: Option<MockTokenRefreshService>,
    tokens: Option<MockAccessTokenVerifier>,
    content: Option<MockContentCommand>,
    content_query: Option<MockContentQuery>,
}

impl StateBuilder {
    pub fn registration(mut self, mock: MockRegistrationService) -> Self {
        self.registration = Some(mock);
        self
    }

    pub fn login(mut self, mock: MockLoginService) -> Self {
        self.login = Some(mock);
        self
    }

    pub fn refresh(mut self, mock: MockTokenRefreshService) -> Self {
        self.refresh = Some(mock);
        self
    }

    pub fn tokens(mut self, mock: MockAccessTokenVerifier) -> Self {
        self.tokens = Some(mock);
        self
    }

    pub fn content(mut self, mock: MockContentCommand) -> Self {
        self.content = Some(mock);
        self
    }

    pub fn content_query(mut self, mock: MockContentQuery) -> Self {
        self.content_query = Some(mock);
        self
    }

    pub fn build(self) -> HttpState {
        HttpState {
            registration: Arc::new(self.registration.unwrap_or_default()),
            login: Arc::new(self.login.unwrap_or_default()),
            refresh: Arc::new(self.refresh.unwrap_or_default()),
            tokens: Arc::new(self.tokens.unwrap_or_else(token_table)),
            content: Arc::new(self.content.unwrap_or_default()),
            content_query: Arc::new(self.content_query.unwrap_or_default()),
        }
    }
}

/// Decode an error response body.
pub async fn error_body(response: ServiceResponse) -> Error {
    test::read_body_json(response).await
}
