//! Tests for the account service.

use std::sync::Arc;

use chrono::Utc;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    MockPasswordHasher, MockTokenIssuer, MockUserRepository, UserCredentials,
};
use crate::domain::{
    ErrorCode, PasswordDigest, RegistrationInput, Role, RoleClaim, TokenClaims,
};

type Service = AccountService<MockUserRepository, MockPasswordHasher, MockTokenIssuer>;

fn service(
    users: MockUserRepository,
    hasher: MockPasswordHasher,
    tokens: MockTokenIssuer,
) -> Service {
    AccountService::new(Arc::new(users), Arc::new(hasher), Arc::new(tokens))
}

#[fixture]
fn registration() -> Registration {
    Registration::try_from_input(RegistrationInput {
        email: Some("ada@example.com".into()),
        password: Some("Secret123".into()),
        first_name: Some("Ada".into()),
        last_name: Some("Lovelace".into()),
        phone: Some("9876543210".into()),
        pincode: Some("560001".into()),
        ..RegistrationInput::default()
    })
    .expect("valid registration")
}

fn stored(registration: &Registration, role: Role, active: bool) -> UserCredentials {
    let user = User::new(
        UserId::random(),
        registration.email.clone(),
        registration.profile.clone(),
        role,
    )
    .with_active(active);
    UserCredentials {
        user,
        password_hash: PasswordDigest::new("$argon2id$v=19$stub"),
    }
}

fn claims_for(user: &User, kind: TokenKind) -> TokenClaims {
    TokenClaims {
        subject: *user.id(),
        role: RoleClaim::Known(user.role()),
        kind,
        expires_at: Utc::now(),
    }
}

#[rstest]
#[tokio::test]
async fn register_hashes_password_and_inserts(registration: Registration) {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().times(1).return_once(|_| Ok(None));
    users
        .expect_insert()
        .withf(|user, digest| {
            user.email().as_str() == "ada@example.com"
                && user.is_active()
                && digest.as_str() == "$argon2id$hashed"
        })
        .times(1)
        .return_once(|_, _| Ok(()));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .withf(|password| password.expose() == "Secret123")
        .times(1)
        .return_once(|_| Ok(PasswordDigest::new("$argon2id$hashed")));

    let user = service(users, hasher, MockTokenIssuer::new())
        .register(registration)
        .await
        .expect("registration succeeds");

    assert_eq!(user.role(), Role::Author);
    assert_eq!(user.profile().first_name.as_str(), "Ada");
}

#[rstest]
#[tokio::test]
async fn register_rejects_taken_email(registration: Registration) {
    let existing = stored(&registration, Role::Author, true);
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    users.expect_insert().times(0);
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().times(0);

    let err = service(users, hasher, MockTokenIssuer::new())
        .register(registration)
        .await
        .expect_err("duplicate email");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "A user with this email already exists.");
    assert_eq!(
        err.details().and_then(|d| d["code"].as_str()),
        Some("duplicate_email")
    );
}

#[rstest]
#[tokio::test]
async fn register_rejects_taken_username(mut registration: Registration) {
    registration.username = Some("grace@example.com".into());
    let existing = stored(&registration, Role::Author, true);
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .withf(|email| email.as_str() == "ada@example.com")
        .times(1)
        .return_once(|_| Ok(None));
    users
        .expect_find_by_email()
        .withf(|email| email.as_str() == "grace@example.com")
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    users.expect_insert().times(0);

    let err = service(users, MockPasswordHasher::new(), MockTokenIssuer::new())
        .register(registration)
        .await
        .expect_err("duplicate username");

    assert_eq!(err.message(), "Username already taken.");
}

#[rstest]
#[tokio::test]
async fn register_maps_insert_race_to_duplicate_email(registration: Registration) {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));
    users
        .expect_insert()
        .return_once(|_, _| Err(UserPersistenceError::duplicate_email()));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .return_once(|_| Ok(PasswordDigest::new("$argon2id$hashed")));

    let err = service(users, hasher, MockTokenIssuer::new())
        .register(registration)
        .await
        .expect_err("duplicate email");

    assert_eq!(
        err.details().and_then(|d| d["code"].as_str()),
        Some("duplicate_email")
    );
}

#[rstest]
#[tokio::test]
async fn register_maps_connection_failure_to_service_unavailable(registration: Registration) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(|_| Err(UserPersistenceError::connection("pool exhausted")));

    let err = service(users, MockPasswordHasher::new(), MockTokenIssuer::new())
        .register(registration)
        .await
        .expect_err("unavailable");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[case(Role::Author)]
#[case(Role::Admin)]
#[tokio::test]
async fn login_issues_tokens_bound_to_stored_role(registration: Registration, #[case] role: Role) {
    let record = stored(&registration, role, true);
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(record)));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .withf(|candidate, _| candidate == "Secret123")
        .return_once(|_, _| Ok(true));
    let mut tokens = MockTokenIssuer::new();
    tokens
        .expect_issue()
        .withf(move |user, kind| user.role() == role && *kind == TokenKind::Access)
        .times(1)
        .return_once(|_, _| Ok("access".to_owned()));
    tokens
        .expect_issue()
        .withf(move |user, kind| user.role() == role && *kind == TokenKind::Refresh)
        .times(1)
        .return_once(|_, _| Ok("refresh".to_owned()));

    let credentials =
        LoginCredentials::try_from_parts("ADA@example.com", "Secret123").expect("credentials");
    let outcome = service(users, hasher, tokens)
        .login(&credentials)
        .await
        .expect("login succeeds");

    assert_eq!(outcome.user.role(), role);
    assert_eq!(outcome.tokens.access, "access");
    assert_eq!(outcome.tokens.refresh, "refresh");
}

#[rstest]
#[tokio::test]
async fn login_with_unknown_email_is_invalid_credentials() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .return_once(|_| Ok(PasswordDigest::new("$argon2id$decoy")));
    // A matching decoy must still be rejected.
    hasher
        .expect_verify()
        .withf(|candidate, digest| candidate == "Secret123" && digest.as_str() == "$argon2id$decoy")
        .times(1)
        .return_once(|_, _| Ok(true));
    let mut tokens = MockTokenIssuer::new();
    tokens.expect_issue().times(0);

    let credentials =
        LoginCredentials::try_from_parts("nobody@example.com", "Secret123").expect("credentials");
    let err = service(users, hasher, tokens)
        .login(&credentials)
        .await
        .expect_err("unknown user");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "Invalid email or password.");
}

#[rstest]
#[tokio::test]
async fn unknown_email_logins_reuse_one_decoy_digest() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().times(2).returning(|_| Ok(None));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .return_once(|_| Ok(PasswordDigest::new("$argon2id$decoy")));
    hasher.expect_verify().times(2).returning(|_, _| Ok(false));
    let service = service(users, hasher, MockTokenIssuer::new());

    for email in ["nobody@example.com", "someone@example.com"] {
        let credentials =
            LoginCredentials::try_from_parts(email, "Secret123").expect("credentials");
        let err = service.login(&credentials).await.expect_err("unknown user");
        assert_eq!(err.message(), "Invalid email or password.");
    }
}

#[rstest]
#[tokio::test]
async fn decoy_hashing_failure_still_reports_invalid_credentials() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .return_once(|_| Err(PasswordHashError::hash("worker gone")));
    hasher.expect_verify().times(0);

    let credentials =
        LoginCredentials::try_from_parts("nobody@example.com", "Secret123").expect("credentials");
    let err = service(users, hasher, MockTokenIssuer::new())
        .login(&credentials)
        .await
        .expect_err("unknown user");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "Invalid email or password.");
}

#[rstest]
#[tokio::test]
async fn login_with_wrong_password_is_invalid_credentials(registration: Registration) {
    let record = stored(&registration, Role::Author, true);
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(record)));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().return_once(|_, _| Ok(false));
    let mut tokens = MockTokenIssuer::new();
    tokens.expect_issue().times(0);

    let credentials =
        LoginCredentials::try_from_parts("ada@example.com", "Wrong123").expect("credentials");
    let err = service(users, hasher, tokens)
        .login(&credentials)
        .await
        .expect_err("wrong password");

    assert_eq!(
        err.details().and_then(|d| d["code"].as_str()),
        Some("invalid_credentials")
    );
}

#[rstest]
#[tokio::test]
async fn login_to_disabled_account_is_rejected(registration: Registration) {
    let record = stored(&registration, Role::Author, false);
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(record)));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().return_once(|_, _| Ok(true));

    let credentials =
        LoginCredentials::try_from_parts("ada@example.com", "Secret123").expect("credentials");
    let err = service(users, hasher, MockTokenIssuer::new())
        .login(&credentials)
        .await
        .expect_err("disabled");

    assert_eq!(err.message(), "User account is disabled.");
}

#[rstest]
#[tokio::test]
async fn refresh_mints_access_token_for_current_user(registration: Registration) {
    let record = stored(&registration, Role::Admin, true);
    let claims = claims_for(&record.user, TokenKind::Refresh);
    let user = record.user.clone();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(user)));
    let mut tokens = MockTokenIssuer::new();
    tokens
        .expect_verify()
        .withf(|token, kind| token == "refresh-token" && *kind == TokenKind::Refresh)
        .return_once(move |_, _| Ok(claims));
    tokens
        .expect_issue()
        .withf(|_, kind| *kind == TokenKind::Access)
        .return_once(|_, _| Ok("new-access".to_owned()));

    let access = service(users, MockPasswordHasher::new(), tokens)
        .refresh("refresh-token")
        .await
        .expect("refresh succeeds");

    assert_eq!(access, "new-access");
}

#[rstest]
#[case(TokenError::expired())]
#[case(TokenError::wrong_kind("refresh"))]
#[case(TokenError::invalid("bad signature"))]
#[tokio::test]
async fn refresh_rejects_unverifiable_tokens(#[case] failure: TokenError) {
    let mut tokens = MockTokenIssuer::new();
    tokens.expect_verify().return_once(move |_, _| Err(failure));

    let err = service(MockUserRepository::new(), MockPasswordHasher::new(), tokens)
        .refresh("token")
        .await
        .expect_err("rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn verify_returns_principal_with_token_role(registration: Registration) {
    let record = stored(&registration, Role::Author, true);
    let mut claims = claims_for(&record.user, TokenKind::Access);
    claims.role = RoleClaim::Unrecognized("editor".into());
    let user = record.user.clone();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(user)));
    let mut tokens = MockTokenIssuer::new();
    tokens.expect_verify().return_once(move |_, _| Ok(claims));

    let principal = service(users, MockPasswordHasher::new(), tokens)
        .verify("access-token")
        .await
        .expect("verified");

    assert_eq!(principal.user_id, *record.user.id());
    assert_eq!(principal.role, RoleClaim::Unrecognized("editor".into()));
}

#[rstest]
#[case(None)]
#[case(Some(false))]
#[tokio::test]
async fn verify_rejects_missing_or_inactive_users(
    registration: Registration,
    #[case] active: Option<bool>,
) {
    let record = stored(&registration, Role::Author, active.unwrap_or(true));
    let claims = claims_for(&record.user, TokenKind::Access);
    let found = active.map(|_| record.user);
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().return_once(move |_| Ok(found));
    let mut tokens = MockTokenIssuer::new();
    tokens.expect_verify().return_once(move |_, _| Ok(claims));

    let err = service(users, MockPasswordHasher::new(), tokens)
        .verify("access-token")
        .await
        .expect_err("rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
}
