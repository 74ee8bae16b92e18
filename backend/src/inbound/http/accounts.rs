//! Account HTTP handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"email":"ada@example.com","password":"Secret123",...}
//! POST /api/v1/auth/login {"email":"ada@example.com","password":"Secret123"}
//! POST /api/v1/auth/token/refresh {"refresh_token":"..."}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    Email, Error, FieldErrors, LoginCredentials, LoginValidationError, Registration, RegistrationInput,
    Role, User,
};
use crate::domain::validation::REQUIRED_MESSAGE;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

const REGISTERED_MESSAGE: &str = "Registration successful!";
const LOGGED_IN_MESSAGE: &str = "Login successful!";

/// Registration request body for `POST /api/v1/auth/register`.
///
/// Every field is optional at the wire level so missing fields are reported
/// alongside other validation failures.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "Secret123")]
    pub password: Option<String>,
    pub username: Option<String>,
    #[schema(example = "Ada")]
    pub first_name: Option<String>,
    #[schema(example = "Lovelace")]
    pub last_name: Option<String>,
    #[schema(example = "9876543210")]
    pub phone: Option<String>,
    #[schema(example = "560001")]
    pub pincode: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    #[schema(example = "author")]
    pub role: Option<String>,
}

impl From<RegisterRequest> for RegistrationInput {
    fn from(value: RegisterRequest) -> Self {
        Self {
            email: value.email,
            password: value.password,
            username: value.username,
            first_name: value.first_name,
            last_name: value.last_name,
            phone: value.phone,
            pincode: value.pincode,
            address: value.address,
            city: value.city,
            state: value.state,
            country: value.country,
            role: value.role,
        }
    }
}

/// Identity returned after registration. Never carries the credential.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub message: String,
}

impl From<&User> for RegisterResponse {
    fn from(user: &User) -> Self {
        let profile = user.profile();
        Self {
            id: user.id().to_string(),
            first_name: profile.first_name.as_str().to_owned(),
            last_name: profile.last_name.as_str().to_owned(),
            email: user.email().as_str().to_owned(),
            message: REGISTERED_MESSAGE.to_owned(),
        }
    }
}

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "Secret123")]
    pub password: Option<String>,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            value.email.as_deref().unwrap_or_default(),
            value.password.as_deref().unwrap_or_default(),
        )
    }
}

/// Successful login payload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub access_token: String,
    pub refresh_token: String,
    pub message: String,
}

/// Refresh request body for `POST /api/v1/auth/token/refresh`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Freshly minted access token.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub access_token: String,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => Error::invalid_request("email must not be empty")
            .with_details(json!({ "field": "email", "code": "empty_email" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Invalid or duplicate registration", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let input: RegistrationInput = payload.into_inner().into();
    if let Some(email) = input.email.as_deref().and_then(|raw| Email::new(raw).ok()) {
        state.registration.ensure_email_available(&email).await?;
    }
    let registration = Registration::try_from_input(input).map_err(Error::from)?;
    let user = state.registration.register(registration).await?;
    Ok(HttpResponse::Created().json(RegisterResponse::from(&user)))
}

/// Exchange credentials for an access and refresh token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid credentials or disabled account", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let outcome = state.login.login(&credentials).await?;
    let profile = outcome.user.profile();
    Ok(web::Json(LoginResponse {
        id: outcome.user.id().to_string(),
        first_name: profile.first_name.as_str().to_owned(),
        last_name: profile.last_name.as_str().to_owned(),
        role: outcome.user.role(),
        access_token: outcome.tokens.access.clone(),
        refresh_token: outcome.tokens.refresh.clone(),
        message: LOGGED_IN_MESSAGE.to_owned(),
    }))
}

/// Mint a new access token from a refresh token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/token/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = RefreshResponse),
        (status = 400, description = "Missing refresh token or disabled account", body = ErrorSchema),
        (status = 401, description = "Refresh token invalid or expired", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "refreshToken",
    security([])
)]
#[post("/auth/token/refresh")]
pub async fn refresh_token(
    state: web::Data<HttpState>,
    payload: web::Json<RefreshRequest>,
) -> ApiResult<web::Json<RefreshResponse>> {
    let Some(token) = payload
        .into_inner()
        .refresh_token
        .filter(|token| !token.trim().is_empty())
    else {
        let mut errors = FieldErrors::new();
        errors.push("refresh_token", REQUIRED_MESSAGE);
        return Err(errors.into());
    };
    let access_token = state.refresh.refresh(token.trim()).await?;
    Ok(web::Json(RefreshResponse { access_token }))
}
