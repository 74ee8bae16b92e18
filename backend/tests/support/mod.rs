//! Shared harness driving the full HTTP app over in-memory adapters.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use argon2::Params;
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};

use cms_backend::Trace;
use cms_backend::domain::{AccountService, ContentService};
use cms_backend::inbound::http::state::HttpState;
use cms_backend::inbound::http::{configure_api, json_config, query_config};
use cms_backend::outbound::credentials::Argon2PasswordHasher;
use cms_backend::outbound::memory::InMemoryStore;
use cms_backend::outbound::token::{JwtSettings, JwtTokenIssuer};

pub const PASSWORD: &str = "Secret123";

/// Handler state wired to real services over a fresh in-memory store.
pub fn in_memory_state() -> HttpState {
    let store = InMemoryStore::new();
    let users = Arc::new(store.users());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let params = Params::new(Params::MIN_M_COST, 1, 1, None).expect("cheap argon2 params");
    let tokens = JwtTokenIssuer::new(&[42; 32], JwtSettings::default(), clock.clone());
    let accounts = AccountService::new(
        users.clone(),
        Arc::new(Argon2PasswordHasher::with_params(params)),
        Arc::new(tokens),
    );
    let content = ContentService::new(Arc::new(store.content()), users, clock);
    HttpState::from_services(Arc::new(accounts), Arc::new(content))
}

/// Initialise the API exactly as the server mounts it.
pub async fn init_app(
    state: HttpState,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(json_config())
            .app_data(query_config())
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(configure_api)),
    )
    .await
}

/// Registration body for `email` with the given role.
pub fn registration(email: &str, role: &str) -> Value {
    json!({
        "email": email,
        "password": PASSWORD,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "phone": "9876543210",
        "pincode": "560001",
        "role": role
    })
}

/// Content body with the given title.
pub fn content(title: &str) -> Value {
    json!({
        "title": title,
        "body": "Figures for the month",
        "summary": "Headline numbers",
        "document": "report.pdf"
    })
}

/// A registered, logged-in user.
pub struct Session {
    pub id: String,
    pub access: String,
    pub refresh: String,
}

impl Session {
    pub fn bearer(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.access))
    }
}

pub async fn post_json<S>(app: &S, uri: &str, body: Value) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri(uri)
        .set_json(body)
        .to_request();
    test::call_service(app, request).await
}

/// Register `email` as `role` and log in.
pub async fn sign_up<S>(app: &S, email: &str, role: &str) -> Session
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let registered = post_json(app, "/api/v1/auth/register", registration(email, role)).await;
    assert_eq!(registered.status(), 201, "registration of {email}");

    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": email, "password": PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), 200, "login of {email}");
    let body: Value = test::read_body_json(response).await;
    let field = |name: &str| {
        body.get(name)
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| panic!("login response missing {name}"))
    };
    Session {
        id: field("id"),
        access: field("access_token"),
        refresh: field("refresh_token"),
    }
}

/// Create a content item as `session`, returning its id.
pub async fn create_item<S>(app: &S, session: &Session, title: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/content")
        .insert_header(session.bearer())
        .set_json(content(title))
        .to_request();
    let response = test::call_service(app, request).await;
    assert_eq!(response.status(), 201, "create {title}");
    let body: Value = test::read_body_json(response).await;
    body.get("id")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .expect("created item id")
}

/// GET `uri` as `session` and return the status with the JSON body.
pub async fn get_json<S>(app: &S, session: &Session, uri: &str) -> (u16, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::get()
        .uri(uri)
        .insert_header(session.bearer())
        .to_request();
    let response = test::call_service(app, request).await;
    let status = response.status().as_u16();
    let body = test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

/// Titles of a JSON array of content items.
pub fn titles(items: &Value) -> Vec<String> {
    items
        .as_array()
        .expect("item array")
        .iter()
        .filter_map(|item| item.get("title").and_then(Value::as_str))
        .map(str::to_owned)
        .collect()
}
