//! Builders wiring repositories, credentials, and tokens into [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use cms_backend::domain::ports::{ContentRepository, UserRepository};
use cms_backend::domain::{AccountService, ContentService};
use cms_backend::inbound::http::state::HttpState;
use cms_backend::outbound::credentials::Argon2PasswordHasher;
use cms_backend::outbound::memory::InMemoryStore;
use cms_backend::outbound::persistence::{DieselContentRepository, DieselUserRepository};
use cms_backend::outbound::token::JwtTokenIssuer;

use super::ServerConfig;

fn wire<U, C>(users: Arc<U>, content: Arc<C>, config: &ServerConfig) -> HttpState
where
    U: UserRepository + 'static,
    C: ContentRepository + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let tokens = JwtTokenIssuer::new(
        config.token_secret.as_bytes(),
        config.jwt.clone(),
        clock.clone(),
    );
    let accounts = AccountService::new(
        users.clone(),
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(tokens),
    );
    let content = ContentService::new(content, users, clock);
    HttpState::from_services(Arc::new(accounts), Arc::new(content))
}

/// Build handler state over Diesel when a pool is configured, otherwise over
/// a fresh in-memory store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => wire(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselContentRepository::new(pool.clone())),
            config,
        ),
        None => {
            let store = InMemoryStore::new();
            wire(Arc::new(store.users()), Arc::new(store.content()), config)
        }
    };
    web::Data::new(state)
}
