//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccessTokenVerifier, ContentCommand, ContentQuery, LoginService, RegistrationService,
    TokenRefreshService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn RegistrationService>,
    pub login: Arc<dyn LoginService>,
    pub refresh: Arc<dyn TokenRefreshService>,
    pub tokens: Arc<dyn AccessTokenVerifier>,
    pub content: Arc<dyn ContentCommand>,
    pub content_query: Arc<dyn ContentQuery>,
}

impl HttpState {
    /// Wire state from a single service implementing every account port and
    /// another implementing both content ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use cms_backend::domain::{AccountService, ContentService};
    /// use cms_backend::inbound::http::state::HttpState;
    /// use cms_backend::outbound::credentials::Argon2PasswordHasher;
    /// use cms_backend::outbound::memory::InMemoryStore;
    /// use cms_backend::outbound::token::{JwtSettings, JwtTokenIssuer};
    /// use mockable::DefaultClock;
    ///
    /// let store = InMemoryStore::new();
    /// let users = Arc::new(store.users());
    /// let clock = Arc::new(DefaultClock);
    /// let tokens = JwtTokenIssuer::new(&[7; 32], JwtSettings::default(), clock.clone());
    /// let accounts = Arc::new(AccountService::new(
    ///     users.clone(),
    ///     Arc::new(Argon2PasswordHasher::new()),
    ///     Arc::new(tokens),
    /// ));
    /// let content = Arc::new(ContentService::new(Arc::new(store.content()), users, clock));
    /// let state = HttpState::from_services(accounts, content);
    /// let _login = state.login.clone();
    /// ```
    pub fn from_services<A, C>(accounts: Arc<A>, content: Arc<C>) -> Self
    where
        A: RegistrationService
            + LoginService
            + TokenRefreshService
            + AccessTokenVerifier
            + 'static,
        C: ContentCommand + ContentQuery + 'static,
    {
        Self {
            registration: accounts.clone(),
            login: accounts.clone(),
            refresh: accounts.clone(),
            tokens: accounts,
            content: content.clone(),
            content_query: content,
        }
    }
}
