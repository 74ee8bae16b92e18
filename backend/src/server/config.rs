//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use cms_backend::outbound::persistence::DbPool;
use cms_backend::outbound::token::{JwtSettings, TokenSecret};

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) token_secret: TokenSecret,
    pub(crate) jwt: JwtSettings,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration backed by in-memory stores.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, token_secret: TokenSecret, jwt: JwtSettings) -> Self {
        Self {
            bind_addr,
            token_secret,
            jwt,
            db_pool: None,
        }
    }

    /// Attach a database connection pool so the Diesel adapters are used.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
