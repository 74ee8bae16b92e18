//! Server settings loaded via OrthoConfig from CLI flags, `CMS_*`
//! environment variables, and configuration files.

use std::net::SocketAddr;

use chrono::Duration;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use cms_backend::outbound::token::JwtSettings;

const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("bind address `{value}` is not a socket address")]
    BindAddr { value: String },
    #[error("{name} must be a positive number of seconds, got {value}")]
    Ttl { name: &'static str, value: i64 },
}

/// Configuration values controlling the HTTP server and its stores.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CMS")]
pub struct ServerSettings {
    /// Socket address to listen on.
    #[ortho_config(default = "0.0.0.0:8080".to_owned())]
    pub bind_addr: String,
    /// PostgreSQL URL. Without one the server keeps everything in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Access token lifetime in seconds.
    pub access_ttl_secs: Option<i64>,
    /// Refresh token lifetime in seconds.
    pub refresh_ttl_secs: Option<i64>,
    /// `iss` claim written to and required on every token.
    pub token_issuer: Option<String>,
}

fn ttl(name: &'static str, value: Option<i64>, default: Duration) -> Result<Duration, SettingsError> {
    match value {
        None => Ok(default),
        Some(secs) if secs > 0 => Ok(Duration::seconds(secs)),
        Some(secs) => Err(SettingsError::Ttl { name, value: secs }),
    }
}

impl ServerSettings {
    /// Parse the configured listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr.parse().map_err(|_| SettingsError::BindAddr {
            value: self.bind_addr.clone(),
        })
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Token lifetimes and issuer, defaulting any value left unset.
    pub fn jwt_settings(&self) -> Result<JwtSettings, SettingsError> {
        let defaults = JwtSettings::default();
        Ok(JwtSettings {
            issuer: self.token_issuer.clone().unwrap_or(defaults.issuer),
            access_ttl: ttl("access_ttl_secs", self.access_ttl_secs, defaults.access_ttl)?,
            refresh_ttl: ttl("refresh_ttl_secs", self.refresh_ttl_secs, defaults.refresh_ttl)?,
        })
    }
}
