//! Runtime configuration for the API server.

use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// Default listen address.
pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

/// Default bound on every daemon connect and request, in seconds.
pub const DEFAULT_DAEMON_TIMEOUT_SECS: u64 = 15;

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The database URL was blank.
    #[error("database URL is required")]
    MissingDatabaseUrl,

    /// The daemon timeout was zero.
    #[error("daemon timeout must be at least one second")]
    ZeroDaemonTimeout,
}

/// Validated API server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    bind: SocketAddr,
    database_url: String,
    daemon_timeout: Duration,
}

impl ApiConfig {
    /// Validates raw settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the database URL is blank or the timeout
    /// is zero.
    pub fn new(
        bind: SocketAddr,
        database_url: impl Into<String>,
        daemon_timeout_secs: u64,
    ) -> Result<Self, ConfigError> {
        let url = database_url.into().trim().to_owned();
        if url.is_empty() {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        if daemon_timeout_secs == 0 {
            return Err(ConfigError::ZeroDaemonTimeout);
        }
        Ok(Self {
            bind,
            database_url: url,
            daemon_timeout: Duration::from_secs(daemon_timeout_secs),
        })
    }

    /// Returns the listen address.
    #[must_use]
    pub const fn bind(&self) -> SocketAddr {
        self.bind
    }

    /// Returns the database URL.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Returns the daemon timeout.
    #[must_use]
    pub const fn daemon_timeout(&self) -> Duration {
        self.daemon_timeout
    }
}
