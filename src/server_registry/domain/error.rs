//! Error types for server registry domain validation.

use thiserror::Error;

/// Errors returned while constructing server registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServerDomainError {
    /// The server name is empty after trimming.
    #[error("server name must not be empty")]
    EmptyServerName,

    /// The server name contains characters outside `[A-Za-z0-9._-]`.
    #[error(
        "server name '{0}' contains invalid characters (only ASCII alphanumerics, '.', '_' and '-' allowed)"
    )]
    InvalidServerName(String),

    /// The server name exceeds the 100-character storage limit.
    #[error("server name exceeds 100 character limit: {0}")]
    ServerNameTooLong(String),

    /// The daemon host URI is empty after trimming.
    #[error("daemon host must not be empty")]
    EmptyHost,

    /// The daemon host URI uses a scheme the daemon client cannot dial.
    #[error(
        "daemon host '{0}' must start with 'unix://', 'tcp://', 'http://' or 'npipe://'"
    )]
    UnsupportedHostScheme(String),

    /// The daemon host URI has a scheme but no address after it.
    #[error("daemon host '{0}' has no address after its scheme")]
    MissingHostAddress(String),
}
