//! Error classification shared by the HTTP and CLI façades.

use serde::Serialize;
use std::fmt;

/// Coarse error category used to pick a transport status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller input failed validation.
    Validation,
    /// A required argument was missing or empty.
    InvalidArgument,
    /// No valid API key was presented.
    Unauthenticated,
    /// The requested server is not registered.
    ServerNotFound,
    /// The requested container does not exist on the daemon.
    NotFound,
    /// A server with the same name already exists.
    DuplicateName,
    /// The daemon could not be reached.
    Connect,
    /// The daemon rejected or failed an operation.
    Upstream,
    /// Pulling an image before restart failed.
    Pull,
    /// The server registry storage failed.
    RegistryUnavailable,
    /// The API key storage failed.
    KeyStoreUnavailable,
}

impl ErrorKind {
    /// Returns the stable snake-case code for this kind.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::InvalidArgument => "invalid_argument",
            Self::Unauthenticated => "unauthenticated",
            Self::ServerNotFound => "server_not_found",
            Self::NotFound => "not_found",
            Self::DuplicateName => "duplicate_name",
            Self::Connect => "connect",
            Self::Upstream => "upstream",
            Self::Pull => "pull",
            Self::RegistryUnavailable => "registry_unavailable",
            Self::KeyStoreUnavailable => "key_store_unavailable",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.code())
    }
}
