//! Validated Docker daemon host URIs.

use super::ServerDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Host URI of the local daemon on this platform.
#[cfg(not(windows))]
pub const LOCAL_DAEMON_HOST: &str = "unix:///var/run/docker.sock";

/// Host URI of the local daemon on this platform.
#[cfg(windows)]
pub const LOCAL_DAEMON_HOST: &str = "npipe:////./pipe/docker_engine";

/// Transport scheme of a daemon host URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostScheme {
    /// Unix domain socket (`unix://`).
    Unix,
    /// Plain TCP (`tcp://`).
    Tcp,
    /// Plain HTTP (`http://`).
    Http,
    /// Windows named pipe (`npipe://`).
    NamedPipe,
}

impl HostScheme {
    const ALL: [Self; 4] = [Self::Unix, Self::Tcp, Self::Http, Self::NamedPipe];

    /// Returns the URI prefix including the `://` separator.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Unix => "unix://",
            Self::Tcp => "tcp://",
            Self::Http => "http://",
            Self::NamedPipe => "npipe://",
        }
    }
}

/// Validated daemon host URI such as `unix:///var/run/docker.sock`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DaemonHost {
    uri: String,
    scheme: HostScheme,
}

impl DaemonHost {
    /// Creates a validated daemon host.
    ///
    /// # Errors
    ///
    /// Returns [`ServerDomainError`] when the URI is empty, has an
    /// unsupported scheme, or has nothing after the scheme.
    pub fn new(value: impl Into<String>) -> Result<Self, ServerDomainError> {
        let raw = value.into();
        let uri = raw.trim();
        if uri.is_empty() {
            return Err(ServerDomainError::EmptyHost);
        }

        let scheme = HostScheme::ALL
            .into_iter()
            .find(|candidate| uri.starts_with(candidate.prefix()))
            .ok_or_else(|| ServerDomainError::UnsupportedHostScheme(uri.to_owned()))?;

        if uri.len() == scheme.prefix().len() {
            return Err(ServerDomainError::MissingHostAddress(uri.to_owned()));
        }

        Ok(Self {
            uri: uri.to_owned(),
            scheme,
        })
    }

    /// Returns the host for the local daemon on this platform.
    #[must_use]
    pub fn local() -> Self {
        Self {
            uri: LOCAL_DAEMON_HOST.to_owned(),
            scheme: if cfg!(windows) {
                HostScheme::NamedPipe
            } else {
                HostScheme::Unix
            },
        }
    }

    /// Returns the full URI.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// Returns the transport scheme.
    #[must_use]
    pub const fn scheme(&self) -> HostScheme {
        self.scheme
    }

    /// Returns the portion of the URI after the scheme separator.
    #[must_use]
    pub fn address(&self) -> &str {
        self.uri
            .strip_prefix(self.scheme.prefix())
            .unwrap_or(&self.uri)
    }
}

impl fmt::Display for DaemonHost {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.uri)
    }
}

impl TryFrom<String> for DaemonHost {
    type Error = ServerDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DaemonHost> for String {
    fn from(value: DaemonHost) -> Self {
        value.uri
    }
}
