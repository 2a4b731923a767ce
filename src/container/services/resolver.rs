//! Resolution of a server selection into a live daemon session.

use crate::container::ports::{DaemonConnector, DaemonError, DaemonSession};
use crate::error::ErrorKind;
use crate::server_registry::{
    domain::{ServerDescriptor, ServerName},
    ports::{ServerRegistryError, ServerRegistryRepository},
};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Which registered server a request targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerSelection {
    /// The registry default.
    Default,
    /// A server by exact name.
    Named(String),
}

impl ServerSelection {
    /// Interprets an optional request parameter. Absent or blank input
    /// selects the default.
    #[must_use]
    pub fn from_param(server: Option<&str>) -> Self {
        match server.map(str::trim) {
            Some(name) if !name.is_empty() => Self::Named(name.to_owned()),
            _ => Self::Default,
        }
    }
}

impl fmt::Display for ServerSelection {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => formatter.write_str("default server"),
            Self::Named(name) => write!(formatter, "server '{name}'"),
        }
    }
}

/// Errors raised while resolving a daemon connection.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The selection matched no registered server.
    #[error("{0} not found")]
    ServerNotFound(ServerSelection),

    /// The registry could not be queried.
    #[error("server registry unavailable: {0}")]
    RegistryUnavailable(#[from] ServerRegistryError),

    /// The selected server's daemon could not be reached.
    #[error("cannot connect to server '{server}': {source}")]
    Connect {
        /// Server that was selected.
        server: ServerName,
        /// Underlying connector failure.
        source: DaemonError,
    },
}

impl ResolveError {
    /// Classifies the error for façade rendering.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ServerNotFound(_) => ErrorKind::ServerNotFound,
            Self::RegistryUnavailable(_) => ErrorKind::RegistryUnavailable,
            Self::Connect { .. } => ErrorKind::Connect,
        }
    }
}

/// A daemon session scoped to one operation.
///
/// Dropping the value closes the session.
pub struct ResolvedConnection {
    server: ServerDescriptor,
    session: Box<dyn DaemonSession>,
}

impl ResolvedConnection {
    /// Returns the server this connection is bound to.
    #[must_use]
    pub const fn server(&self) -> &ServerDescriptor {
        &self.server
    }

    /// Returns the daemon session.
    #[must_use]
    pub fn session(&self) -> &dyn DaemonSession {
        self.session.as_ref()
    }
}

impl fmt::Debug for ResolvedConnection {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ResolvedConnection")
            .field("server", self.server.name())
            .field("host", self.server.host())
            .finish_non_exhaustive()
    }
}

/// Maps server selections to daemon sessions.
pub struct DaemonClientResolver<R, D>
where
    R: ServerRegistryRepository,
    D: DaemonConnector,
{
    registry: Arc<R>,
    connector: Arc<D>,
}

impl<R, D> Clone for DaemonClientResolver<R, D>
where
    R: ServerRegistryRepository,
    D: DaemonConnector,
{
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            connector: Arc::clone(&self.connector),
        }
    }
}

impl<R, D> DaemonClientResolver<R, D>
where
    R: ServerRegistryRepository,
    D: DaemonConnector,
{
    /// Creates a resolver over a registry and a connector.
    #[must_use]
    pub const fn new(registry: Arc<R>, connector: Arc<D>) -> Self {
        Self {
            registry,
            connector,
        }
    }

    /// Resolves a selection to a connected session.
    ///
    /// A named server that does not exist is never replaced by the default,
    /// and a failed connection is never retried against another server.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::ServerNotFound`] when nothing matches,
    /// [`ResolveError::RegistryUnavailable`] when the lookup fails and
    /// [`ResolveError::Connect`] when the daemon is unreachable.
    pub async fn resolve(
        &self,
        selection: ServerSelection,
    ) -> Result<ResolvedConnection, ResolveError> {
        let server = self
            .find_server(&selection)
            .await?
            .ok_or(ResolveError::ServerNotFound(selection))?;

        let session = self
            .connector
            .connect(server.host())
            .await
            .map_err(|source| ResolveError::Connect {
                server: server.name().clone(),
                source,
            })?;

        tracing::debug!(server = %server.name(), host = %server.host(), "resolved daemon");
        Ok(ResolvedConnection { server, session })
    }

    async fn find_server(
        &self,
        selection: &ServerSelection,
    ) -> Result<Option<ServerDescriptor>, ResolveError> {
        match selection {
            ServerSelection::Default => Ok(self.registry.find_default().await?),
            ServerSelection::Named(name) => {
                let Ok(server_name) = ServerName::new(name.as_str()) else {
                    return Ok(None);
                };
                Ok(self.registry.find_by_name(&server_name).await?)
            }
        }
    }
}
