//! Service layer for server registration, lookup and bootstrap.
//!
//! Provides [`ServerRegistryService`] which validates caller input before it
//! reaches the repository and seeds the `local` descriptor into an empty
//! registry.

use crate::error::ErrorKind;
use crate::server_registry::{
    domain::{
        DaemonHost, LOCAL_SERVER_DESCRIPTION, LOCAL_SERVER_NAME, ServerDescriptor,
        ServerDomainError, ServerName,
    },
    ports::{ServerRegistryError, ServerRegistryRepository},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for registering a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterServerRequest {
    name: String,
    host: String,
    description: Option<String>,
    is_default: bool,
}

impl RegisterServerRequest {
    /// Creates a request for a non-default server without a description.
    #[must_use]
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            description: None,
            is_default: false,
        }
    }

    /// Sets the free-form description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the server as the registry default.
    #[must_use]
    pub const fn as_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }
}

/// Service-level errors for server registry operations.
#[derive(Debug, Error)]
pub enum ServerRegistryServiceError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] ServerDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ServerRegistryError),
    /// The name given for removal can never match a registered server.
    #[error("server '{0}' not found")]
    UnknownServer(String),
}

impl ServerRegistryServiceError {
    /// Classifies the error for façade rendering.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::Repository(ServerRegistryError::DuplicateServerName(_)) => {
                ErrorKind::DuplicateName
            }
            Self::Repository(ServerRegistryError::NotFound(_)) | Self::UnknownServer(_) => {
                ErrorKind::ServerNotFound
            }
            Self::Repository(
                ServerRegistryError::DuplicateServer(_)
                | ServerRegistryError::InvalidPersistedData(_)
                | ServerRegistryError::Persistence(_),
            ) => ErrorKind::RegistryUnavailable,
        }
    }
}

/// Result type for server registry service operations.
pub type ServerRegistryServiceResult<T> = Result<T, ServerRegistryServiceError>;

/// Server registration and lookup service.
pub struct ServerRegistryService<R, C>
where
    R: ServerRegistryRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for ServerRegistryService<R, C>
where
    R: ServerRegistryRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> ServerRegistryService<R, C>
where
    R: ServerRegistryRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new server registry service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Returns every registered server.
    ///
    /// # Errors
    ///
    /// Returns [`ServerRegistryServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn list(&self) -> ServerRegistryServiceResult<Vec<ServerDescriptor>> {
        Ok(self.repository.list_all().await?)
    }

    /// Finds a server by exact name.
    ///
    /// Returns `Ok(None)` when the name is unknown, including names that could
    /// never have been registered.
    ///
    /// # Errors
    ///
    /// Returns [`ServerRegistryServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn get_by_name(
        &self,
        name: &str,
    ) -> ServerRegistryServiceResult<Option<ServerDescriptor>> {
        let Ok(server_name) = ServerName::new(name) else {
            return Ok(None);
        };
        Ok(self.repository.find_by_name(&server_name).await?)
    }

    /// Returns the default server, if one is registered.
    ///
    /// # Errors
    ///
    /// Returns [`ServerRegistryServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn get_default(&self) -> ServerRegistryServiceResult<Option<ServerDescriptor>> {
        Ok(self.repository.find_default().await?)
    }

    /// Registers a new server.
    ///
    /// # Errors
    ///
    /// Returns [`ServerRegistryServiceError::Domain`] when the name or host is
    /// invalid, or [`ServerRegistryServiceError::Repository`] when the name is
    /// taken or persistence fails.
    pub async fn create(
        &self,
        request: RegisterServerRequest,
    ) -> ServerRegistryServiceResult<ServerDescriptor> {
        let RegisterServerRequest {
            name,
            host,
            description,
            is_default,
        } = request;

        let server_name = ServerName::new(name)?;
        let daemon_host = DaemonHost::new(host)?;
        let descriptor = ServerDescriptor::new(
            server_name,
            daemon_host,
            description,
            is_default,
            &*self.clock,
        );
        self.repository.create(&descriptor).await?;
        tracing::debug!(
            server = %descriptor.name(),
            host = %descriptor.host(),
            is_default,
            "registered server"
        );
        Ok(descriptor)
    }

    /// Removes a server by name.
    ///
    /// # Errors
    ///
    /// Returns [`ServerRegistryServiceError::UnknownServer`] or a wrapped
    /// [`ServerRegistryError::NotFound`] when no server has the given name, or
    /// other repository errors.
    pub async fn delete(&self, name: &str) -> ServerRegistryServiceResult<()> {
        let server_name = ServerName::new(name)
            .map_err(|_| ServerRegistryServiceError::UnknownServer(name.to_owned()))?;
        self.repository.delete(&server_name).await?;
        Ok(())
    }

    /// Seeds the `local` default descriptor when the registry is empty.
    ///
    /// Returns the seeded descriptor, or `None` when servers already exist.
    ///
    /// # Errors
    ///
    /// Returns repository errors when listing or inserting fails.
    pub async fn bootstrap(&self) -> ServerRegistryServiceResult<Option<ServerDescriptor>> {
        if !self.repository.list_all().await?.is_empty() {
            return Ok(None);
        }

        let descriptor = ServerDescriptor::new(
            ServerName::new(LOCAL_SERVER_NAME)?,
            DaemonHost::local(),
            Some(LOCAL_SERVER_DESCRIPTION.to_owned()),
            true,
            &*self.clock,
        );
        self.repository.create(&descriptor).await?;
        tracing::info!(host = %descriptor.host(), "seeded local server into empty registry");
        Ok(Some(descriptor))
    }
}
