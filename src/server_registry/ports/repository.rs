//! Repository port for server descriptor persistence and lookup.

use crate::server_registry::domain::{ServerDescriptor, ServerId, ServerName};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for server registry operations.
pub type ServerRegistryResult<T> = Result<T, ServerRegistryError>;

/// Persistence contract for server descriptors.
#[async_trait]
pub trait ServerRegistryRepository: Send + Sync {
    /// Returns every stored descriptor.
    async fn list_all(&self) -> ServerRegistryResult<Vec<ServerDescriptor>>;

    /// Finds a descriptor by exact name.
    async fn find_by_name(
        &self,
        name: &ServerName,
    ) -> ServerRegistryResult<Option<ServerDescriptor>>;

    /// Finds the descriptor flagged as default, if any.
    async fn find_default(&self) -> ServerRegistryResult<Option<ServerDescriptor>>;

    /// Stores a new descriptor.
    ///
    /// When the descriptor is flagged as default, every existing default flag
    /// is cleared in the same atomic unit of work as the insert.
    ///
    /// # Errors
    ///
    /// Returns [`ServerRegistryError::DuplicateServerName`] when the name is
    /// already registered, leaving the registry unchanged.
    async fn create(&self, server: &ServerDescriptor) -> ServerRegistryResult<()>;

    /// Removes a descriptor by name.
    ///
    /// # Errors
    ///
    /// Returns [`ServerRegistryError::NotFound`] when no descriptor has the
    /// given name.
    async fn delete(&self, name: &ServerName) -> ServerRegistryResult<()>;
}

/// Errors returned by server registry repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ServerRegistryError {
    /// A descriptor with the same identifier already exists.
    #[error("duplicate server identifier: {0}")]
    DuplicateServer(ServerId),

    /// A descriptor with the same name already exists.
    #[error("server '{0}' already exists")]
    DuplicateServerName(ServerName),

    /// No descriptor has the given name.
    #[error("server '{0}' not found")]
    NotFound(ServerName),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted server data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ServerRegistryError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
