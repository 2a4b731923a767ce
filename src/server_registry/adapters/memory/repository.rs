//! In-memory repository for server descriptors.

use crate::server_registry::{
    domain::{ServerDescriptor, ServerName},
    ports::{ServerRegistryError, ServerRegistryRepository, ServerRegistryResult},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory server registry.
///
/// Descriptors are keyed by name, so listing iterates in name order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryServerRegistry {
    state: Arc<RwLock<BTreeMap<ServerName, ServerDescriptor>>>,
}

impl InMemoryServerRegistry {
    /// Creates an empty in-memory registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ServerRegistryRepository for InMemoryServerRegistry {
    async fn list_all(&self) -> ServerRegistryResult<Vec<ServerDescriptor>> {
        let state = self.state.read().map_err(|err| {
            ServerRegistryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.values().cloned().collect())
    }

    async fn find_by_name(
        &self,
        name: &ServerName,
    ) -> ServerRegistryResult<Option<ServerDescriptor>> {
        let state = self.state.read().map_err(|err| {
            ServerRegistryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(name).cloned())
    }

    async fn find_default(&self) -> ServerRegistryResult<Option<ServerDescriptor>> {
        let state = self.state.read().map_err(|err| {
            ServerRegistryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.values().find(|server| server.is_default()).cloned())
    }

    async fn create(&self, server: &ServerDescriptor) -> ServerRegistryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            ServerRegistryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        if state.contains_key(server.name()) {
            return Err(ServerRegistryError::DuplicateServerName(
                server.name().clone(),
            ));
        }

        if state.values().any(|existing| existing.id() == server.id()) {
            return Err(ServerRegistryError::DuplicateServer(server.id()));
        }

        // The write guard makes the flag flip and the insert one unit.
        if server.is_default() {
            for existing in state.values_mut() {
                existing.clear_default(server.created_at());
            }
        }

        state.insert(server.name().clone(), server.clone());
        Ok(())
    }

    async fn delete(&self, name: &ServerName) -> ServerRegistryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            ServerRegistryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state
            .remove(name)
            .map(drop)
            .ok_or_else(|| ServerRegistryError::NotFound(name.clone()))
    }
}
