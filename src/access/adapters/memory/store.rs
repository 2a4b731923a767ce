//! In-memory key store keyed by digest.

use crate::access::{
    domain::{ApiKeyDigest, ApiKeyRecord},
    ports::{ApiKeyStore, ApiKeyStoreError, ApiKeyStoreResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory key store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryApiKeyStore {
    state: Arc<RwLock<HashMap<ApiKeyDigest, ApiKeyRecord>>>,
}

impl InMemoryApiKeyStore {
    /// Creates an empty key store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> ApiKeyStoreError {
    ApiKeyStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ApiKeyStore for InMemoryApiKeyStore {
    async fn find_by_digest(
        &self,
        digest: &ApiKeyDigest,
    ) -> ApiKeyStoreResult<Option<ApiKeyRecord>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(digest).cloned())
    }

    async fn touch_last_used(
        &self,
        digest: &ApiKeyDigest,
        used_at: DateTime<Utc>,
    ) -> ApiKeyStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if let Some(record) = state.get_mut(digest) {
            record.mark_used(used_at);
        }
        Ok(())
    }

    async fn create(&self, record: &ApiKeyRecord) -> ApiKeyStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let id_taken = state.values().any(|existing| existing.id() == record.id());
        if id_taken || state.contains_key(record.digest()) {
            return Err(ApiKeyStoreError::DuplicateKey(record.id()));
        }
        state.insert(record.digest().clone(), record.clone());
        Ok(())
    }

    async fn count(&self) -> ApiKeyStoreResult<u64> {
        let state = self.state.read().map_err(lock_error)?;
        u64::try_from(state.len()).map_err(ApiKeyStoreError::persistence)
    }
}
