//! Key store port for API key records.

use crate::access::domain::{ApiKeyDigest, ApiKeyId, ApiKeyRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for key store operations.
pub type ApiKeyStoreResult<T> = Result<T, ApiKeyStoreError>;

/// Persistence contract for API key records.
#[async_trait]
pub trait ApiKeyStore: Send + Sync {
    /// Finds a record by key digest.
    async fn find_by_digest(&self, digest: &ApiKeyDigest)
    -> ApiKeyStoreResult<Option<ApiKeyRecord>>;

    /// Records a successful authentication at `used_at`.
    ///
    /// Implementations keep the later of the stored and supplied timestamps.
    /// Touching an unknown digest is a no-op.
    async fn touch_last_used(
        &self,
        digest: &ApiKeyDigest,
        used_at: DateTime<Utc>,
    ) -> ApiKeyStoreResult<()>;

    /// Stores a new record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiKeyStoreError::DuplicateKey`] when the identifier or
    /// digest already exists.
    async fn create(&self, record: &ApiKeyRecord) -> ApiKeyStoreResult<()>;

    /// Returns the number of stored records.
    async fn count(&self) -> ApiKeyStoreResult<u64>;
}

/// Errors returned by key store implementations.
#[derive(Debug, Clone, Error)]
pub enum ApiKeyStoreError {
    /// A record with the same identifier or digest already exists.
    #[error("duplicate API key: {0}")]
    DuplicateKey(ApiKeyId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted API key data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ApiKeyStoreError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
