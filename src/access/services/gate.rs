//! Access gate validating presented API keys.

use crate::access::{
    domain::{ApiKeyRecord, ApiKeySecret, BOOTSTRAP_KEY_DESCRIPTION, IssuedApiKey},
    ports::{ApiKeyStore, ApiKeyStoreError},
};
use crate::error::ErrorKind;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by the access gate.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The key was missing, blank or unknown.
    #[error("invalid or missing API key")]
    Unauthenticated,

    /// The key store could not be queried or written.
    #[error("API key store unavailable: {0}")]
    KeyStoreUnavailable(#[from] ApiKeyStoreError),
}

impl AccessError {
    /// Classifies the error for façade rendering.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthenticated => ErrorKind::Unauthenticated,
            Self::KeyStoreUnavailable(_) => ErrorKind::KeyStoreUnavailable,
        }
    }
}

/// Authenticates callers by API key and issues new keys.
pub struct AccessGate<S, C>
where
    S: ApiKeyStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> Clone for AccessGate<S, C>
where
    S: ApiKeyStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, C> AccessGate<S, C>
where
    S: ApiKeyStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a new access gate.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Validates a presented key.
    ///
    /// On success the key's last-use timestamp is refreshed in a detached
    /// task; that update never affects the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Unauthenticated`] when the key is absent, blank
    /// or unknown, and [`AccessError::KeyStoreUnavailable`] when the lookup
    /// itself fails.
    pub async fn authenticate(&self, presented: Option<&str>) -> Result<ApiKeyRecord, AccessError> {
        let secret = presented
            .and_then(ApiKeySecret::presented)
            .ok_or(AccessError::Unauthenticated)?;
        let digest = secret.digest();

        let record = self
            .store
            .find_by_digest(&digest)
            .await?
            .ok_or(AccessError::Unauthenticated)?;

        let store = Arc::clone(&self.store);
        let used_at = self.clock.utc();
        tokio::spawn(async move {
            if let Err(err) = store.touch_last_used(&digest, used_at).await {
                tracing::warn!(error = %err, "failed to record API key use");
            }
        });

        Ok(record)
    }

    /// Generates and stores a new key.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::KeyStoreUnavailable`] when the key cannot be
    /// stored.
    pub async fn provision(&self, description: &str) -> Result<IssuedApiKey, AccessError> {
        let secret = ApiKeySecret::generate();
        let record = ApiKeyRecord::new(&secret, description, &*self.clock);
        self.store.create(&record).await?;
        tracing::debug!(key_id = %record.id(), "provisioned API key");
        Ok(IssuedApiKey::new(record, secret))
    }

    /// Issues a first key when the store is empty.
    ///
    /// The plaintext is written once to the startup log and returned.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::KeyStoreUnavailable`] when counting or storing
    /// fails.
    pub async fn bootstrap(&self) -> Result<Option<IssuedApiKey>, AccessError> {
        if self.store.count().await? > 0 {
            return Ok(None);
        }

        let issued = self.provision(BOOTSTRAP_KEY_DESCRIPTION).await?;
        tracing::info!(
            api_key = issued.secret().expose(),
            "created default API key; store it now, it will not be shown again"
        );
        Ok(Some(issued))
    }
}
