//! Stored API key records.

use super::{ApiKeyDigest, ApiKeyId, ApiKeySecret};
use chrono::{DateTime, Utc};
use mockable::Clock;

/// Stored API key, identified by its digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyRecord {
    id: ApiKeyId,
    digest: ApiKeyDigest,
    description: String,
    created_at: DateTime<Utc>,
    last_used_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted key record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedApiKeyData {
    /// Persisted key identifier.
    pub id: ApiKeyId,
    /// Persisted key digest.
    pub digest: ApiKeyDigest,
    /// Persisted description.
    pub description: String,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last-use timestamp.
    pub last_used_at: Option<DateTime<Utc>>,
}

impl ApiKeyRecord {
    /// Creates a never-used record for the given secret.
    #[must_use]
    pub fn new(secret: &ApiKeySecret, description: impl Into<String>, clock: &impl Clock) -> Self {
        Self {
            id: ApiKeyId::new(),
            digest: secret.digest(),
            description: description.into(),
            created_at: clock.utc(),
            last_used_at: None,
        }
    }

    /// Reconstructs a record from persistence.
    #[must_use]
    pub fn from_persisted(data: PersistedApiKeyData) -> Self {
        Self {
            id: data.id,
            digest: data.digest,
            description: data.description,
            created_at: data.created_at,
            last_used_at: data.last_used_at,
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> ApiKeyId {
        self.id
    }

    /// Returns the key digest.
    #[must_use]
    pub const fn digest(&self) -> &ApiKeyDigest {
        &self.digest
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last successful authentication, if any.
    #[must_use]
    pub const fn last_used_at(&self) -> Option<DateTime<Utc>> {
        self.last_used_at
    }

    /// Records a use at `timestamp`. Earlier timestamps are ignored.
    pub fn mark_used(&mut self, timestamp: DateTime<Utc>) {
        if self.last_used_at.is_none_or(|previous| timestamp > previous) {
            self.last_used_at = Some(timestamp);
        }
    }
}

/// A freshly provisioned key together with its one-time plaintext.
#[derive(Debug, Clone)]
pub struct IssuedApiKey {
    record: ApiKeyRecord,
    secret: ApiKeySecret,
}

impl IssuedApiKey {
    /// Pairs a stored record with the secret it was derived from.
    #[must_use]
    pub const fn new(record: ApiKeyRecord, secret: ApiKeySecret) -> Self {
        Self { record, secret }
    }

    /// Returns the stored record.
    #[must_use]
    pub const fn record(&self) -> &ApiKeyRecord {
        &self.record
    }

    /// Returns the plaintext secret.
    #[must_use]
    pub const fn secret(&self) -> &ApiKeySecret {
        &self.secret
    }
}
