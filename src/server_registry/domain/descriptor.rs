//! Server descriptor aggregate root.

use super::{DaemonHost, ServerId, ServerName};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Registered Docker daemon endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDescriptor {
    id: ServerId,
    name: ServerName,
    host: DaemonHost,
    description: Option<String>,
    is_default: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedServerData {
    /// Persisted server identifier.
    pub id: ServerId,
    /// Persisted server name.
    pub name: ServerName,
    /// Persisted daemon host.
    pub host: DaemonHost,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted default flag.
    pub is_default: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ServerDescriptor {
    /// Creates a new descriptor.
    ///
    /// Blank descriptions are stored as `None`.
    #[must_use]
    pub fn new(
        name: ServerName,
        host: DaemonHost,
        description: Option<String>,
        is_default: bool,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ServerId::new(),
            name,
            host,
            description: normalize_description(description),
            is_default,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a descriptor from persistence.
    #[must_use]
    pub fn from_persisted(data: PersistedServerData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            host: data.host,
            description: normalize_description(data.description),
            is_default: data.is_default,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the descriptor identifier.
    #[must_use]
    pub const fn id(&self) -> ServerId {
        self.id
    }

    /// Returns the unique server name.
    #[must_use]
    pub const fn name(&self) -> &ServerName {
        &self.name
    }

    /// Returns the daemon host.
    #[must_use]
    pub const fn host(&self) -> &DaemonHost {
        &self.host
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether this descriptor is the registry default.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.is_default
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Clears the default flag, touching the update timestamp when it was set.
    pub fn clear_default(&mut self, timestamp: DateTime<Utc>) {
        if self.is_default {
            self.is_default = false;
            self.updated_at = timestamp;
        }
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
