//! Request and response bodies.

use crate::server_registry::domain::ServerDescriptor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server as rendered by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerView {
    /// Server identifier.
    pub id: String,
    /// Unique name.
    pub name: String,
    /// Daemon host URI.
    pub host: String,
    /// Optional description.
    pub description: Option<String>,
    /// Whether this is the default server.
    pub is_default: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&ServerDescriptor> for ServerView {
    fn from(server: &ServerDescriptor) -> Self {
        Self {
            id: server.id().to_string(),
            name: server.name().to_string(),
            host: server.host().to_string(),
            description: server.description().map(str::to_owned),
            is_default: server.is_default(),
            created_at: server.created_at(),
            updated_at: server.updated_at(),
        }
    }
}

/// Body for registering a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateServerBody {
    /// Unique name.
    pub name: String,
    /// Daemon host URI.
    pub host: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the server becomes the default.
    #[serde(default)]
    pub is_default: bool,
}

/// Confirmation body for commands without a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

impl MessageResponse {
    /// Creates a confirmation body.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
