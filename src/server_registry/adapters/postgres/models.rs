//! Diesel row models for server registry persistence.

use super::schema::docker_servers;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for server descriptors.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = docker_servers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ServerRow {
    /// Internal server identifier.
    pub id: uuid::Uuid,
    /// Unique server name.
    pub name: String,
    /// Daemon host URI.
    pub host: String,
    /// Optional description.
    pub description: Option<String>,
    /// Default flag.
    pub is_default: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for server descriptors.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = docker_servers)]
pub struct NewServerRow {
    /// Internal server identifier.
    pub id: uuid::Uuid,
    /// Unique server name.
    pub name: String,
    /// Daemon host URI.
    pub host: String,
    /// Optional description.
    pub description: Option<String>,
    /// Default flag.
    pub is_default: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
