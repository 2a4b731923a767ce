//! Diesel row models for API key persistence.

use super::schema::api_keys;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result and insert row for API keys.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = api_keys)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ApiKeyRow {
    /// Internal key identifier.
    pub id: uuid::Uuid,
    /// Key digest.
    pub key_digest: String,
    /// Description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last successful authentication.
    pub last_used_at: Option<DateTime<Utc>>,
}
