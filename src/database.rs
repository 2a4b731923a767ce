//! `PostgreSQL` pool construction and schema setup for the API server.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;

/// Connection pool shared by the registry and key store adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Idempotent DDL for the `docker_servers` and `api_keys` tables.
pub const SCHEMA_SQL: &str =
    include_str!("../migrations/2026-01-10-000000_create_docker_servers_and_api_keys/up.sql");

/// Database setup errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The pool could not be built or a connection checked out.
    #[error("database pool error: {0}")]
    Pool(#[from] PoolError),

    /// A schema statement failed.
    #[error("schema statement failed: {statement}")]
    Schema {
        /// The failing statement.
        statement: String,
        /// Underlying Diesel error.
        #[source]
        source: diesel::result::Error,
    },

    /// The blocking setup task panicked or was cancelled.
    #[error("database setup task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Builds a pool for `database_url` and applies [`SCHEMA_SQL`] on the blocking
/// thread pool.
///
/// # Errors
///
/// Returns [`DatabaseError`] when the pool cannot be built, a statement fails
/// or the setup task does not complete.
pub async fn prepare(database_url: String) -> Result<PgPool, DatabaseError> {
    tokio::task::spawn_blocking(move || {
        let pool = connect(&database_url)?;
        apply_schema(&pool)?;
        Ok(pool)
    })
    .await?
}

/// Builds a pool for `database_url`.
///
/// # Errors
///
/// Returns [`DatabaseError::Pool`] when the initial connections fail.
pub fn connect(database_url: &str) -> Result<PgPool, DatabaseError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Ok(Pool::builder().build(manager)?)
}

/// Applies [`SCHEMA_SQL`] one statement at a time.
///
/// # Errors
///
/// Returns [`DatabaseError`] when no connection is available or a statement
/// fails.
pub fn apply_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    let mut connection = pool.get()?;
    for statement in schema_statements(SCHEMA_SQL) {
        diesel::sql_query(statement)
            .execute(&mut connection)
            .map_err(|source| DatabaseError::Schema {
                statement: statement.to_owned(),
                source,
            })?;
    }
    Ok(())
}

/// Splits `sql` on semicolons, dropping blank and comment-only fragments.
fn schema_statements(sql: &str) -> impl Iterator<Item = &str> {
    sql.split(';').map(str::trim).filter(|statement| {
        !statement.is_empty()
            && !statement
                .lines()
                .all(|line| line.trim().starts_with("--"))
    })
}
