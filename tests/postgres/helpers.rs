//! Shared helpers for `PostgreSQL` integration tests.
//!
//! Uses `pg-embed-setup-unpriv` for embedded `PostgreSQL` lifecycle management.
//! Each test clones a pre-migrated template into its own database.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use docktrine::access::adapters::postgres::PostgresApiKeyStore;
use docktrine::database::{PgPool, SCHEMA_SQL};
use docktrine::server_registry::adapters::postgres::PostgresServerRegistry;
use pg_embedded_setup_unpriv::TestCluster;
use tokio::runtime::Runtime;

/// Boxed error for fallible setup steps.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "docktrine_test_template";

/// Creates a tokio runtime for async operations in tests.
pub fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create test runtime")
}

/// Ensures the template database exists with the schema applied.
pub fn ensure_template(cluster: &TestCluster) -> Result<(), BoxError> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            conn.batch_execute(SCHEMA_SQL)
                .map_err(|e| eyre::eyre!("schema setup failed: {e}"))?;
            Ok(())
        })
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(())
}

/// Creates `db_name` from the template and returns a pool of `max_size`
/// connections to it.
pub fn setup_pool(cluster: &TestCluster, db_name: &str, max_size: u32) -> Result<PgPool, BoxError> {
    ensure_template(cluster)?;
    cluster
        .create_database_from_template(db_name, TEMPLATE_DB)
        .map_err(|e| Box::new(e) as BoxError)?;
    let url = cluster.connection().database_url(db_name);
    let manager = ConnectionManager::<PgConnection>::new(url);
    Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| Box::new(e) as BoxError)
}

/// Builds a registry over a fresh database.
pub fn setup_registry(
    cluster: &TestCluster,
    db_name: &str,
    max_size: u32,
) -> Result<PostgresServerRegistry, BoxError> {
    setup_pool(cluster, db_name, max_size).map(PostgresServerRegistry::new)
}

/// Builds a key store over a fresh database.
pub fn setup_key_store(
    cluster: &TestCluster,
    db_name: &str,
) -> Result<PostgresApiKeyStore, BoxError> {
    setup_pool(cluster, db_name, 1).map(PostgresApiKeyStore::new)
}

/// Counts rows flagged as default straight from the table.
pub fn count_defaults(cluster: &TestCluster, db_name: &str) -> Result<i64, BoxError> {
    #[derive(diesel::QueryableByName)]
    struct DefaultCount {
        #[diesel(sql_type = diesel::sql_types::BigInt)]
        total: i64,
    }

    let url = cluster.connection().database_url(db_name);
    let mut conn = PgConnection::establish(&url).map_err(|e| Box::new(e) as BoxError)?;
    let row = diesel::sql_query(
        "SELECT COUNT(*) AS total FROM docker_servers WHERE is_default",
    )
    .get_result::<DefaultCount>(&mut conn)
    .map_err(|e| Box::new(e) as BoxError)?;
    Ok(row.total)
}

/// Drops the test database when the test ends, even on panic.
pub struct CleanupGuard<'a> {
    cluster: &'a TestCluster,
    db_name: String,
}

impl<'a> CleanupGuard<'a> {
    /// Guards `db_name` on `cluster`.
    pub const fn new(cluster: &'a TestCluster, db_name: String) -> Self {
        Self { cluster, db_name }
    }
}

impl Drop for CleanupGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.cluster.drop_database(self.db_name.as_str()) {
            eprintln!("Warning: failed to drop test database {}: {e}", self.db_name);
        }
    }
}
