//! Startup pool construction and schema setup.

use crate::postgres::helpers::{CleanupGuard, test_runtime};
use docktrine::database;
use docktrine::server_registry::{
    adapters::postgres::PostgresServerRegistry, ports::ServerRegistryRepository,
};
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;

#[rstest]
fn prepare_creates_schema_on_an_empty_database(shared_test_cluster: &'static TestCluster) {
    let db_name = format!("test_prepare_{}", uuid::Uuid::new_v4());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    shared_test_cluster
        .create_database_from_template(db_name.as_str(), "template1")
        .expect("empty database");
    let url = shared_test_cluster.connection().database_url(&db_name);
    let rt = test_runtime();

    let first_pool = rt
        .block_on(database::prepare(url.clone()))
        .expect("first prepare should succeed");
    drop(first_pool);
    let pool = rt
        .block_on(database::prepare(url))
        .expect("schema setup should be repeatable");

    let registry = PostgresServerRegistry::new(pool);
    let servers = rt.block_on(registry.list_all()).expect("tables should exist");
    assert!(servers.is_empty());
}
