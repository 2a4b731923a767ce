//! Default flag and name uniqueness against a real `docker_servers` table.

use crate::postgres::helpers::{CleanupGuard, count_defaults, setup_registry, test_runtime};
use docktrine::server_registry::{
    domain::{DaemonHost, ServerDescriptor, ServerName},
    ports::{ServerRegistryError, ServerRegistryRepository},
};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;

fn descriptor(name: &str, host: &str, is_default: bool) -> ServerDescriptor {
    ServerDescriptor::new(
        ServerName::new(name).expect("valid server name"),
        DaemonHost::new(host).expect("valid daemon host"),
        None,
        is_default,
        &DefaultClock,
    )
}

#[rstest]
fn each_default_create_leaves_exactly_one_default(shared_test_cluster: &'static TestCluster) {
    let db_name = format!("test_single_default_{}", uuid::Uuid::new_v4());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let registry = setup_registry(shared_test_cluster, &db_name, 1).expect("registry setup");
    let rt = test_runtime();

    for (name, is_default) in [("local", true), ("edge", false), ("prod", true), ("lab", true)] {
        let server = descriptor(name, "tcp://10.0.0.1:2375", is_default);
        rt.block_on(registry.create(&server))
            .expect("create should succeed");
        assert_eq!(
            count_defaults(shared_test_cluster, &db_name).expect("count defaults"),
            1,
            "after creating {name}"
        );
    }

    let default = rt
        .block_on(registry.find_default())
        .expect("query ok")
        .expect("a default should exist");
    assert_eq!(default.name().as_str(), "lab");
}

#[rstest]
fn duplicate_name_leaves_table_unchanged(shared_test_cluster: &'static TestCluster) {
    let db_name = format!("test_duplicate_name_{}", uuid::Uuid::new_v4());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let registry = setup_registry(shared_test_cluster, &db_name, 1).expect("registry setup");
    let rt = test_runtime();

    let original = descriptor("edge", "tcp://10.0.0.1:2375", true);
    rt.block_on(registry.create(&original))
        .expect("create should succeed");

    let clash = descriptor("edge", "tcp://10.0.0.2:2375", true);
    let result = rt.block_on(registry.create(&clash));
    assert!(
        matches!(result, Err(ServerRegistryError::DuplicateServerName(ref name)) if name.as_str() == "edge"),
        "unexpected result: {result:?}"
    );

    let servers = rt.block_on(registry.list_all()).expect("list ok");
    assert_eq!(servers.len(), 1);
    let kept = servers.first().expect("original row should remain");
    assert_eq!(kept.id(), original.id());
    assert_eq!(kept.host().as_str(), "tcp://10.0.0.1:2375");
    assert!(kept.is_default(), "rolled-back flip must keep the original default");
}

#[rstest]
fn concurrent_default_creates_both_succeed(shared_test_cluster: &'static TestCluster) {
    let db_name = format!("test_concurrent_default_{}", uuid::Uuid::new_v4());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let registry = setup_registry(shared_test_cluster, &db_name, 2).expect("registry setup");
    let rt = test_runtime();

    let first = descriptor("alpha", "tcp://10.0.0.1:2375", true);
    let second = descriptor("beta", "tcp://10.0.0.2:2375", true);
    let (first_result, second_result) =
        rt.block_on(async { tokio::join!(registry.create(&first), registry.create(&second)) });

    first_result.expect("first default create should succeed");
    second_result.expect("second default create should succeed");
    assert_eq!(
        count_defaults(shared_test_cluster, &db_name).expect("count defaults"),
        1
    );
    let servers = rt.block_on(registry.list_all()).expect("list ok");
    assert_eq!(servers.len(), 2);
}

#[rstest]
fn delete_of_unknown_name_reports_not_found(shared_test_cluster: &'static TestCluster) {
    let db_name = format!("test_delete_missing_{}", uuid::Uuid::new_v4());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let registry = setup_registry(shared_test_cluster, &db_name, 1).expect("registry setup");
    let rt = test_runtime();

    let missing = ServerName::new("ghost").expect("valid server name");
    let result = rt.block_on(registry.delete(&missing));

    assert!(matches!(result, Err(ServerRegistryError::NotFound(_))));
}
