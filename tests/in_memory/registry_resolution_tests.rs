//! Registry changes as seen by the lifecycle service.

use super::helpers::{Fleet, container, fleet, host};
use docktrine::container::services::ContainerServiceError;
use docktrine::error::ErrorKind;
use docktrine::server_registry::{
    domain::{DaemonHost, LOCAL_DAEMON_HOST},
    services::RegisterServerRequest,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bootstrapped_registry_lists_local_daemon_by_default(fleet: Fleet) {
    fleet
        .registry
        .bootstrap()
        .await
        .expect("bootstrap should succeed");
    fleet
        .daemon
        .add_container(&DaemonHost::local(), container("a1", "web", "nginx:1.27", true))
        .expect("container should be added");

    let listed = fleet
        .lifecycle
        .list(None)
        .await
        .expect("listing should succeed");

    assert_eq!(listed.len(), 1);
    assert_eq!(
        fleet.daemon.connected_hosts().expect("hosts should be readable"),
        vec![LOCAL_DAEMON_HOST.to_owned()]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn changing_the_default_redirects_unqualified_calls(fleet: Fleet) {
    for (name, uri, id) in [("alpha", "tcp://10.0.0.1:2375", "a1"), ("beta", "tcp://10.0.0.2:2375", "b1")] {
        fleet
            .daemon
            .add_container(&host(uri), container(id, name, "nginx:1.27", true))
            .expect("container should be added");
        fleet
            .registry
            .create(RegisterServerRequest::new(name, uri).as_default(true))
            .await
            .expect("server should register");
    }

    let listed = fleet
        .lifecycle
        .list(None)
        .await
        .expect("listing should succeed");

    let ids: Vec<&str> = listed.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["b1"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_server_no_longer_resolves(fleet: Fleet) {
    fleet
        .registry
        .create(RegisterServerRequest::new("edge", "tcp://10.0.0.7:2375"))
        .await
        .expect("server should register");
    fleet
        .registry
        .delete("edge")
        .await
        .expect("server should delete");

    let err = fleet
        .lifecycle
        .list(Some("edge"))
        .await
        .expect_err("deleted server should not resolve");

    assert!(matches!(err, ContainerServiceError::Resolve(_)));
    assert_eq!(err.kind(), ErrorKind::ServerNotFound);
    assert!(
        fleet
            .daemon
            .connected_hosts()
            .expect("hosts should be readable")
            .is_empty()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn named_calls_ignore_the_default(fleet: Fleet) {
    fleet
        .registry
        .bootstrap()
        .await
        .expect("bootstrap should succeed");
    fleet
        .registry
        .create(RegisterServerRequest::new("edge", "tcp://10.0.0.7:2375"))
        .await
        .expect("server should register");
    fleet
        .daemon
        .add_container(&host("tcp://10.0.0.7:2375"), container("e1", "cache", "redis:7", false))
        .expect("container should be added");

    fleet
        .lifecycle
        .start("cache", Some("edge"))
        .await
        .expect("start should succeed");

    let started = fleet
        .daemon
        .container(&host("tcp://10.0.0.7:2375"), "e1")
        .expect("container should be readable")
        .expect("container should exist");
    assert!(started.state.running);
    assert_eq!(
        fleet.daemon.connected_hosts().expect("hosts should be readable"),
        vec![String::from("tcp://10.0.0.7:2375")]
    );
}
