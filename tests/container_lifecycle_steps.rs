//! BDD steps for container lifecycle resolution.
//!
//! Exercises the registry, resolver and lifecycle service together over
//! in-memory adapters.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use docktrine::container::{
    adapters::memory::InMemoryDaemon,
    domain::{ContainerStateSnapshot, NormalizedContainer},
    ports::ContainerInspection,
    services::{ContainerLifecycleService, ContainerServiceError, DaemonClientResolver},
};
use docktrine::error::ErrorKind;
use docktrine::server_registry::{
    adapters::memory::InMemoryServerRegistry,
    domain::DaemonHost,
    services::{RegisterServerRequest, ServerRegistryService},
};
use eyre::{WrapErr, ensure, eyre};
use mockable::DefaultClock;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

type TestLifecycle = ContainerLifecycleService<InMemoryServerRegistry, InMemoryDaemon>;

/// World state for lifecycle scenarios.
struct LifecycleWorld {
    registry: ServerRegistryService<InMemoryServerRegistry, DefaultClock>,
    lifecycle: TestLifecycle,
    daemon: InMemoryDaemon,
    hosts: HashMap<String, DaemonHost>,
    container_ids: HashMap<String, String>,
    listing: Option<Vec<NormalizedContainer>>,
    failure: Option<ContainerServiceError>,
}

impl Default for LifecycleWorld {
    fn default() -> Self {
        let repository = Arc::new(InMemoryServerRegistry::new());
        let daemon = InMemoryDaemon::new();
        Self {
            registry: ServerRegistryService::new(Arc::clone(&repository), Arc::new(DefaultClock)),
            lifecycle: ContainerLifecycleService::new(DaemonClientResolver::new(
                repository,
                Arc::new(daemon.clone()),
            )),
            daemon,
            hosts: HashMap::new(),
            container_ids: HashMap::new(),
            listing: None,
            failure: None,
        }
    }
}

impl LifecycleWorld {
    fn host_for(&self, server: &str) -> eyre::Result<&DaemonHost> {
        self.hosts
            .get(server)
            .ok_or_else(|| eyre!("server '{server}' was not registered in this scenario"))
    }

    fn record(&mut self, result: Result<(), ContainerServiceError>) {
        if let Err(err) = result {
            self.failure = Some(err);
        }
    }

    fn failure_kind(&self) -> eyre::Result<ErrorKind> {
        self.failure
            .as_ref()
            .map(ContainerServiceError::kind)
            .ok_or_else(|| eyre!("expected the last call to fail"))
    }
}

#[fixture]
fn world() -> LifecycleWorld {
    LifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

fn running_container(id: &str, name: &str) -> ContainerInspection {
    ContainerInspection {
        id: id.to_owned(),
        name: format!("/{name}"),
        configured_image: Some(String::from("nginx:1.27")),
        image_id: format!("sha256:{id}"),
        state: ContainerStateSnapshot {
            status: String::from("running"),
            running: true,
            ..ContainerStateSnapshot::default()
        },
        created: String::from("2024-05-01T10:00:00Z"),
        ports: Vec::new(),
        labels: BTreeMap::new(),
    }
}

// Given

#[given(r#"a registry whose default server is "{name}""#)]
fn default_server(world: &mut LifecycleWorld, name: String) -> Result<(), eyre::Report> {
    let uri = format!("tcp://{name}.internal:2375");
    let created = run_async(
        world
            .registry
            .create(RegisterServerRequest::new(name.as_str(), uri).as_default(true)),
    )
    .wrap_err("register default server")?;
    world.hosts.insert(name, created.host().clone());
    Ok(())
}

#[given(r#"a running container named "{container}" on "{server}""#)]
fn running_container_on(
    world: &mut LifecycleWorld,
    container: String,
    server: String,
) -> Result<(), eyre::Report> {
    let id = format!("{container}-id");
    let host = world.host_for(&server)?.clone();
    world
        .daemon
        .add_container(&host, running_container(&id, &container))
        .wrap_err("add container")?;
    world.container_ids.insert(container, id);
    Ok(())
}

#[given("image pulls are failing")]
fn pulls_failing(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    world.daemon.fail_pulls().wrap_err("inject pull failure")?;
    Ok(())
}

// When

#[when("containers are listed without naming a server")]
fn list_default(world: &mut LifecycleWorld) {
    match run_async(world.lifecycle.list(None)) {
        Ok(listing) => world.listing = Some(listing),
        Err(err) => world.failure = Some(err),
    }
}

#[when(r#"containers are listed on server "{server}""#)]
fn list_named(world: &mut LifecycleWorld, server: String) {
    match run_async(world.lifecycle.list(Some(server.as_str()))) {
        Ok(listing) => world.listing = Some(listing),
        Err(err) => world.failure = Some(err),
    }
}

#[when(r#""{container}" is restarted with the latest image"#)]
fn restart_with_pull(world: &mut LifecycleWorld, container: String) {
    let result = run_async(world.lifecycle.restart(&container, None, true));
    world.record(result);
}

// Then

#[then(r#"the listing contains "{name}""#)]
fn listing_contains(world: &LifecycleWorld, name: String) -> Result<(), eyre::Report> {
    let listing = world
        .listing
        .as_ref()
        .ok_or_else(|| eyre!("expected a successful listing, got {:?}", world.failure))?;
    ensure!(
        listing.iter().any(|container| container.name == name),
        "expected '{name}' in listing"
    );
    Ok(())
}

#[then(r#"only the daemon for "{server}" was contacted"#)]
fn only_server_contacted(world: &LifecycleWorld, server: String) -> Result<(), eyre::Report> {
    let expected = world.host_for(&server)?.as_str().to_owned();
    let contacted = world.daemon.connected_hosts().wrap_err("read hosts")?;
    ensure!(
        contacted == vec![expected],
        "unexpected daemon contacts: {contacted:?}"
    );
    Ok(())
}

#[then("the call fails with a server not found error")]
fn fails_with_server_not_found(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    let kind = world.failure_kind()?;
    ensure!(
        kind == ErrorKind::ServerNotFound,
        "expected server not found, got {kind}"
    );
    Ok(())
}

#[then("the call fails with a pull error")]
fn fails_with_pull_error(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    let kind = world.failure_kind()?;
    ensure!(kind == ErrorKind::Pull, "expected pull failure, got {kind}");
    Ok(())
}

#[then("no daemon was contacted")]
fn no_daemon_contacted(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    let contacted = world.daemon.connected_hosts().wrap_err("read hosts")?;
    ensure!(contacted.is_empty(), "unexpected daemon contacts: {contacted:?}");
    Ok(())
}

#[then(r#""{container}" was never restarted"#)]
fn never_restarted(world: &LifecycleWorld, container: String) -> Result<(), eyre::Report> {
    let id = world
        .container_ids
        .get(&container)
        .ok_or_else(|| eyre!("container '{container}' was not created in this scenario"))?;
    let restarts = world.daemon.restart_count(id).wrap_err("read restarts")?;
    ensure!(restarts == 0, "expected no restarts, saw {restarts}");
    Ok(())
}

#[then("no daemon session is left open")]
fn no_open_sessions(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    let open = world.daemon.open_sessions().wrap_err("read sessions")?;
    ensure!(open == 0, "expected no open sessions, saw {open}");
    Ok(())
}

#[scenario(
    path = "tests/features/container_lifecycle.feature",
    name = "Listing without a server uses the default"
)]
#[tokio::test(flavor = "multi_thread")]
async fn listing_uses_default(world: LifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/container_lifecycle.feature",
    name = "Listing an unknown server fails without falling back"
)]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_server_fails(world: LifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/container_lifecycle.feature",
    name = "A failed image pull aborts the restart"
)]
#[tokio::test(flavor = "multi_thread")]
async fn failed_pull_aborts_restart(world: LifecycleWorld) {
    let _ = world;
}
