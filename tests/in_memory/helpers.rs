//! Shared fixtures for in-memory integration tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use docktrine::access::{adapters::memory::InMemoryApiKeyStore, services::AccessGate};
use docktrine::container::{
    adapters::memory::InMemoryDaemon,
    domain::ContainerStateSnapshot,
    ports::ContainerInspection,
    services::{ContainerLifecycleService, DaemonClientResolver},
};
use docktrine::server_registry::{
    adapters::memory::InMemoryServerRegistry, domain::DaemonHost,
    services::ServerRegistryService,
};
use mockable::DefaultClock;
use rstest::fixture;

/// Registry service over in-memory storage.
pub type Registry = ServerRegistryService<InMemoryServerRegistry, DefaultClock>;

/// Lifecycle service over in-memory storage and daemons.
pub type Lifecycle = ContainerLifecycleService<InMemoryServerRegistry, InMemoryDaemon>;

/// Access gate over an in-memory key store.
pub type Gate = AccessGate<InMemoryApiKeyStore, DefaultClock>;

/// Registry and lifecycle services sharing one registry.
pub struct Fleet {
    /// Registry service.
    pub registry: Registry,
    /// Lifecycle service resolving against the same registry.
    pub lifecycle: Lifecycle,
    /// Daemon fleet behind the lifecycle service.
    pub daemon: InMemoryDaemon,
}

/// Provides a fleet with an empty registry and no containers.
#[fixture]
pub fn fleet() -> Fleet {
    let repository = Arc::new(InMemoryServerRegistry::new());
    let daemon = InMemoryDaemon::new();
    Fleet {
        registry: ServerRegistryService::new(Arc::clone(&repository), Arc::new(DefaultClock)),
        lifecycle: ContainerLifecycleService::new(DaemonClientResolver::new(
            repository,
            Arc::new(daemon.clone()),
        )),
        daemon,
    }
}

/// Provides an access gate over an empty key store.
#[fixture]
pub fn gate() -> Gate {
    AccessGate::new(Arc::new(InMemoryApiKeyStore::new()), Arc::new(DefaultClock))
}

/// Parses a host URI known to be valid.
pub fn host(uri: &str) -> DaemonHost {
    DaemonHost::new(uri).expect("test host should be valid")
}

/// Builds a running or stopped container created from `image`.
pub fn container(id: &str, name: &str, image: &str, running: bool) -> ContainerInspection {
    ContainerInspection {
        id: id.to_owned(),
        name: format!("/{name}"),
        configured_image: Some(image.to_owned()),
        image_id: format!("sha256:{id}"),
        state: ContainerStateSnapshot {
            status: if running { "running" } else { "exited" }.to_owned(),
            running,
            ..ContainerStateSnapshot::default()
        },
        created: String::from("2024-05-01T10:00:00Z"),
        ports: Vec::new(),
        labels: BTreeMap::new(),
    }
}
