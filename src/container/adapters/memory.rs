//! In-memory daemon adapter for lifecycle tests.

use crate::container::ports::{
    ContainerInspection, ContainerListing, DaemonConnector, DaemonError, DaemonResult,
    DaemonSession,
};
use crate::server_registry::domain::DaemonHost;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// In-memory stand-in for a fleet of Docker daemons.
///
/// Containers are kept per host URI. Failures can be injected per container
/// (inspection) or globally (pulls), and hosts can be made unreachable.
/// Every open session is counted until it is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDaemon {
    state: Arc<RwLock<DaemonState>>,
}

#[derive(Debug, Default)]
struct DaemonState {
    hosts: HashMap<String, BTreeMap<String, ContainerInspection>>,
    unreachable_hosts: HashSet<String>,
    failing_inspections: HashSet<String>,
    failing_pulls: bool,
    open_sessions: usize,
    connected_hosts: Vec<String>,
    restarts: HashMap<String, usize>,
    pulled_images: Vec<String>,
}

fn lock_error(err: impl std::fmt::Display) -> DaemonError {
    DaemonError::transport(std::io::Error::other(err.to_string()))
}

impl InMemoryDaemon {
    /// Creates a daemon fleet with no containers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn write<T>(&self, update: impl FnOnce(&mut DaemonState) -> T) -> DaemonResult<T> {
        let mut state = self.state.write().map_err(lock_error)?;
        Ok(update(&mut *state))
    }

    fn read<T>(&self, query: impl FnOnce(&DaemonState) -> T) -> DaemonResult<T> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(query(&*state))
    }

    /// Places a container on `host`, replacing any with the same ID.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn add_container(
        &self,
        host: &DaemonHost,
        container: ContainerInspection,
    ) -> DaemonResult<()> {
        self.write(|state| {
            state
                .hosts
                .entry(host.as_str().to_owned())
                .or_default()
                .insert(container.id.clone(), container);
        })
    }

    /// Makes every connection attempt to `host` fail.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn refuse_connections(&self, host: &DaemonHost) -> DaemonResult<()> {
        self.write(|state| {
            state.unreachable_hosts.insert(host.as_str().to_owned());
        })
    }

    /// Makes inspection of `container_id` fail with a server error.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn fail_inspection(&self, container_id: &str) -> DaemonResult<()> {
        self.write(|state| {
            state.failing_inspections.insert(container_id.to_owned());
        })
    }

    /// Makes every image pull fail.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn fail_pulls(&self) -> DaemonResult<()> {
        self.write(|state| state.failing_pulls = true)
    }

    /// Returns the number of sessions not yet dropped.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn open_sessions(&self) -> DaemonResult<usize> {
        self.read(|state| state.open_sessions)
    }

    /// Returns every host URI connected to, in order.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn connected_hosts(&self) -> DaemonResult<Vec<String>> {
        self.read(|state| state.connected_hosts.clone())
    }

    /// Returns how often `container_id` was restarted.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn restart_count(&self, container_id: &str) -> DaemonResult<usize> {
        self.read(|state| state.restarts.get(container_id).copied().unwrap_or(0))
    }

    /// Returns every image reference pulled successfully, in order.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn pulled_images(&self) -> DaemonResult<Vec<String>> {
        self.read(|state| state.pulled_images.clone())
    }

    /// Returns the current view of a container on `host`.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn container(
        &self,
        host: &DaemonHost,
        container_id: &str,
    ) -> DaemonResult<Option<ContainerInspection>> {
        self.read(|state| {
            state
                .hosts
                .get(host.as_str())
                .and_then(|containers| containers.get(container_id))
                .cloned()
        })
    }
}

#[async_trait]
impl DaemonConnector for InMemoryDaemon {
    async fn connect(&self, host: &DaemonHost) -> DaemonResult<Box<dyn DaemonSession>> {
        let refused = self.write(|state| {
            if state.unreachable_hosts.contains(host.as_str()) {
                return true;
            }
            state.open_sessions += 1;
            state.connected_hosts.push(host.as_str().to_owned());
            false
        })?;

        if refused {
            return Err(DaemonError::connect(
                host,
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
            ));
        }

        Ok(Box::new(InMemorySession {
            host: host.as_str().to_owned(),
            daemon: self.clone(),
        }))
    }
}

/// Session bound to one in-memory host.
#[derive(Debug)]
struct InMemorySession {
    host: String,
    daemon: InMemoryDaemon,
}

impl InMemorySession {
    fn update_container<T>(
        &self,
        container: &str,
        update: impl FnOnce(&mut DaemonState, &str) -> T,
    ) -> DaemonResult<T> {
        let mut state = self.daemon.state.write().map_err(lock_error)?;
        let resolved = state
            .hosts
            .get(&self.host)
            .and_then(|containers| find_container(containers, container))
            .map(|found| found.id.clone())
            .ok_or_else(|| DaemonError::NoSuchContainer(container.to_owned()))?;
        Ok(update(&mut *state, &resolved))
    }
}

/// Matches a container by full ID or by name, with or without the leading `/`.
fn find_container<'a>(
    containers: &'a BTreeMap<String, ContainerInspection>,
    reference: &str,
) -> Option<&'a ContainerInspection> {
    containers.get(reference).or_else(|| {
        containers
            .values()
            .find(|candidate| candidate.name.trim_start_matches('/') == reference.trim_start_matches('/'))
    })
}

fn set_running(state: &mut DaemonState, host: &str, container_id: &str, running: bool) {
    let Some(container) = state
        .hosts
        .get_mut(host)
        .and_then(|containers| containers.get_mut(container_id))
    else {
        return;
    };
    container.state.running = running;
    container.state.status = if running { "running" } else { "exited" }.to_owned();
}

#[async_trait]
impl DaemonSession for InMemorySession {
    async fn list_containers(&self, include_stopped: bool) -> DaemonResult<Vec<ContainerListing>> {
        self.daemon.read(|state| {
            state
                .hosts
                .get(&self.host)
                .map(|containers| {
                    containers
                        .values()
                        .filter(|container| include_stopped || container.state.running)
                        .map(|container| ContainerListing {
                            id: container.id.clone(),
                            ports: container.ports.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default()
        })
    }

    async fn inspect_container(&self, container: &str) -> DaemonResult<ContainerInspection> {
        let state = self.daemon.state.read().map_err(lock_error)?;
        let found = state
            .hosts
            .get(&self.host)
            .and_then(|containers| find_container(containers, container))
            .ok_or_else(|| DaemonError::NoSuchContainer(container.to_owned()))?;
        if state.failing_inspections.contains(&found.id) {
            return Err(DaemonError::Api {
                status_code: 500,
                message: format!("inspection of {} failed", found.id),
            });
        }
        Ok(found.clone())
    }

    async fn start_container(&self, container: &str) -> DaemonResult<()> {
        let host = self.host.clone();
        self.update_container(container, |state, id| set_running(state, &host, id, true))
    }

    async fn stop_container(&self, container: &str) -> DaemonResult<()> {
        let host = self.host.clone();
        self.update_container(container, |state, id| set_running(state, &host, id, false))
    }

    async fn restart_container(&self, container: &str) -> DaemonResult<()> {
        let host = self.host.clone();
        self.update_container(container, |state, id| {
            *state.restarts.entry(id.to_owned()).or_default() += 1;
            set_running(state, &host, id, true);
        })
    }

    async fn pull_image(&self, reference: &str) -> DaemonResult<()> {
        let failed = self.daemon.write(|state| {
            if state.failing_pulls {
                return true;
            }
            state.pulled_images.push(reference.to_owned());
            false
        })?;

        if failed {
            return Err(DaemonError::Api {
                status_code: 500,
                message: format!("pull access denied for {reference}"),
            });
        }
        Ok(())
    }
}

impl Drop for InMemorySession {
    fn drop(&mut self) {
        if let Ok(mut state) = self.daemon.state.write() {
            state.open_sessions = state.open_sessions.saturating_sub(1);
        }
    }
}
