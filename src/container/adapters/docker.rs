//! Docker Engine adapter backed by `bollard`.

use crate::container::{
    domain::{ContainerStateSnapshot, PortMapping},
    ports::{
        ContainerInspection, ContainerListing, DaemonConnector, DaemonError, DaemonResult,
        DaemonSession,
    },
};
use crate::server_registry::domain::{DaemonHost, HostScheme};
use async_trait::async_trait;
use bollard::Docker;
use bollard::errors::Error as BollardError;
use bollard::models::{ContainerInspectResponse, ContainerSummary, PortMap};
use bollard::query_parameters::{
    CreateImageOptions, InspectContainerOptions, ListContainersOptions, RestartContainerOptions,
    StartContainerOptions, StopContainerOptions,
};
use futures_util::StreamExt;
use std::collections::BTreeMap;
use std::time::Duration;

/// Tag pulled when a reference names none.
const DEFAULT_TAG: &str = "latest";

/// Protocol assumed when the daemon omits one.
const DEFAULT_PROTOCOL: &str = "tcp";

/// Opens `bollard` clients with a fixed request timeout.
#[derive(Debug, Clone, Copy)]
pub struct BollardConnector {
    timeout: Duration,
}

impl BollardConnector {
    /// Creates a connector whose clients time out after `timeout`.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn build_client(&self, host: &DaemonHost) -> Result<Docker, BollardError> {
        let seconds = self.timeout.as_secs().max(1);
        match host.scheme() {
            HostScheme::Unix => {
                Docker::connect_with_unix(host.as_str(), seconds, bollard::API_DEFAULT_VERSION)
            }
            HostScheme::Tcp | HostScheme::Http => {
                Docker::connect_with_http(host.as_str(), seconds, bollard::API_DEFAULT_VERSION)
            }
            HostScheme::NamedPipe => connect_named_pipe(host, seconds),
        }
    }
}

#[cfg(windows)]
fn connect_named_pipe(host: &DaemonHost, seconds: u64) -> Result<Docker, BollardError> {
    Docker::connect_with_named_pipe(host.as_str(), seconds, bollard::API_DEFAULT_VERSION)
}

#[cfg(not(windows))]
fn connect_named_pipe(host: &DaemonHost, _seconds: u64) -> Result<Docker, BollardError> {
    Err(BollardError::IOError {
        err: std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            format!("named pipe host {host} is only reachable on Windows"),
        ),
    })
}

#[async_trait]
impl DaemonConnector for BollardConnector {
    async fn connect(&self, host: &DaemonHost) -> DaemonResult<Box<dyn DaemonSession>> {
        let unnegotiated = self
            .build_client(host)
            .map_err(|err| DaemonError::connect(host, err))?;
        let client = unnegotiated
            .negotiate_version()
            .await
            .map_err(|err| DaemonError::connect(host, err))?;
        tracing::debug!(host = %host, "connected to daemon");
        Ok(Box::new(BollardSession { client }))
    }
}

/// One negotiated `bollard` client.
#[derive(Debug)]
pub struct BollardSession {
    client: Docker,
}

#[async_trait]
impl DaemonSession for BollardSession {
    async fn list_containers(&self, include_stopped: bool) -> DaemonResult<Vec<ContainerListing>> {
        let options = ListContainersOptions {
            all: include_stopped,
            ..Default::default()
        };
        let summaries = self
            .client
            .list_containers(Some(options))
            .await
            .map_err(map_daemon_error)?;
        Ok(summaries.into_iter().filter_map(to_listing).collect())
    }

    async fn inspect_container(&self, container: &str) -> DaemonResult<ContainerInspection> {
        let details = self
            .client
            .inspect_container(container, None::<InspectContainerOptions>)
            .await
            .map_err(|err| map_container_error(err, container))?;
        Ok(to_inspection(details))
    }

    async fn start_container(&self, container: &str) -> DaemonResult<()> {
        let result = self
            .client
            .start_container(container, None::<StartContainerOptions>)
            .await;
        accept_not_modified(result).map_err(|err| map_container_error(err, container))
    }

    async fn stop_container(&self, container: &str) -> DaemonResult<()> {
        let result = self
            .client
            .stop_container(container, None::<StopContainerOptions>)
            .await;
        accept_not_modified(result).map_err(|err| map_container_error(err, container))
    }

    async fn restart_container(&self, container: &str) -> DaemonResult<()> {
        self.client
            .restart_container(container, None::<RestartContainerOptions>)
            .await
            .map_err(|err| map_container_error(err, container))
    }

    async fn pull_image(&self, reference: &str) -> DaemonResult<()> {
        let (image, tag) = split_image_reference(reference);
        let options = CreateImageOptions {
            from_image: Some(image),
            tag,
            ..Default::default()
        };

        let mut progress = self.client.create_image(Some(options), None, None);
        while let Some(update) = progress.next().await {
            update.map_err(map_daemon_error)?;
        }
        tracing::debug!(image = reference, "pulled image");
        Ok(())
    }
}

/// Treats "already started/stopped" replies as success.
fn accept_not_modified(result: Result<(), BollardError>) -> Result<(), BollardError> {
    match result {
        Err(BollardError::DockerResponseServerError {
            status_code: 304, ..
        }) => Ok(()),
        other => other,
    }
}

fn map_container_error(err: BollardError, container: &str) -> DaemonError {
    match err {
        BollardError::DockerResponseServerError {
            status_code: 404, ..
        } => DaemonError::NoSuchContainer(container.to_owned()),
        other => map_daemon_error(other),
    }
}

fn map_daemon_error(err: BollardError) -> DaemonError {
    match err {
        BollardError::DockerResponseServerError {
            status_code,
            message,
        } => DaemonError::Api {
            status_code,
            message,
        },
        other => DaemonError::transport(other),
    }
}

/// Splits an image reference into the image and tag passed to the pull API.
///
/// Digest references are passed through whole. A `:` inside the registry
/// host part is not mistaken for a tag separator.
fn split_image_reference(reference: &str) -> (String, Option<String>) {
    if reference.contains('@') {
        return (reference.to_owned(), None);
    }

    let name_start = reference.rfind('/').map_or(0, |slash| slash + 1);
    let tag_separator = reference
        .get(name_start..)
        .and_then(|last_segment| last_segment.rfind(':'))
        .map(|offset| name_start + offset);

    match tag_separator {
        Some(separator) => {
            let image = reference.get(..separator).unwrap_or(reference);
            let tag = reference
                .get(separator + 1..)
                .filter(|tag| !tag.is_empty())
                .unwrap_or(DEFAULT_TAG);
            (image.to_owned(), Some(tag.to_owned()))
        }
        None => (reference.to_owned(), Some(DEFAULT_TAG.to_owned())),
    }
}

fn to_listing(summary: ContainerSummary) -> Option<ContainerListing> {
    let id = summary.id.filter(|id| !id.is_empty())?;
    let mut ports: Vec<PortMapping> = summary
        .ports
        .unwrap_or_default()
        .into_iter()
        .map(|port| PortMapping {
            ip: port.ip.filter(|ip| !ip.is_empty()),
            private_port: port.private_port,
            public_port: port.public_port,
            protocol: port
                .typ
                .map(|protocol| protocol.to_string())
                .filter(|protocol| !protocol.is_empty())
                .unwrap_or_else(|| DEFAULT_PROTOCOL.to_owned()),
        })
        .collect();
    sort_ports(&mut ports);
    Some(ContainerListing { id, ports })
}

fn to_inspection(details: ContainerInspectResponse) -> ContainerInspection {
    let state = details
        .state
        .map(|state| ContainerStateSnapshot {
            status: state
                .status
                .map(|status| status.to_string())
                .unwrap_or_default(),
            running: state.running.unwrap_or(false),
            paused: state.paused.unwrap_or(false),
            restarting: state.restarting.unwrap_or(false),
            exit_code: state.exit_code,
            started_at: state.started_at,
            finished_at: state.finished_at,
        })
        .unwrap_or_default();

    let (configured_image, labels) = details.config.map_or((None, BTreeMap::new()), |config| {
        (
            config.image.filter(|image| !image.is_empty()),
            config.labels.unwrap_or_default().into_iter().collect(),
        )
    });

    let ports = details
        .network_settings
        .and_then(|settings| settings.ports)
        .map(ports_from_port_map)
        .unwrap_or_default();

    ContainerInspection {
        id: details.id.unwrap_or_default(),
        name: details.name.unwrap_or_default(),
        configured_image,
        image_id: details.image.unwrap_or_default(),
        state,
        created: details
            .created
            .map(|created| created.to_string())
            .unwrap_or_default(),
        ports,
        labels,
    }
}

/// Flattens `"80/tcp" -> [bindings]` into one mapping per binding.
fn ports_from_port_map(port_map: PortMap) -> Vec<PortMapping> {
    let mut ports = Vec::new();
    for (key, maybe_bindings) in port_map {
        let (port, protocol) = key.split_once('/').unwrap_or((key.as_str(), DEFAULT_PROTOCOL));
        let Ok(private_port) = port.parse::<u16>() else {
            continue;
        };

        let bindings = maybe_bindings.unwrap_or_default();
        if bindings.is_empty() {
            ports.push(PortMapping {
                ip: None,
                private_port,
                public_port: None,
                protocol: protocol.to_owned(),
            });
            continue;
        }

        ports.extend(bindings.into_iter().map(|binding| PortMapping {
            ip: binding.host_ip.filter(|ip| !ip.is_empty()),
            private_port,
            public_port: binding
                .host_port
                .and_then(|host_port| host_port.parse::<u16>().ok()),
            protocol: protocol.to_owned(),
        }));
    }
    sort_ports(&mut ports);
    ports
}

fn sort_ports(ports: &mut [PortMapping]) {
    ports.sort_by(|left, right| {
        (left.private_port, &left.protocol, left.public_port, &left.ip).cmp(&(
            right.private_port,
            &right.protocol,
            right.public_port,
            &right.ip,
        ))
    });
}
