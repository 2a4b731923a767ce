//! Daemon transport ports.
//!
//! [`DaemonConnector`] opens one [`DaemonSession`] per request against a
//! registered host. Sessions are owned values; dropping one releases the
//! underlying connection.

use crate::container::domain::{ContainerStateSnapshot, PortMapping};
use crate::server_registry::domain::DaemonHost;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Result type for daemon operations.
pub type DaemonResult<T> = Result<T, DaemonError>;

/// Summary row from a container listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerListing {
    /// Full container ID.
    pub id: String,
    /// Ports as reported by the listing.
    pub ports: Vec<PortMapping>,
}

/// Detailed container inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInspection {
    /// Full container ID.
    pub id: String,
    /// Raw daemon name, usually with a leading `/`.
    pub name: String,
    /// Image reference from the container configuration.
    pub configured_image: Option<String>,
    /// Image ID the container was created from.
    pub image_id: String,
    /// State snapshot.
    pub state: ContainerStateSnapshot,
    /// Creation timestamp.
    pub created: String,
    /// Ports derived from network settings.
    pub ports: Vec<PortMapping>,
    /// Container labels.
    pub labels: BTreeMap<String, String>,
}

/// Opens sessions against Docker daemons.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DaemonConnector: Send + Sync {
    /// Connects to `host`, negotiating the API version.
    ///
    /// # Errors
    ///
    /// Returns [`DaemonError::Connect`] when the client cannot be built or the
    /// daemon cannot be reached.
    async fn connect(&self, host: &DaemonHost) -> DaemonResult<Box<dyn DaemonSession>>;
}

/// Live connection to one daemon.
#[async_trait]
pub trait DaemonSession: Send + Sync {
    /// Lists containers, including stopped ones when `include_stopped` is set.
    async fn list_containers(&self, include_stopped: bool) -> DaemonResult<Vec<ContainerListing>>;

    /// Inspects one container.
    async fn inspect_container(&self, container: &str) -> DaemonResult<ContainerInspection>;

    /// Starts a container. Starting a running container succeeds.
    async fn start_container(&self, container: &str) -> DaemonResult<()>;

    /// Stops a container. Stopping a stopped container succeeds.
    async fn stop_container(&self, container: &str) -> DaemonResult<()>;

    /// Restarts a container.
    async fn restart_container(&self, container: &str) -> DaemonResult<()>;

    /// Pulls an image reference, waiting for the pull to finish.
    async fn pull_image(&self, reference: &str) -> DaemonResult<()>;
}

/// Errors returned by daemon adapters.
#[derive(Debug, Clone, Error)]
pub enum DaemonError {
    /// The daemon could not be reached or the client could not be built.
    #[error("cannot connect to daemon at {host}: {source}")]
    Connect {
        /// Host URI that was dialled.
        host: String,
        /// Underlying failure.
        source: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// The daemon has no such container.
    #[error("no such container: {0}")]
    NoSuchContainer(String),

    /// The daemon answered with an error status.
    #[error("daemon returned {status_code}: {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Daemon-provided message.
        message: String,
    },

    /// The request failed in transit.
    #[error("daemon transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl DaemonError {
    /// Wraps a connection failure.
    pub fn connect(
        host: &DaemonHost,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connect {
            host: host.as_str().to_owned(),
            source: Arc::new(err),
        }
    }

    /// Wraps a transport failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
