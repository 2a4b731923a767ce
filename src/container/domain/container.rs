//! Normalized container view returned by lifecycle operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point-in-time container state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStateSnapshot {
    /// Daemon status string such as `running` or `exited`.
    pub status: String,
    /// Whether the container process is running.
    pub running: bool,
    /// Whether the container is paused.
    pub paused: bool,
    /// Whether the container is restarting.
    pub restarting: bool,
    /// Last exit code, when the daemon reports one.
    pub exit_code: Option<i64>,
    /// Start timestamp as reported by the daemon.
    pub started_at: Option<String>,
    /// Finish timestamp as reported by the daemon.
    pub finished_at: Option<String>,
}

/// Published or exposed container port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    /// Host interface the port is bound to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Port inside the container.
    pub private_port: u16,
    /// Port on the host, when published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_port: Option<u16>,
    /// Transport protocol, usually `tcp` or `udp`.
    pub protocol: String,
}

/// Container description independent of the daemon's wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedContainer {
    /// Full container ID.
    pub id: String,
    /// Container name without the leading `/`.
    pub name: String,
    /// Configured image reference, or the image ID when unknown.
    pub image: String,
    /// Image ID the container was created from.
    pub image_id: String,
    /// State snapshot.
    pub state: ContainerStateSnapshot,
    /// Status string, duplicated from `state.status`.
    pub status: String,
    /// Creation timestamp as reported by the daemon.
    pub created: String,
    /// Port mappings.
    pub ports: Vec<PortMapping>,
    /// Container labels.
    pub labels: BTreeMap<String, String>,
}
