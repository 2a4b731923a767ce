//! Port contracts for Docker daemon access.

mod daemon;

#[cfg(test)]
pub use daemon::MockDaemonConnector;
pub use daemon::{
    ContainerInspection, ContainerListing, DaemonConnector, DaemonError, DaemonResult,
    DaemonSession,
};
