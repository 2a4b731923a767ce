//! Domain model for registered Docker daemon endpoints.
//!
//! Server descriptors carry a validated name, a validated host URI, an
//! optional description and the default flag. Infrastructure concerns remain
//! outside this boundary.

mod descriptor;
mod error;
mod host;
mod ids;

pub use descriptor::{PersistedServerData, ServerDescriptor};
pub use error::ServerDomainError;
pub use host::{DaemonHost, HostScheme, LOCAL_DAEMON_HOST};
pub use ids::{ServerId, ServerName};

/// Name of the descriptor seeded into an empty registry.
pub const LOCAL_SERVER_NAME: &str = "local";

/// Description of the descriptor seeded into an empty registry.
pub const LOCAL_SERVER_DESCRIPTION: &str = "Local Docker daemon";
