//! Application services for resolving daemons and operating on containers.

mod lifecycle;
mod resolver;

pub use lifecycle::{ContainerLifecycleService, ContainerServiceError, ContainerServiceResult};
pub use resolver::{DaemonClientResolver, ResolveError, ResolvedConnection, ServerSelection};
