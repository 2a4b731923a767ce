//! Domain model for containers as exposed to façades.

mod container;
mod error;
mod reference;

pub use container::{ContainerStateSnapshot, NormalizedContainer, PortMapping};
pub use error::ContainerDomainError;
pub use reference::ContainerRef;
