//! Domain errors for container values.

use thiserror::Error;

/// Errors raised while validating container input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContainerDomainError {
    /// The container reference was empty after trimming.
    #[error("container id is required")]
    EmptyContainerRef,
}
