//! Caller-supplied container references.

use super::ContainerDomainError;
use std::fmt;

/// Container ID or name as understood by the daemon.
///
/// The value is otherwise opaque; only emptiness is checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerRef(String);

impl ContainerRef {
    /// Creates a trimmed, non-empty container reference.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerDomainError::EmptyContainerRef`] for blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, ContainerDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ContainerDomainError::EmptyContainerRef);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the reference text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ContainerRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerRef {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
