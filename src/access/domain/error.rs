//! Domain errors for API key values.

use thiserror::Error;

/// Errors raised while constructing API key values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiKeyDomainError {
    /// A digest was not 64 lowercase hexadecimal characters.
    #[error("malformed API key digest")]
    MalformedDigest,
}
