//! Key material: identifiers, plaintext secrets and stored digests.

use super::ApiKeyDomainError;
use rand::{RngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// Number of random bytes in a generated key.
const KEY_BYTES: usize = 32;

/// Length of a hex-encoded SHA-256 digest.
const DIGEST_HEX_LENGTH: usize = 64;

/// Unique identifier for a stored API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKeyId(Uuid);

impl ApiKeyId {
    /// Creates a new random key identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a key identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ApiKeyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ApiKeyId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Plaintext API key as presented by callers.
///
/// The value never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKeySecret(String);

impl ApiKeySecret {
    /// Generates a fresh key from the operating system RNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; KEY_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Wraps a presented key, returning `None` when it is blank.
    #[must_use]
    pub fn presented(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    /// Returns the plaintext. Only call this to hand the key to its owner.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Computes the digest under which this key is stored.
    #[must_use]
    pub fn digest(&self) -> ApiKeyDigest {
        ApiKeyDigest(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for ApiKeySecret {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("ApiKeySecret(<redacted>)")
    }
}

/// Hex-encoded SHA-256 digest of an API key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApiKeyDigest(String);

impl ApiKeyDigest {
    /// Parses a stored digest.
    ///
    /// # Errors
    ///
    /// Returns [`ApiKeyDomainError::MalformedDigest`] unless the value is 64
    /// lowercase hexadecimal characters.
    pub fn parse(value: &str) -> Result<Self, ApiKeyDomainError> {
        let is_valid = value.len() == DIGEST_HEX_LENGTH
            && value
                .chars()
                .all(|character| matches!(character, '0'..='9' | 'a'..='f'));
        if !is_valid {
            return Err(ApiKeyDomainError::MalformedDigest);
        }
        Ok(Self(value.to_owned()))
    }

    /// Returns the digest as hex text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiKeyDigest {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
