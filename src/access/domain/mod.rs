//! Domain model for API keys.

mod error;
mod key;
mod record;

pub use error::ApiKeyDomainError;
pub use key::{ApiKeyDigest, ApiKeyId, ApiKeySecret};
pub use record::{ApiKeyRecord, IssuedApiKey, PersistedApiKeyData};

/// Description attached to the key generated for an empty key store.
pub const BOOTSTRAP_KEY_DESCRIPTION: &str = "Default API key";
