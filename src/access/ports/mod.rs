//! Port contracts for API key storage.

mod store;

pub use store::{ApiKeyStore, ApiKeyStoreError, ApiKeyStoreResult};
