//! In-memory key store for tests and embedded use.

mod store;

pub use store::InMemoryApiKeyStore;
