//! `PostgreSQL` adapters for API key persistence.

mod models;
mod schema;
mod store;

pub use store::{KeyPgPool, PostgresApiKeyStore};
