//! Port contracts for server registry persistence.

mod repository;

pub use repository::{ServerRegistryError, ServerRegistryRepository, ServerRegistryResult};
