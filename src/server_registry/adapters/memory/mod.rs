//! In-memory server registry adapter.

mod repository;

pub use repository::InMemoryServerRegistry;
