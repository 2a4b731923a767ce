//! API key authentication for Docktrine.
//!
//! Keys are random 256-bit tokens handed out once in plaintext; the key store
//! only ever sees their SHA-256 digest. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
