//! Container lifecycle operations across registered Docker daemons.
//!
//! A request names a server (or none, meaning the registry default); the
//! resolver turns that into a scoped daemon session, and the lifecycle service
//! runs exactly one operation against it before the session is released.
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
