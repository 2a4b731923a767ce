//! Docker daemon endpoint registry for Docktrine.
//!
//! Each registered server maps a unique logical name to a daemon host URI.
//! Exactly one entry may be flagged as the default, and the registry seeds a
//! `local` entry pointing at the platform daemon socket when first
//! initialized. The module follows hexagonal architecture:
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
