//! Adapter implementations for daemon access.

pub mod docker;
pub mod memory;
