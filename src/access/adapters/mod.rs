//! Adapter implementations for API key storage.

pub mod memory;
pub mod postgres;
