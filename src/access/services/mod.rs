//! Application services for API key authentication.

mod gate;

pub use gate::{AccessError, AccessGate};
