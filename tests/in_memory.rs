//! In-memory integration tests.
//!
//! Tests are organized into modules by functionality:
//! - `registry_resolution_tests`: Registry changes seen by container calls
//! - `access_tests`: Key issuance and authentication

mod in_memory {
    pub mod helpers;

    mod access_tests;
    mod registry_resolution_tests;
}
