//! Application services for server registry operations.

mod registry;

pub use registry::{
    RegisterServerRequest, ServerRegistryService, ServerRegistryServiceError,
    ServerRegistryServiceResult,
};
