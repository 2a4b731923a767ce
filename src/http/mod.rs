//! HTTP façade over the registry, access gate and lifecycle services.
//!
//! Every route sits behind the `X-API-Key` check. Errors are rendered as
//! `{"error": "<message>"}` with a status derived from [`ErrorKind`].
//!
//! [`ErrorKind`]: crate::error::ErrorKind

mod auth;
mod dto;
mod error;
mod handlers;

pub use auth::API_KEY_HEADER;
pub use dto::{CreateServerBody, MessageResponse, ServerView};
pub use error::ApiError;

use crate::access::{ports::ApiKeyStore, services::AccessGate};
use crate::container::{
    ports::DaemonConnector,
    services::{ContainerLifecycleService, DaemonClientResolver},
};
use crate::server_registry::{ports::ServerRegistryRepository, services::ServerRegistryService};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use mockable::Clock;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Adapter set the façade is assembled from.
pub trait Backend: Send + Sync + 'static {
    /// Server registry storage.
    type Registry: ServerRegistryRepository + 'static;
    /// Daemon connector.
    type Connector: DaemonConnector + 'static;
    /// API key storage.
    type KeyStore: ApiKeyStore + 'static;
    /// Time source.
    type Clock: Clock + Send + Sync + 'static;
}

/// Services shared by every handler.
pub struct AppState<B: Backend> {
    /// Server registry service.
    pub servers: ServerRegistryService<B::Registry, B::Clock>,
    /// Container lifecycle service.
    pub containers: ContainerLifecycleService<B::Registry, B::Connector>,
    /// Access gate.
    pub access: AccessGate<B::KeyStore, B::Clock>,
}

impl<B: Backend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            servers: self.servers.clone(),
            containers: self.containers.clone(),
            access: self.access.clone(),
        }
    }
}

impl<B: Backend> AppState<B> {
    /// Wires the services from shared adapters.
    #[must_use]
    pub fn new(
        registry: Arc<B::Registry>,
        connector: Arc<B::Connector>,
        key_store: Arc<B::KeyStore>,
        clock: Arc<B::Clock>,
    ) -> Self {
        Self {
            servers: ServerRegistryService::new(Arc::clone(&registry), Arc::clone(&clock)),
            containers: ContainerLifecycleService::new(DaemonClientResolver::new(
                registry, connector,
            )),
            access: AccessGate::new(key_store, clock),
        }
    }
}

/// Builds the API router.
#[must_use]
pub fn router<B: Backend>(state: AppState<B>) -> Router {
    Router::new()
        .route("/containers", get(handlers::list_containers::<B>))
        .route("/containers/{id}", get(handlers::get_container::<B>))
        .route("/containers/start/{id}", post(handlers::start_container::<B>))
        .route("/containers/stop/{id}", post(handlers::stop_container::<B>))
        .route(
            "/containers/restart/{id}",
            post(handlers::restart_container::<B>),
        )
        .route(
            "/servers",
            get(handlers::list_servers::<B>).post(handlers::create_server::<B>),
        )
        .route(
            "/servers/{name}",
            get(handlers::get_server::<B>).delete(handlers::delete_server::<B>),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key::<B>,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves `router` on `listener` until Ctrl-C is received.
///
/// # Errors
///
/// Returns I/O errors from the accept loop.
pub async fn serve(listener: TcpListener, router: Router) -> std::io::Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
