//! Docktrine: multi-server Docker container lifecycle management.
//!
//! This crate keeps a registry of Docker daemon endpoints, resolves a daemon
//! client for a requested server, and drives container operations (list,
//! inspect, start, stop, restart with optional image refresh) against it.
//! Access to the HTTP API is gated by API keys.
//!
//! # Architecture
//!
//! Docktrine follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, Docker, etc.)
//!
//! # Modules
//!
//! - [`server_registry`]: Named daemon endpoints and the default selection
//! - [`container`]: Daemon client resolution and container lifecycle
//! - [`access`]: API key issuance and authentication
//! - [`http`]: Authenticated JSON façade over the services
//! - [`client`]: HTTP client, session state and shell parsing for the CLI

pub mod access;
pub mod client;
pub mod config;
pub mod container;
pub mod database;
pub mod error;
pub mod http;
pub mod server_registry;
pub mod telemetry;
