//! Docktrine API server.
//!
//! Connects to `PostgreSQL`, applies the schema, seeds the `local` server and
//! a first API key when their tables are empty, then serves the HTTP API
//! until Ctrl-C.

use clap::Parser;
use docktrine::access::adapters::postgres::PostgresApiKeyStore;
use docktrine::config::{ApiConfig, DEFAULT_BIND, DEFAULT_DAEMON_TIMEOUT_SECS};
use docktrine::container::adapters::docker::BollardConnector;
use docktrine::database;
use docktrine::http::{self, AppState, Backend};
use docktrine::server_registry::adapters::postgres::PostgresServerRegistry;
use docktrine::telemetry;
use eyre::WrapErr;
use mockable::DefaultClock;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

const LOG_FILTER: &str = "docktrine=info,docktrine_api=info,tower_http=info";

/// Command-line arguments for the API server.
#[derive(Debug, Parser)]
#[command(name = "docktrine-api", version, about = "Docktrine HTTP API server")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "DOCKTRINE_BIND", default_value = DEFAULT_BIND)]
    bind: SocketAddr,

    /// `PostgreSQL` connection URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Timeout for daemon connections and requests, in seconds.
    #[arg(long, env = "DOCKTRINE_DAEMON_TIMEOUT_SECS", default_value_t = DEFAULT_DAEMON_TIMEOUT_SECS)]
    daemon_timeout_secs: u64,
}

/// Production adapter set.
struct PostgresBackend;

impl Backend for PostgresBackend {
    type Registry = PostgresServerRegistry;
    type Connector = BollardConnector;
    type KeyStore = PostgresApiKeyStore;
    type Clock = DefaultClock;
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    telemetry::init(LOG_FILTER).wrap_err("failed to install log subscriber")?;

    let args = Args::parse();
    let config = ApiConfig::new(args.bind, args.database_url, args.daemon_timeout_secs)?;

    let pool = database::prepare(config.database_url().to_owned())
        .await
        .wrap_err("failed to prepare database")?;

    let state = AppState::<PostgresBackend>::new(
        Arc::new(PostgresServerRegistry::new(pool.clone())),
        Arc::new(BollardConnector::new(config.daemon_timeout())),
        Arc::new(PostgresApiKeyStore::new(pool)),
        Arc::new(DefaultClock),
    );

    state
        .servers
        .bootstrap()
        .await
        .wrap_err("failed to seed server registry")?;
    state
        .access
        .bootstrap()
        .await
        .wrap_err("failed to seed API key")?;

    let listener = TcpListener::bind(config.bind())
        .await
        .wrap_err_with(|| format!("failed to bind {}", config.bind()))?;
    tracing::info!(bind = %config.bind(), "docktrine API listening");

    http::serve(listener, http::router(state)).await?;
    Ok(())
}
