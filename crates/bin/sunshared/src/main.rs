//! # sunshared: sunshare settlement daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct the settlement service, injecting repositories via port traits
//! - Build the axum router, injecting the service
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use sunshare_adapter_http_axum::state::AppState;
use sunshare_adapter_storage_sqlite_sqlx::{
    SqliteReadingRepository, SqliteTariffRepository, SqliteUnitRepository,
};
use sunshare_app::services::reading_aggregator::ReadingAggregator;
use sunshare_app::services::settlement_service::SettlementService;
use sunshare_app::services::tariff_resolver::TariffResolver;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("invalid log filter {:?}", config.logging.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Database
    let pool_size = u32::try_from(config.settlement.max_concurrent_fetches).unwrap_or(u32::MAX);
    let db = sunshare_adapter_storage_sqlite_sqlx::Config::new(config.database_url())
        .with_max_connections(pool_size)
        .build()
    .await
    .context("failed to open database")?;
    let pool = db.pool().clone();

    // Repositories
    let unit_repo = SqliteUnitRepository::new(pool.clone());
    let reading_repo = SqliteReadingRepository::new(pool.clone());
    let tariff_repo = SqliteTariffRepository::new(pool);

    // Services
    let mut tariffs = TariffResolver::new(tariff_repo);
    if let Some(rate) = config.settlement.fallback_rate {
        tracing::warn!(rate, "fallback rate configured, periods without a tariff will use it");
        tariffs = tariffs.with_fallback_rate(rate);
    }
    let aggregator = ReadingAggregator::new(reading_repo, config.settlement.max_concurrent_fetches);
    let settlement_service = SettlementService::new(
        unit_repo,
        aggregator,
        tariffs,
        config.settlement_options(),
    );

    // HTTP
    let app = sunshare_adapter_http_axum::router::build(AppState::new(settlement_service));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "sunshared listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
