//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use sunshare_app::ports::{ReadingRepository, TariffRepository, UnitRepository};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api` and includes a [`TraceLayer`] that logs
/// each HTTP request/response using the `tracing` ecosystem.
pub fn build<UR, RR, TR>(state: AppState<UR, RR, TR>) -> Router
where
    UR: UnitRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    TR: TariffRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
