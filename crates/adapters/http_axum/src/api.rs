//! JSON and CSV API handlers.

#[allow(clippy::missing_errors_doc)]
pub mod networks;

use axum::Router;
use axum::routing::get;

use sunshare_app::ports::{ReadingRepository, TariffRepository, UnitRepository};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<UR, RR, TR>() -> Router<AppState<UR, RR, TR>>
where
    UR: UnitRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    TR: TariffRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/networks/{id}/balance",
            get(networks::balance::<UR, RR, TR>),
        )
        .route(
            "/networks/{id}/balance/csv",
            get(networks::balance_csv::<UR, RR, TR>),
        )
}
