//! Shared application state for axum handlers.

use std::sync::Arc;

use sunshare_app::ports::{ReadingRepository, TariffRepository, UnitRepository};
use sunshare_app::services::settlement_service::SettlementService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository types to avoid dynamic dispatch. `Clone` is
/// implemented manually so the repositories need not be `Clone`; only the
/// `Arc` wrapper is cloned.
pub struct AppState<UR, RR, TR> {
    /// Network settlement service.
    pub settlement_service: Arc<SettlementService<UR, RR, TR>>,
}

impl<UR, RR, TR> Clone for AppState<UR, RR, TR> {
    fn clone(&self) -> Self {
        Self {
            settlement_service: Arc::clone(&self.settlement_service),
        }
    }
}

impl<UR, RR, TR> AppState<UR, RR, TR>
where
    UR: UnitRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    TR: TariffRepository + Send + Sync + 'static,
{
    /// Create a new application state from a service instance.
    pub fn new(settlement_service: SettlementService<UR, RR, TR>) -> Self {
        Self::from_arc(Arc::new(settlement_service))
    }

    /// Create a new application state from a service already shared elsewhere.
    pub fn from_arc(settlement_service: Arc<SettlementService<UR, RR, TR>>) -> Self {
        Self { settlement_service }
    }
}
