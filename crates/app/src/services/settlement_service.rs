//! Settlement service: orchestrates one network settlement for a period.
//!
//! Stages run in a fixed order: units are loaded, rates are resolved, readings
//! are aggregated, then the pure domain stages compute, allocate, and report.
//! One deadline bounds the whole run. Dropping the future returned by
//! [`SettlementService::settle`] cancels the whole computation.

use std::time::Duration;

use sunshare_domain::error::{SettlementError, SunshareError};
use sunshare_domain::id::NetworkId;
use sunshare_domain::period::Period;
use sunshare_domain::settlement::{
    BalanceCalculator, DeficitAllocator, DeficitPolicy, NetworkBalance, SettlementReport,
    SettlementResult,
};
use sunshare_domain::unit::Unit;

use super::reading_aggregator::ReadingAggregator;
use super::tariff_resolver::TariffResolver;
use crate::ports::{ReadingRepository, TariffRepository, UnitRepository};

/// Default deadline for one settlement run.
pub const DEFAULT_SETTLEMENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunables of a settlement run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementOptions {
    /// Deadline for the whole run, store lookups included.
    pub timeout: Duration,
    /// Whether deficit shares are billed or only reported.
    pub deficit_policy: DeficitPolicy,
}

impl Default for SettlementOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_SETTLEMENT_TIMEOUT,
            deficit_policy: DeficitPolicy::default(),
        }
    }
}

/// Computes the energy balance and cost split of a network.
pub struct SettlementService<UR, RR, TR> {
    units: UR,
    aggregator: ReadingAggregator<RR>,
    tariffs: TariffResolver<TR>,
    options: SettlementOptions,
}

impl<UR, RR, TR> SettlementService<UR, RR, TR>
where
    UR: UnitRepository,
    RR: ReadingRepository + Send + Sync + 'static,
    TR: TariffRepository,
{
    /// Create a settlement service from its collaborators.
    pub fn new(
        units: UR,
        aggregator: ReadingAggregator<RR>,
        tariffs: TariffResolver<TR>,
        options: SettlementOptions,
    ) -> Self {
        Self {
            units,
            aggregator,
            tariffs,
            options,
        }
    }

    /// Settle every unit registered for `network_id`.
    ///
    /// # Errors
    ///
    /// See [`SettlementService::settle_units`]. The unit lookup counts
    /// against the same deadline.
    pub async fn settle(
        &self,
        network_id: NetworkId,
        period: Period,
    ) -> Result<SettlementResult, SunshareError> {
        self.with_deadline(async {
            let units = self.units.find_by_network(network_id).await?;
            self.compute(network_id, &units, period).await
        })
        .await
    }

    /// Settle an explicit list of units. Rows keep the order of `units`.
    ///
    /// A network without units settles to an all-zero result.
    ///
    /// # Errors
    ///
    /// Returns [`SettlementError::RateUnavailable`] when no tariff covers the
    /// period, [`SettlementError::Timeout`] when the run misses its
    /// deadline, or a storage error from the tariff repository.
    pub async fn settle_units(
        &self,
        network_id: NetworkId,
        units: &[Unit],
        period: Period,
    ) -> Result<SettlementResult, SunshareError> {
        self.with_deadline(self.compute(network_id, units, period)).await
    }

    async fn with_deadline(
        &self,
        run: impl Future<Output = Result<SettlementResult, SunshareError>>,
    ) -> Result<SettlementResult, SunshareError> {
        let after = self.options.timeout;
        match tokio::time::timeout(after, run).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(?after, "settlement deadline expired");
                Err(SettlementError::Timeout { after }.into())
            }
        }
    }

    async fn compute(
        &self,
        network_id: NetworkId,
        units: &[Unit],
        period: Period,
    ) -> Result<SettlementResult, SunshareError> {
        if units.is_empty() {
            tracing::debug!(%network_id, "network has no units, settling to zero");
            return Ok(SettlementReport::build(
                network_id,
                period,
                &NetworkBalance::default(),
                Vec::new(),
            ));
        }

        let rates = self.tariffs.resolve_all(network_id, units, &period).await?;
        tracing::debug!(%network_id, network_rate = rates.network_rate(), "resolved rates");

        let aggregation = self.aggregator.aggregate_all(units, &period).await;
        tracing::debug!(
            %network_id,
            units = units.len(),
            degraded = aggregation.failures.len(),
            "aggregated readings"
        );

        let balance = BalanceCalculator::compute(units, &aggregation.quantities, &rates);
        let balance =
            DeficitAllocator::allocate(balance, rates.network_rate(), self.options.deficit_policy);
        tracing::debug!(
            %network_id,
            net_balance_kwh = balance.net_balance_kwh,
            total_cost = balance.total_cost,
            "computed balance"
        );

        Ok(SettlementReport::build(
            network_id,
            period,
            &balance,
            aggregation.failures,
        ))
    }
}
