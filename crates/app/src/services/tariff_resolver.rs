//! Tariff resolver: finds the rate applicable to a unit for a period.

use sunshare_domain::error::{SettlementError, SunshareError};
use sunshare_domain::id::{NetworkId, UnitId};
use sunshare_domain::period::Period;
use sunshare_domain::settlement::RateTable;
use sunshare_domain::tariff::{Tariff, select_tariff};
use sunshare_domain::unit::Unit;

use crate::ports::TariffRepository;

/// History-aware rate lookup over a [`TariffRepository`].
///
/// When no tariff covers a period the resolver fails with
/// [`SettlementError::RateUnavailable`], unless the operator configured an
/// explicit fallback rate.
pub struct TariffResolver<T> {
    repo: T,
    fallback_rate: Option<f64>,
}

impl<T: TariffRepository> TariffResolver<T> {
    /// Create a resolver without a fallback rate.
    pub fn new(repo: T) -> Self {
        Self {
            repo,
            fallback_rate: None,
        }
    }

    /// Use `rate` whenever no tariff covers the requested period.
    #[must_use]
    pub fn with_fallback_rate(mut self, rate: f64) -> Self {
        self.fallback_rate = Some(rate);
        self
    }

    /// Rate applicable to `unit` for `period`.
    ///
    /// # Errors
    ///
    /// Returns [`SettlementError::RateUnavailable`] when nothing covers the
    /// period, or a storage error from the repository.
    pub async fn resolve(&self, unit: &Unit, period: &Period) -> Result<f64, SunshareError> {
        let tariffs = self.repo.find_by_network(unit.network_id).await?;
        Ok(self.pick(&tariffs, Some(unit.id), period)?)
    }

    /// Network-wide rate for `period`, used to price deficits.
    ///
    /// # Errors
    ///
    /// Returns [`SettlementError::RateUnavailable`] when nothing covers the
    /// period, or a storage error from the repository.
    pub async fn resolve_network(
        &self,
        network_id: NetworkId,
        period: &Period,
    ) -> Result<f64, SunshareError> {
        let tariffs = self.repo.find_by_network(network_id).await?;
        Ok(self.pick(&tariffs, None, period)?)
    }

    /// Resolve the network rate and every unit-specific override in one lookup.
    ///
    /// # Errors
    ///
    /// Returns [`SettlementError::RateUnavailable`] when the network rate
    /// cannot be resolved, or a storage error from the repository.
    pub async fn resolve_all(
        &self,
        network_id: NetworkId,
        units: &[Unit],
        period: &Period,
    ) -> Result<RateTable, SunshareError> {
        let tariffs = self.repo.find_by_network(network_id).await?;
        let mut rates = RateTable::flat(self.pick(&tariffs, None, period)?);

        for unit in units {
            if let Some(tariff) = select_tariff(&tariffs, Some(unit.id), period)
                .filter(|tariff| tariff.unit_id == Some(unit.id))
            {
                rates = rates.with_unit_rate(unit.id, tariff.rate_per_kwh);
            }
        }

        Ok(rates)
    }

    fn pick(
        &self,
        tariffs: &[Tariff],
        unit_id: Option<UnitId>,
        period: &Period,
    ) -> Result<f64, SettlementError> {
        if let Some(tariff) = select_tariff(tariffs, unit_id, period) {
            tracing::debug!(tariff_id = %tariff.id, rate = tariff.rate_per_kwh, "resolved tariff");
            return Ok(tariff.rate_per_kwh);
        }

        match self.fallback_rate {
            Some(rate) => {
                tracing::warn!(?unit_id, rate, "no tariff covers period, using configured fallback rate");
                Ok(rate)
            }
            None => Err(SettlementError::RateUnavailable { unit_id }),
        }
    }
}
