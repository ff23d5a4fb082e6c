//! Storage port: repository traits for units, readings, and tariffs.

use std::future::Future;
use std::sync::Arc;

use sunshare_domain::error::SunshareError;
use sunshare_domain::id::{NetworkId, UnitId};
use sunshare_domain::reading::Reading;
use sunshare_domain::tariff::Tariff;
use sunshare_domain::time::Timestamp;
use sunshare_domain::unit::Unit;

/// Repository for the units of a network.
pub trait UnitRepository {
    /// Persist a new unit.
    fn create(&self, unit: Unit) -> impl Future<Output = Result<Unit, SunshareError>> + Send;

    /// All units of a network, ordered by name then id.
    fn find_by_network(
        &self,
        network_id: NetworkId,
    ) -> impl Future<Output = Result<Vec<Unit>, SunshareError>> + Send;
}

/// Source of metered readings.
pub trait ReadingRepository {
    /// Persist a new reading.
    fn record(&self, reading: Reading)
    -> impl Future<Output = Result<Reading, SunshareError>> + Send;

    /// Readings of `unit_id` recorded within `[from, to]`, oldest first.
    fn find_by_unit_in_range(
        &self,
        unit_id: UnitId,
        from: Timestamp,
        to: Timestamp,
    ) -> impl Future<Output = Result<Vec<Reading>, SunshareError>> + Send;
}

/// Repository for tariff history.
pub trait TariffRepository {
    /// Persist a new tariff record.
    fn create(&self, tariff: Tariff) -> impl Future<Output = Result<Tariff, SunshareError>> + Send;

    /// Every tariff record of a network, network-wide and unit-specific alike.
    fn find_by_network(
        &self,
        network_id: NetworkId,
    ) -> impl Future<Output = Result<Vec<Tariff>, SunshareError>> + Send;
}

impl<T: UnitRepository + Send + Sync> UnitRepository for Arc<T> {
    fn create(&self, unit: Unit) -> impl Future<Output = Result<Unit, SunshareError>> + Send {
        (**self).create(unit)
    }

    fn find_by_network(
        &self,
        network_id: NetworkId,
    ) -> impl Future<Output = Result<Vec<Unit>, SunshareError>> + Send {
        (**self).find_by_network(network_id)
    }
}

impl<T: ReadingRepository + Send + Sync> ReadingRepository for Arc<T> {
    fn record(
        &self,
        reading: Reading,
    ) -> impl Future<Output = Result<Reading, SunshareError>> + Send {
        (**self).record(reading)
    }

    fn find_by_unit_in_range(
        &self,
        unit_id: UnitId,
        from: Timestamp,
        to: Timestamp,
    ) -> impl Future<Output = Result<Vec<Reading>, SunshareError>> + Send {
        (**self).find_by_unit_in_range(unit_id, from, to)
    }
}

impl<T: TariffRepository + Send + Sync> TariffRepository for Arc<T> {
    fn create(&self, tariff: Tariff) -> impl Future<Output = Result<Tariff, SunshareError>> + Send {
        (**self).create(tariff)
    }

    fn find_by_network(
        &self,
        network_id: NetworkId,
    ) -> impl Future<Output = Result<Vec<Tariff>, SunshareError>> + Send {
        (**self).find_by_network(network_id)
    }
}
