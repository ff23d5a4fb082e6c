//! In-memory port implementations shared by the service tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use sunshare_domain::error::SunshareError;
use sunshare_domain::id::{NetworkId, UnitId};
use sunshare_domain::reading::Reading;
use sunshare_domain::tariff::Tariff;
use sunshare_domain::time::Timestamp;
use sunshare_domain::unit::Unit;

use crate::ports::{ReadingRepository, TariffRepository, UnitRepository};

#[derive(Default)]
pub struct InMemoryUnitRepo {
    store: Mutex<HashMap<UnitId, Unit>>,
}

impl UnitRepository for InMemoryUnitRepo {
    async fn create(&self, unit: Unit) -> Result<Unit, SunshareError> {
        self.store.lock().unwrap().insert(unit.id, unit.clone());
        Ok(unit)
    }

    async fn find_by_network(&self, network_id: NetworkId) -> Result<Vec<Unit>, SunshareError> {
        let mut units: Vec<Unit> = self
            .store
            .lock()
            .unwrap()
            .values()
            .filter(|unit| unit.network_id == network_id)
            .cloned()
            .collect();
        units.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(units)
    }
}

/// Reading store that can be slowed down or made to fail per unit.
#[derive(Default)]
pub struct InMemoryReadingRepo {
    store: Mutex<Vec<Reading>>,
    failing: HashSet<UnitId>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub completed: AtomicUsize,
}

impl InMemoryReadingRepo {
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    #[must_use]
    pub fn failing_for(mut self, unit_id: UnitId) -> Self {
        self.failing.insert(unit_id);
        self
    }

    pub fn insert(&self, unit_id: UnitId, value_kwh: f64, recorded_at: Timestamp) {
        let reading = Reading::builder()
            .unit_id(unit_id)
            .value_kwh(value_kwh)
            .recorded_at(recorded_at)
            .build()
            .unwrap();
        self.store.lock().unwrap().push(reading);
    }
}

impl ReadingRepository for InMemoryReadingRepo {
    async fn record(&self, reading: Reading) -> Result<Reading, SunshareError> {
        self.store.lock().unwrap().push(reading.clone());
        Ok(reading)
    }

    async fn find_by_unit_in_range(
        &self,
        unit_id: UnitId,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Reading>, SunshareError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);

        if self.failing.contains(&unit_id) {
            return Err(SunshareError::Storage("reading store unavailable".into()));
        }

        let readings = self
            .store
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.unit_id == unit_id && r.recorded_at >= from && r.recorded_at <= to)
            .cloned()
            .collect();
        Ok(readings)
    }
}

/// Tariff store whose lookups can be slowed down.
#[derive(Default)]
pub struct InMemoryTariffRepo {
    store: Mutex<Vec<Tariff>>,
    delay: Option<Duration>,
}

impl InMemoryTariffRepo {
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl TariffRepository for InMemoryTariffRepo {
    async fn create(&self, tariff: Tariff) -> Result<Tariff, SunshareError> {
        self.store.lock().unwrap().push(tariff.clone());
        Ok(tariff)
    }

    async fn find_by_network(&self, network_id: NetworkId) -> Result<Vec<Tariff>, SunshareError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self
            .store
            .lock()
            .unwrap()
            .iter()
            .filter(|tariff| tariff.network_id == network_id)
            .cloned()
            .collect())
    }
}
