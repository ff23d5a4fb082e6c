//! Resolved rates for one settlement.

use std::collections::HashMap;

use crate::id::UnitId;

/// The network-wide rate plus any per-unit overrides, in currency per kWh.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RateTable {
    network_rate: f64,
    unit_rates: HashMap<UnitId, f64>,
}

impl RateTable {
    /// A single rate applied to every unit.
    #[must_use]
    pub fn flat(rate: f64) -> Self {
        Self {
            network_rate: rate,
            unit_rates: HashMap::new(),
        }
    }

    /// Override the rate for one unit.
    #[must_use]
    pub fn with_unit_rate(mut self, unit_id: UnitId, rate: f64) -> Self {
        self.unit_rates.insert(unit_id, rate);
        self
    }

    /// Rate used to price the network deficit.
    #[must_use]
    pub fn network_rate(&self) -> f64 {
        self.network_rate
    }

    /// Rate applicable to `unit_id`, falling back to the network rate.
    #[must_use]
    pub fn rate_for(&self, unit_id: UnitId) -> f64 {
        self.unit_rates
            .get(&unit_id)
            .copied()
            .unwrap_or(self.network_rate)
    }
}
