//! Per-unit and network-level energy balance.

use std::collections::HashMap;

use serde::Serialize;

use crate::id::UnitId;
use crate::unit::{Unit, UnitKind};

use super::rates::RateTable;

/// Derived balance for a single unit.
///
/// Exactly one of `consumption_kwh` / `generation_kwh` is non-zero,
/// depending on `kind`. Generators never carry cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitBalance {
    pub unit_id: UnitId,
    pub name: String,
    pub kind: UnitKind,
    pub consumption_kwh: f64,
    pub generation_kwh: f64,
    pub cost_per_kwh: f64,
    pub base_cost: f64,
    pub deficit_share: f64,
    pub total_cost: f64,
}

/// Derived balance for a whole network.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NetworkBalance {
    pub total_consumption_kwh: f64,
    pub total_generation_kwh: f64,
    /// `total_generation_kwh - total_consumption_kwh`; negative means deficit.
    pub net_balance_kwh: f64,
    pub total_cost: f64,
    pub units: Vec<UnitBalance>,
}

impl NetworkBalance {
    /// Whether consumption exceeded generation.
    #[must_use]
    pub fn is_deficit(&self) -> bool {
        self.net_balance_kwh < 0.0
    }

    /// Size of the shortfall in kWh, zero when in surplus.
    #[must_use]
    pub fn deficit_kwh(&self) -> f64 {
        if self.is_deficit() {
            -self.net_balance_kwh
        } else {
            0.0
        }
    }

    /// Sum of consumption over consumer units.
    #[must_use]
    pub fn consumer_consumption_kwh(&self) -> f64 {
        self.units
            .iter()
            .filter(|unit| unit.kind == UnitKind::Consumer)
            .map(|unit| unit.consumption_kwh)
            .sum()
    }

    /// Sum of deficit shares over all units.
    #[must_use]
    pub fn total_deficit_share(&self) -> f64 {
        self.units.iter().map(|unit| unit.deficit_share).sum()
    }
}

/// Computes base costs and network totals. Deficit shares are left at zero.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Combine units, their aggregated quantities, and the resolved rates.
    ///
    /// Units missing from `quantities` are settled as zero. Rows keep the
    /// order of `units`.
    #[must_use]
    pub fn compute(
        units: &[Unit],
        quantities: &HashMap<UnitId, f64>,
        rates: &RateTable,
    ) -> NetworkBalance {
        let mut balance = NetworkBalance {
            units: Vec::with_capacity(units.len()),
            ..NetworkBalance::default()
        };

        for unit in units {
            let quantity = quantities.get(&unit.id).copied().unwrap_or(0.0);
            let cost_per_kwh = rates.rate_for(unit.id);

            let row = match unit.kind {
                UnitKind::Consumer => {
                    let base_cost = quantity * cost_per_kwh;
                    balance.total_consumption_kwh += quantity;
                    balance.total_cost += base_cost;
                    UnitBalance {
                        unit_id: unit.id,
                        name: unit.name.clone(),
                        kind: unit.kind,
                        consumption_kwh: quantity,
                        generation_kwh: 0.0,
                        cost_per_kwh,
                        base_cost,
                        deficit_share: 0.0,
                        total_cost: base_cost,
                    }
                }
                UnitKind::Generator => {
                    balance.total_generation_kwh += quantity;
                    UnitBalance {
                        unit_id: unit.id,
                        name: unit.name.clone(),
                        kind: unit.kind,
                        consumption_kwh: 0.0,
                        generation_kwh: quantity,
                        cost_per_kwh,
                        base_cost: 0.0,
                        deficit_share: 0.0,
                        total_cost: 0.0,
                    }
                }
            };
            balance.units.push(row);
        }

        balance.net_balance_kwh = balance.total_generation_kwh - balance.total_consumption_kwh;
        balance
    }
}
