//! Externally consumed settlement shape, rounded for display and export.

use serde::{Deserialize, Serialize};

use crate::id::{NetworkId, UnitId};
use crate::period::Period;
use crate::unit::UnitKind;

use super::ReadingFetchFailure;
use super::balance::NetworkBalance;

/// One row per unit, in the column order used by exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRow {
    pub id: UnitId,
    pub name: String,
    pub kind: UnitKind,
    #[serde(rename = "consumptionKWh")]
    pub consumption_kwh: f64,
    #[serde(rename = "costPerKWh")]
    pub cost_per_kwh: f64,
    pub base_cost: f64,
    #[serde(rename = "generationKWh")]
    pub generation_kwh: f64,
    pub deficit_share: f64,
    pub total_cost: f64,
}

/// Network totals plus per-unit rows for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResult {
    pub network_id: NetworkId,
    pub period: Period,
    pub total_consumption: f64,
    pub total_generation: f64,
    /// Net balance in kWh; negative means the network was in deficit.
    pub surplus: f64,
    pub total_cost: f64,
    pub total_deficit_share: f64,
    pub units: Vec<SettlementRow>,
    /// Units settled as zero because their readings could not be fetched.
    pub degraded_units: Vec<ReadingFetchFailure>,
}

/// Reshapes a [`NetworkBalance`] into a [`SettlementResult`].
pub struct SettlementReport;

impl SettlementReport {
    /// Round money to cents and energy to watt-hours. No other logic.
    #[must_use]
    pub fn build(
        network_id: NetworkId,
        period: Period,
        balance: &NetworkBalance,
        degraded_units: Vec<ReadingFetchFailure>,
    ) -> SettlementResult {
        let units = balance
            .units
            .iter()
            .map(|unit| SettlementRow {
                id: unit.unit_id,
                name: unit.name.clone(),
                kind: unit.kind,
                consumption_kwh: round_energy(unit.consumption_kwh),
                cost_per_kwh: unit.cost_per_kwh,
                base_cost: round_currency(unit.base_cost),
                generation_kwh: round_energy(unit.generation_kwh),
                deficit_share: round_currency(unit.deficit_share),
                total_cost: round_currency(unit.total_cost),
            })
            .collect();

        SettlementResult {
            network_id,
            period,
            total_consumption: round_energy(balance.total_consumption_kwh),
            total_generation: round_energy(balance.total_generation_kwh),
            surplus: round_energy(balance.net_balance_kwh),
            total_cost: round_currency(balance.total_cost),
            total_deficit_share: round_currency(balance.total_deficit_share()),
            units,
            degraded_units,
        }
    }
}

/// Round to two decimal places, half away from zero.
#[must_use]
pub fn round_currency(value: f64) -> f64 {
    round_to(value, 100.0)
}

/// Round to three decimal places, half away from zero.
#[must_use]
pub fn round_energy(value: f64) -> f64 {
    round_to(value, 1000.0)
}

fn round_to(value: f64, scale: f64) -> f64 {
    // adding zero turns -0.0 into 0.0
    (value * scale).round() / scale + 0.0
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::settlement::{BalanceCalculator, DeficitAllocator, DeficitPolicy, RateTable};
    use crate::unit::Unit;

    fn reference_network() -> (NetworkId, Vec<Unit>, HashMap<UnitId, f64>) {
        let network = NetworkId::new();
        let make = |name: &str, kind| {
            Unit::builder()
                .name(name)
                .kind(kind)
                .network_id(network)
                .build()
                .unwrap()
        };
        let a = make("A", UnitKind::Consumer);
        let b = make("B", UnitKind::Consumer);
        let g = make("G", UnitKind::Generator);
        let quantities = HashMap::from([(a.id, 100.0), (b.id, 300.0), (g.id, 300.0)]);
        (network, vec![a, b, g], quantities)
    }

    #[test]
    fn should_round_currency_to_cents() {
        assert!((round_currency(18.754_999) - 18.75).abs() < f64::EPSILON);
        assert!((round_currency(0.125) - 0.13).abs() < f64::EPSILON);
        assert!((round_currency(93.75) - 93.75).abs() < f64::EPSILON);
    }

    #[test]
    fn should_normalise_negative_zero() {
        assert!(round_currency(-0.001).is_sign_positive());
    }

    #[test]
    fn should_build_reference_report() {
        let (network, units, quantities) = reference_network();
        let balance = BalanceCalculator::compute(&units, &quantities, &RateTable::flat(0.75));
        let balance = DeficitAllocator::allocate(balance, 0.75, DeficitPolicy::Bill);

        let report =
            SettlementReport::build(network, Period::month(2024, 3).unwrap(), &balance, vec![]);

        assert!((report.total_consumption - 400.0).abs() < f64::EPSILON);
        assert!((report.total_generation - 300.0).abs() < f64::EPSILON);
        assert!((report.surplus + 100.0).abs() < f64::EPSILON);
        assert!((report.total_cost - 375.0).abs() < f64::EPSILON);
        assert!((report.total_deficit_share - 75.0).abs() < f64::EPSILON);
        assert_eq!(report.units.len(), 3);
        assert_eq!(report.units[0].name, "A");
        assert!((report.units[0].total_cost - 93.75).abs() < f64::EPSILON);
        assert!((report.units[1].total_cost - 281.25).abs() < f64::EPSILON);
    }

    #[test]
    fn should_serialize_with_export_field_names() {
        let (network, units, quantities) = reference_network();
        let balance = BalanceCalculator::compute(&units, &quantities, &RateTable::flat(0.75));
        let report =
            SettlementReport::build(network, Period::month(2024, 3).unwrap(), &balance, vec![]);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("totalConsumption").is_some());
        assert!(json.get("surplus").is_some());
        let row = &json["units"][0];
        for key in [
            "id",
            "name",
            "kind",
            "consumptionKWh",
            "costPerKWh",
            "baseCost",
            "generationKWh",
            "deficitShare",
            "totalCost",
        ] {
            assert!(row.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn should_produce_identical_output_for_identical_input() {
        let (network, units, quantities) = reference_network();
        let period = Period::month(2024, 3).unwrap();
        let run = || {
            let balance = BalanceCalculator::compute(&units, &quantities, &RateTable::flat(0.75));
            let balance = DeficitAllocator::allocate(balance, 0.75, DeficitPolicy::Bill);
            serde_json::to_vec(&SettlementReport::build(network, period, &balance, vec![]))
                .unwrap()
        };
        assert_eq!(run(), run());
    }
}
