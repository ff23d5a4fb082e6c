//! Proportional allocation of a network deficit across consumers.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::unit::UnitKind;

use super::balance::NetworkBalance;

/// What to do with a computed deficit share.
///
/// The share is always computed and exposed on each unit; the policy only
/// decides whether it is folded into the unit's `total_cost`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeficitPolicy {
    /// `total_cost = base_cost + deficit_share`.
    #[default]
    Bill,
    /// `total_cost = base_cost`; the share is informational.
    Report,
}

impl std::str::FromStr for DeficitPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bill" => Ok(Self::Bill),
            "report" => Ok(Self::Report),
            other => Err(ValidationError::UnknownDeficitPolicy(other.to_string())),
        }
    }
}

/// Distributes the monetary cost of a deficit across consumer units.
pub struct DeficitAllocator;

impl DeficitAllocator {
    /// Allocate `|net_balance| * rate` to consumers by consumption share.
    ///
    /// Returns the balance unchanged when the network is not in deficit or
    /// when consumers have no consumption to weigh the shares by.
    #[must_use]
    pub fn allocate(mut balance: NetworkBalance, rate: f64, policy: DeficitPolicy) -> NetworkBalance {
        if !balance.is_deficit() {
            return balance;
        }

        let consumer_consumption = balance.consumer_consumption_kwh();
        if consumer_consumption <= 0.0 {
            return balance;
        }

        let deficit_cost = balance.deficit_kwh() * rate;

        for unit in balance
            .units
            .iter_mut()
            .filter(|unit| unit.kind == UnitKind::Consumer)
        {
            let proportion = unit.consumption_kwh / consumer_consumption;
            unit.deficit_share = proportion * deficit_cost;
            unit.total_cost = match policy {
                DeficitPolicy::Bill => unit.base_cost + unit.deficit_share,
                DeficitPolicy::Report => unit.base_cost,
            };
        }

        balance.total_cost = balance.units.iter().map(|unit| unit.total_cost).sum();
        balance
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::id::{NetworkId, UnitId};
    use crate::settlement::balance::BalanceCalculator;
    use crate::settlement::rates::RateTable;
    use crate::unit::Unit;

    const EPSILON: f64 = 1e-9;

    fn unit(name: &str, kind: UnitKind) -> Unit {
        Unit::builder()
            .name(name)
            .kind(kind)
            .network_id(NetworkId::new())
            .build()
            .unwrap()
    }

    fn settle(
        units: &[Unit],
        quantities: &[(UnitId, f64)],
        rate: f64,
        policy: DeficitPolicy,
    ) -> NetworkBalance {
        let quantities: HashMap<UnitId, f64> = quantities.iter().copied().collect();
        let balance = BalanceCalculator::compute(units, &quantities, &RateTable::flat(rate));
        DeficitAllocator::allocate(balance, rate, policy)
    }

    #[test]
    fn should_allocate_reference_deficit_proportionally() {
        let a = unit("A", UnitKind::Consumer);
        let b = unit("B", UnitKind::Consumer);
        let g = unit("G", UnitKind::Generator);

        let balance = settle(
            &[a.clone(), b.clone(), g.clone()],
            &[(a.id, 100.0), (b.id, 300.0), (g.id, 300.0)],
            0.75,
            DeficitPolicy::Bill,
        );

        assert!((balance.total_consumption_kwh - 400.0).abs() < EPSILON);
        assert!((balance.total_generation_kwh - 300.0).abs() < EPSILON);
        assert!((balance.net_balance_kwh + 100.0).abs() < EPSILON);

        let (ra, rb, rg) = (&balance.units[0], &balance.units[1], &balance.units[2]);
        assert!((ra.base_cost - 75.0).abs() < EPSILON);
        assert!((rb.base_cost - 225.0).abs() < EPSILON);
        assert!((ra.deficit_share - 18.75).abs() < EPSILON);
        assert!((rb.deficit_share - 56.25).abs() < EPSILON);
        assert!((ra.total_cost - 93.75).abs() < EPSILON);
        assert!((rb.total_cost - 281.25).abs() < EPSILON);
        assert!(rg.deficit_share.abs() < EPSILON);
        assert!(rg.total_cost.abs() < EPSILON);
        assert!((balance.total_cost - 375.0).abs() < EPSILON);
    }

    #[test]
    fn should_sum_shares_to_deficit_cost() {
        let consumers: Vec<Unit> = (0..5)
            .map(|i| unit(&format!("c{i}"), UnitKind::Consumer))
            .collect();
        let generator = unit("g", UnitKind::Generator);
        let mut quantities: Vec<(UnitId, f64)> = consumers
            .iter()
            .zip([17.3, 0.0, 250.9, 3.1, 99.7])
            .map(|(u, q)| (u.id, q))
            .collect();
        quantities.push((generator.id, 42.0));
        let mut units = consumers.clone();
        units.push(generator);
        let rate = 0.91;

        let balance = settle(&units, &quantities, rate, DeficitPolicy::Bill);

        let expected = -balance.net_balance_kwh * rate;
        assert!((balance.total_deficit_share() - expected).abs() < 1e-6);
        let consumer_total: f64 = balance.units.iter().map(|u| u.total_cost).sum();
        assert!((consumer_total - balance.total_cost).abs() < EPSILON);
    }

    #[test]
    fn should_not_allocate_when_in_surplus() {
        let a = unit("A", UnitKind::Consumer);
        let b = unit("B", UnitKind::Consumer);
        let g = unit("G", UnitKind::Generator);

        let balance = settle(
            &[a.clone(), b.clone(), g.clone()],
            &[(a.id, 100.0), (b.id, 300.0), (g.id, 500.0)],
            0.75,
            DeficitPolicy::Bill,
        );

        assert!((balance.net_balance_kwh - 100.0).abs() < EPSILON);
        for row in &balance.units {
            assert!(row.deficit_share.abs() < EPSILON);
            assert!((row.total_cost - row.base_cost).abs() < EPSILON);
        }
        assert!((balance.total_cost - 300.0).abs() < EPSILON);
    }

    #[test]
    fn should_not_allocate_when_exactly_balanced() {
        let a = unit("A", UnitKind::Consumer);
        let g = unit("G", UnitKind::Generator);
        let balance = settle(
            &[a.clone(), g.clone()],
            &[(a.id, 100.0), (g.id, 100.0)],
            0.75,
            DeficitPolicy::Bill,
        );
        assert!(balance.total_deficit_share().abs() < EPSILON);
    }

    #[test]
    fn should_skip_allocation_when_consumers_have_no_consumption() {
        let a = unit("A", UnitKind::Consumer);
        let balance = NetworkBalance {
            net_balance_kwh: -50.0,
            ..BalanceCalculator::compute(
                std::slice::from_ref(&a),
                &HashMap::from([(a.id, 0.0)]),
                &RateTable::flat(0.75),
            )
        };

        let allocated = DeficitAllocator::allocate(balance, 0.75, DeficitPolicy::Bill);
        assert!(allocated.units[0].deficit_share.abs() < EPSILON);
        assert!(!allocated.units[0].deficit_share.is_nan());
    }

    #[test]
    fn should_skip_allocation_when_there_are_no_consumers() {
        let g = unit("G", UnitKind::Generator);
        let balance = NetworkBalance {
            net_balance_kwh: -10.0,
            ..BalanceCalculator::compute(
                std::slice::from_ref(&g),
                &HashMap::from([(g.id, 0.0)]),
                &RateTable::flat(0.75),
            )
        };

        let allocated = DeficitAllocator::allocate(balance, 0.75, DeficitPolicy::Bill);
        assert!(allocated.total_deficit_share().abs() < EPSILON);
        assert!(allocated.total_cost.abs() < EPSILON);
    }

    #[test]
    fn should_expose_share_without_billing_it_under_report_policy() {
        let a = unit("A", UnitKind::Consumer);
        let b = unit("B", UnitKind::Consumer);
        let g = unit("G", UnitKind::Generator);

        let balance = settle(
            &[a.clone(), b.clone(), g.clone()],
            &[(a.id, 100.0), (b.id, 300.0), (g.id, 300.0)],
            0.75,
            DeficitPolicy::Report,
        );

        assert!((balance.units[0].deficit_share - 18.75).abs() < EPSILON);
        assert!((balance.units[0].total_cost - 75.0).abs() < EPSILON);
        assert!((balance.total_cost - 300.0).abs() < EPSILON);
    }

    #[test]
    fn should_parse_policy_names() {
        assert_eq!("bill".parse::<DeficitPolicy>().unwrap(), DeficitPolicy::Bill);
        assert_eq!(
            "report".parse::<DeficitPolicy>().unwrap(),
            DeficitPolicy::Report
        );
        assert!("waive".parse::<DeficitPolicy>().is_err());
    }
}
