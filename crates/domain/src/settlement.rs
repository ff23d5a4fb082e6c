//! Network energy settlement for a billing period.
//!
//! The computation is split into pure stages:
//!
//! 1. [`BalanceCalculator`] turns aggregated per-unit quantities and rates
//!    into per-unit base costs and network totals.
//! 2. [`DeficitAllocator`] spreads the cost of a network deficit across
//!    consumers in proportion to their consumption.
//! 3. [`SettlementReport`] rounds the result into the shape consumed by
//!    display and export.
//!
//! Reading aggregation and tariff resolution involve IO and live in the
//! `app` crate; they feed this module through plain values.

pub mod balance;
pub mod deficit;
pub mod rates;
pub mod report;

use serde::{Deserialize, Serialize};

use crate::id::UnitId;

pub use balance::{BalanceCalculator, NetworkBalance, UnitBalance};
pub use deficit::{DeficitAllocator, DeficitPolicy};
pub use rates::RateTable;
pub use report::{SettlementReport, SettlementResult, SettlementRow};

/// A unit whose readings could not be fetched.
///
/// The unit is settled with zero quantity and still appears in the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingFetchFailure {
    pub unit_id: UnitId,
    pub reason: String,
}
