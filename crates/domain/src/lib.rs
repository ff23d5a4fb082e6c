//! # sunshare-domain
//!
//! Pure domain model for the sunshare energy-sharing platform.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps, billing periods
//! - Define **Units** (metered consumers and generators belonging to a network)
//! - Define **Readings** (metered kWh values with a timestamp)
//! - Define **Tariffs** (rate per kWh with an effective date range)
//! - Contain the **settlement** arithmetic: per-unit balances, network totals,
//!   proportional deficit allocation, and the rounded report shape
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod period;
pub mod time;

pub mod reading;
pub mod settlement;
pub mod tariff;
pub mod unit;
