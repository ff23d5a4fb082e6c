//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`SunshareError`]
//! via `#[from]`.

use std::time::Duration;

use crate::id::UnitId;
use crate::time::Timestamp;

/// Top-level error shared by every port and service.
#[derive(Debug, thiserror::Error)]
pub enum SunshareError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("settlement failed")]
    Settlement(#[from] SettlementError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("name must not be empty")]
    EmptyName,

    #[error("reading value must be a non-negative number, got {0}")]
    InvalidReadingValue(f64),

    #[error("tariff rate must be a non-negative number, got {0}")]
    InvalidRate(f64),

    #[error("tariff ends at {end} before it starts at {start}")]
    InvalidTariffRange { start: Timestamp, end: Timestamp },

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("invalid {label} id: {value}")]
    InvalidId { label: &'static str, value: String },

    #[error("unknown unit kind: {0}")]
    UnknownUnitKind(String),

    #[error("unknown deficit policy: {0}")]
    UnknownDeficitPolicy(String),
}

/// Failures that abort a whole settlement computation.
///
/// Per-unit reading failures are *not* represented here: they degrade the
/// unit to zero and are reported through
/// [`ReadingFetchFailure`](crate::settlement::ReadingFetchFailure).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettlementError {
    #[error("invalid period: {reason}")]
    InvalidPeriod { reason: String },

    #[error("no tariff covers the period for unit {unit_id:?}")]
    RateUnavailable { unit_id: Option<UnitId> },

    #[error("settlement timed out after {after:?}")]
    Timeout { after: Duration },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_validation_error_into_top_level() {
        let err: SunshareError = ValidationError::EmptyName.into();
        assert!(matches!(
            err,
            SunshareError::Validation(ValidationError::EmptyName)
        ));
    }

    #[test]
    fn should_convert_settlement_error_into_top_level() {
        let err: SunshareError = SettlementError::Timeout {
            after: Duration::from_secs(5),
        }
        .into();
        assert!(matches!(
            err,
            SunshareError::Settlement(SettlementError::Timeout { .. })
        ));
    }

    #[test]
    fn should_display_sub_second_timeout() {
        let err = SettlementError::Timeout {
            after: Duration::from_millis(500),
        };
        assert_eq!(err.to_string(), "settlement timed out after 500ms");
    }
}
