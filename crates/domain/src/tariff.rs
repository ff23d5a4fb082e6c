//! Tariff: the monetary rate per kWh applied to consumption.
//!
//! A tariff is either network-wide (`unit_id = None`) or overrides the rate
//! for a single unit. Each record is effective over the half-open range
//! `[start, end)`; `end = None` means the tariff is still current.

use serde::{Deserialize, Serialize};

use crate::error::{SunshareError, ValidationError};
use crate::id::{NetworkId, TariffId, UnitId};
use crate::period::Period;
use crate::time::Timestamp;

/// A rate (currency per kWh) with its effective date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tariff {
    pub id: TariffId,
    pub network_id: NetworkId,
    pub unit_id: Option<UnitId>,
    pub rate_per_kwh: f64,
    pub start: Timestamp,
    pub end: Option<Timestamp>,
}

impl Tariff {
    /// Create a builder for constructing a [`Tariff`].
    #[must_use]
    pub fn builder() -> TariffBuilder {
        TariffBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SunshareError::Validation`] when the rate is negative or not
    /// finite, or when `end` precedes `start`.
    pub fn validate(&self) -> Result<(), SunshareError> {
        if !self.rate_per_kwh.is_finite() || self.rate_per_kwh < 0.0 {
            return Err(ValidationError::InvalidRate(self.rate_per_kwh).into());
        }
        if let Some(end) = self.end {
            if end < self.start {
                return Err(ValidationError::InvalidTariffRange {
                    start: self.start,
                    end,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Whether this tariff is effective for the whole of `period`.
    #[must_use]
    pub fn covers(&self, period: &Period) -> bool {
        self.start <= period.start() && self.end.is_none_or(|end| period.end() < end)
    }
}

/// Pick the tariff applicable to `unit_id` (or the network as a whole when
/// `None`) for `period`.
///
/// A unit-specific tariff wins over a network-wide one. When several records
/// of the same scope cover the period, the one that started last wins.
#[must_use]
pub fn select_tariff<'a>(
    tariffs: &'a [Tariff],
    unit_id: Option<UnitId>,
    period: &Period,
) -> Option<&'a Tariff> {
    let latest_for = |scope: Option<UnitId>| {
        tariffs
            .iter()
            .filter(|tariff| tariff.unit_id == scope && tariff.covers(period))
            .max_by_key(|tariff| tariff.start)
    };

    unit_id.and_then(|id| latest_for(Some(id))).or_else(|| latest_for(None))
}

/// Step-by-step builder for [`Tariff`].
#[derive(Debug, Default)]
pub struct TariffBuilder {
    id: Option<TariffId>,
    network_id: Option<NetworkId>,
    unit_id: Option<UnitId>,
    rate_per_kwh: f64,
    start: Option<Timestamp>,
    end: Option<Timestamp>,
}

impl TariffBuilder {
    #[must_use]
    pub fn id(mut self, id: TariffId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn network_id(mut self, network_id: NetworkId) -> Self {
        self.network_id = Some(network_id);
        self
    }

    #[must_use]
    pub fn unit_id(mut self, unit_id: UnitId) -> Self {
        self.unit_id = Some(unit_id);
        self
    }

    #[must_use]
    pub fn rate_per_kwh(mut self, rate_per_kwh: f64) -> Self {
        self.rate_per_kwh = rate_per_kwh;
        self
    }

    #[must_use]
    pub fn start(mut self, start: Timestamp) -> Self {
        self.start = Some(start);
        self
    }

    #[must_use]
    pub fn end(mut self, end: Timestamp) -> Self {
        self.end = Some(end);
        self
    }

    /// Consume the builder, validate, and return a [`Tariff`].
    ///
    /// A missing `start` defaults to the Unix epoch, i.e. "since forever".
    ///
    /// # Errors
    ///
    /// Returns [`SunshareError::Validation`] if `network_id` was never set,
    /// or if the rate or range is invalid.
    pub fn build(self) -> Result<Tariff, SunshareError> {
        let network_id = self
            .network_id
            .ok_or(ValidationError::MissingField("network_id"))?;
        let tariff = Tariff {
            id: self.id.unwrap_or_default(),
            network_id,
            unit_id: self.unit_id,
            rate_per_kwh: self.rate_per_kwh,
            start: self.start.unwrap_or_default(),
            end: self.end,
        };
        tariff.validate()?;
        Ok(tariff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ts(year: i32, month: u32, day: u32) -> Timestamp {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    fn network_tariff(rate: f64, start: Timestamp, end: Option<Timestamp>) -> Tariff {
        let mut builder = Tariff::builder()
            .network_id(NetworkId::new())
            .rate_per_kwh(rate)
            .start(start);
        if let Some(end) = end {
            builder = builder.end(end);
        }
        builder.build().unwrap()
    }

    #[test]
    fn should_reject_negative_rate() {
        let result = Tariff::builder()
            .network_id(NetworkId::new())
            .rate_per_kwh(-0.1)
            .build();
        assert!(matches!(
            result,
            Err(SunshareError::Validation(ValidationError::InvalidRate(_)))
        ));
    }

    #[test]
    fn should_reject_end_before_start() {
        let result = Tariff::builder()
            .network_id(NetworkId::new())
            .rate_per_kwh(0.5)
            .start(ts(2024, 2, 1))
            .end(ts(2024, 1, 1))
            .build();
        assert!(matches!(
            result,
            Err(SunshareError::Validation(
                ValidationError::InvalidTariffRange { .. }
            ))
        ));
    }

    #[test]
    fn should_require_network_id() {
        let result = Tariff::builder().rate_per_kwh(0.5).build();
        assert!(matches!(
            result,
            Err(SunshareError::Validation(ValidationError::MissingField(
                "network_id"
            )))
        ));
    }

    #[test]
    fn should_cover_period_when_still_current() {
        let tariff = network_tariff(0.75, ts(2023, 1, 1), None);
        assert!(tariff.covers(&Period::month(2024, 3).unwrap()));
    }

    #[test]
    fn should_not_cover_period_ending_on_exclusive_end() {
        let tariff = network_tariff(0.75, ts(2024, 1, 1), Some(ts(2024, 3, 1)));
        assert!(tariff.covers(&Period::month(2024, 2).unwrap()));
        assert!(!tariff.covers(&Period::month(2024, 3).unwrap()));
    }

    #[test]
    fn should_not_cover_period_starting_before_tariff() {
        let tariff = network_tariff(0.75, ts(2024, 2, 15), None);
        assert!(!tariff.covers(&Period::month(2024, 2).unwrap()));
    }

    #[test]
    fn should_select_tariff_in_effect_for_historic_period() {
        let old = network_tariff(0.60, ts(2023, 1, 1), Some(ts(2024, 1, 1)));
        let current = network_tariff(0.75, ts(2024, 1, 1), None);
        let tariffs = vec![old.clone(), current.clone()];

        let picked = select_tariff(&tariffs, None, &Period::month(2023, 6).unwrap()).unwrap();
        assert_eq!(picked.id, old.id);

        let picked = select_tariff(&tariffs, None, &Period::month(2024, 6).unwrap()).unwrap();
        assert_eq!(picked.id, current.id);
    }

    #[test]
    fn should_prefer_latest_start_when_ranges_overlap() {
        let base = network_tariff(0.60, ts(2023, 1, 1), None);
        let revised = network_tariff(0.70, ts(2024, 1, 1), None);
        let tariffs = vec![revised.clone(), base];

        let picked = select_tariff(&tariffs, None, &Period::month(2024, 6).unwrap()).unwrap();
        assert_eq!(picked.id, revised.id);
    }

    #[test]
    fn should_prefer_unit_specific_tariff() {
        let unit = UnitId::new();
        let network_wide = network_tariff(0.75, ts(2023, 1, 1), None);
        let specific = Tariff::builder()
            .network_id(network_wide.network_id)
            .unit_id(unit)
            .rate_per_kwh(0.50)
            .start(ts(2023, 1, 1))
            .build()
            .unwrap();
        let tariffs = vec![network_wide.clone(), specific.clone()];
        let period = Period::month(2024, 6).unwrap();

        assert_eq!(
            select_tariff(&tariffs, Some(unit), &period).unwrap().id,
            specific.id
        );
        assert_eq!(
            select_tariff(&tariffs, Some(UnitId::new()), &period)
                .unwrap()
                .id,
            network_wide.id
        );
        assert_eq!(
            select_tariff(&tariffs, None, &period).unwrap().id,
            network_wide.id
        );
    }

    #[test]
    fn should_return_none_when_no_tariff_covers_period() {
        let tariffs = vec![network_tariff(0.75, ts(2024, 1, 1), Some(ts(2024, 2, 1)))];
        assert!(select_tariff(&tariffs, None, &Period::month(2024, 5).unwrap()).is_none());
    }
}
