//! Billing period: the closed time interval a settlement covers.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::SettlementError;
use crate::time::Timestamp;

/// A closed interval `[start, end]` of UTC time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    start: Timestamp,
    end: Timestamp,
}

impl Period {
    /// Build a period from explicit bounds.
    ///
    /// # Errors
    ///
    /// Returns [`SettlementError::InvalidPeriod`] when `end` is before `start`.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, SettlementError> {
        if end < start {
            return Err(SettlementError::InvalidPeriod {
                reason: format!("end {end} is before start {start}"),
            });
        }
        Ok(Self { start, end })
    }

    /// The calendar month `month` of `year`, in UTC.
    ///
    /// The period ends one microsecond before the first instant of the
    /// following month, matching the precision readings are stored with.
    ///
    /// # Errors
    ///
    /// Returns [`SettlementError::InvalidPeriod`] when `month` is not in `1..=12`
    /// or the year is out of the supported calendar range.
    pub fn month(year: i32, month: u32) -> Result<Self, SettlementError> {
        let invalid = || SettlementError::InvalidPeriod {
            reason: format!("{year}-{month:02} is not a valid month"),
        };

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid)?;

        let start = first.and_hms_opt(0, 0, 0).ok_or_else(invalid)?.and_utc();
        let end = next.and_hms_opt(0, 0, 0).ok_or_else(invalid)?.and_utc()
            - Duration::microseconds(1);

        Self::new(start, end)
    }

    #[must_use]
    pub fn start(&self) -> Timestamp {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Timestamp {
        self.end
    }

    /// Whether `ts` falls within the closed interval.
    #[must_use]
    pub fn contains(&self, ts: Timestamp) -> bool {
        self.start <= ts && ts <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn should_reject_end_before_start() {
        let start = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            Period::new(start, end),
            Err(SettlementError::InvalidPeriod { .. })
        ));
    }

    #[test]
    fn should_accept_zero_length_period() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let period = Period::new(ts, ts).unwrap();
        assert!(period.contains(ts));
    }

    #[test]
    fn should_cover_whole_calendar_month() {
        let period = Period::month(2024, 2).unwrap();
        assert_eq!(
            period.start(),
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
        );
        assert!(period.contains(Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap()));
        assert!(!period.contains(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn should_roll_december_into_next_year() {
        let period = Period::month(2023, 12).unwrap();
        assert!(period.contains(Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap()));
        assert!(!period.contains(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn should_reject_month_thirteen() {
        assert!(matches!(
            Period::month(2024, 13),
            Err(SettlementError::InvalidPeriod { .. })
        ));
    }

    #[test]
    fn should_reject_month_zero() {
        assert!(Period::month(2024, 0).is_err());
    }
}
