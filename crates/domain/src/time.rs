//! Time and timestamp helpers.

use chrono::{DateTime, SecondsFormat, Utc};

/// UTC timestamp used for reading times and tariff effective dates.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Format a timestamp as fixed-width RFC 3339 (microsecond precision, `Z` suffix).
///
/// Fixed width keeps lexicographic order equal to chronological order, which
/// storage adapters rely on for range queries over text columns.
#[must_use]
pub fn to_sortable_rfc3339(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
