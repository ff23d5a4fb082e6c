//! Column decoding helpers shared by the row wrappers.

use std::str::FromStr;

use sunshare_domain::time::Timestamp;

/// Parse a text column through [`FromStr`], surfacing failures as decode errors.
pub(crate) fn parse<T>(value: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    T::from_str(value).map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

/// Parse a stored RFC 3339 timestamp.
pub(crate) fn timestamp(value: &str) -> Result<Timestamp, sqlx::Error> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.to_utc())
        .map_err(|err| sqlx::Error::Decode(Box::new(err)))
}
