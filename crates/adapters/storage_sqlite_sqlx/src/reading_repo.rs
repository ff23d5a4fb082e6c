//! `SQLite` implementation of [`ReadingRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sunshare_app::ports::ReadingRepository;
use sunshare_domain::error::SunshareError;
use sunshare_domain::id::UnitId;
use sunshare_domain::reading::Reading;
use sunshare_domain::time::{Timestamp, to_sortable_rfc3339};

use crate::decode;
use crate::error::StorageError;

/// Converts database rows into domain readings.
struct Wrapper(Reading);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let unit_id: String = row.try_get("unit_id")?;
        let value_kwh: f64 = row.try_get("value_kwh")?;
        let recorded_at: String = row.try_get("recorded_at")?;

        Ok(Self(Reading {
            id: decode::parse(&id)?,
            unit_id: decode::parse(&unit_id)?,
            value_kwh,
            recorded_at: decode::timestamp(&recorded_at)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO readings (id, unit_id, value_kwh, recorded_at)
    VALUES (?, ?, ?, ?)
";

// recorded_at is fixed-width, so text comparison is chronological
const SELECT_BY_UNIT_IN_RANGE: &str = r"
    SELECT * FROM readings
    WHERE unit_id = ? AND recorded_at >= ? AND recorded_at <= ?
    ORDER BY recorded_at, id
";

/// `SQLite`-backed reading store.
pub struct SqliteReadingRepository {
    pool: SqlitePool,
}

impl SqliteReadingRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ReadingRepository for SqliteReadingRepository {
    async fn record(&self, reading: Reading) -> Result<Reading, SunshareError> {
        reading.validate()?;

        sqlx::query(INSERT)
            .bind(reading.id.to_string())
            .bind(reading.unit_id.to_string())
            .bind(reading.value_kwh)
            .bind(to_sortable_rfc3339(reading.recorded_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(reading)
    }

    async fn find_by_unit_in_range(
        &self,
        unit_id: UnitId,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Reading>, SunshareError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_UNIT_IN_RANGE)
            .bind(unit_id.to_string())
            .bind(to_sortable_rfc3339(from))
            .bind(to_sortable_rfc3339(to))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
