//! `SQLite` implementation of [`TariffRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sunshare_app::ports::TariffRepository;
use sunshare_domain::error::SunshareError;
use sunshare_domain::id::NetworkId;
use sunshare_domain::tariff::Tariff;
use sunshare_domain::time::to_sortable_rfc3339;

use crate::decode;
use crate::error::StorageError;

/// Converts database rows into domain tariffs.
struct Wrapper(Tariff);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let network_id: String = row.try_get("network_id")?;
        let unit_id: Option<String> = row.try_get("unit_id")?;
        let rate_per_kwh: f64 = row.try_get("rate_per_kwh")?;
        let start_at: String = row.try_get("start_at")?;
        let end_at: Option<String> = row.try_get("end_at")?;

        Ok(Self(Tariff {
            id: decode::parse(&id)?,
            network_id: decode::parse(&network_id)?,
            unit_id: unit_id.as_deref().map(decode::parse).transpose()?,
            rate_per_kwh,
            start: decode::timestamp(&start_at)?,
            end: end_at.as_deref().map(decode::timestamp).transpose()?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO tariffs (id, network_id, unit_id, rate_per_kwh, start_at, end_at)
    VALUES (?, ?, ?, ?, ?, ?)
";

const SELECT_BY_NETWORK: &str =
    "SELECT * FROM tariffs WHERE network_id = ? ORDER BY start_at, id";

/// `SQLite`-backed tariff history.
pub struct SqliteTariffRepository {
    pool: SqlitePool,
}

impl SqliteTariffRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl TariffRepository for SqliteTariffRepository {
    async fn create(&self, tariff: Tariff) -> Result<Tariff, SunshareError> {
        tariff.validate()?;

        sqlx::query(INSERT)
            .bind(tariff.id.to_string())
            .bind(tariff.network_id.to_string())
            .bind(tariff.unit_id.map(|id| id.to_string()))
            .bind(tariff.rate_per_kwh)
            .bind(to_sortable_rfc3339(tariff.start))
            .bind(tariff.end.map(to_sortable_rfc3339))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(tariff)
    }

    async fn find_by_network(&self, network_id: NetworkId) -> Result<Vec<Tariff>, SunshareError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_NETWORK)
            .bind(network_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
