//! `SQLite` implementation of [`UnitRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sunshare_app::ports::UnitRepository;
use sunshare_domain::error::SunshareError;
use sunshare_domain::id::NetworkId;
use sunshare_domain::unit::Unit;

use crate::decode;
use crate::error::StorageError;

/// Converts database rows into domain units.
struct Wrapper(Unit);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let network_id: String = row.try_get("network_id")?;
        let name: String = row.try_get("name")?;
        let kind: String = row.try_get("kind")?;

        Ok(Self(Unit {
            id: decode::parse(&id)?,
            name,
            kind: decode::parse(&kind)?,
            network_id: decode::parse(&network_id)?,
        }))
    }
}

const INSERT: &str = "INSERT INTO units (id, network_id, name, kind) VALUES (?, ?, ?, ?)";

const SELECT_BY_NETWORK: &str = "SELECT * FROM units WHERE network_id = ? ORDER BY name, id";

/// `SQLite`-backed unit repository.
pub struct SqliteUnitRepository {
    pool: SqlitePool,
}

impl SqliteUnitRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl UnitRepository for SqliteUnitRepository {
    async fn create(&self, unit: Unit) -> Result<Unit, SunshareError> {
        unit.validate()?;

        sqlx::query(INSERT)
            .bind(unit.id.to_string())
            .bind(unit.network_id.to_string())
            .bind(&unit.name)
            .bind(unit.kind.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(unit)
    }

    async fn find_by_network(&self, network_id: NetworkId) -> Result<Vec<Unit>, SunshareError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_NETWORK)
            .bind(network_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
