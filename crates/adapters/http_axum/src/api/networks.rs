//! Network balance handlers.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use sunshare_app::ports::{ReadingRepository, TariffRepository, UnitRepository};
use sunshare_domain::error::{SettlementError, SunshareError, ValidationError};
use sunshare_domain::id::NetworkId;
use sunshare_domain::period::Period;
use sunshare_domain::settlement::SettlementResult;
use sunshare_domain::time::Timestamp;

use crate::error::ApiError;
use crate::export;
use crate::state::AppState;

/// Period selection for a balance query.
///
/// Either `year` and `month` (a calendar month in UTC), or `from` and `to`
/// (RFC 3339, inclusive).
#[derive(Debug, Default, Deserialize)]
pub struct BalanceQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl BalanceQuery {
    /// Resolve the requested settlement period.
    pub fn period(&self) -> Result<Period, ApiError> {
        match (self.year, self.month, self.from.as_deref(), self.to.as_deref()) {
            (Some(year), Some(month), None, None) => Ok(Period::month(year, month)?),
            (None, None, Some(from), Some(to)) => {
                Ok(Period::new(parse_timestamp(from)?, parse_timestamp(to)?)?)
            }
            _ => Err(SettlementError::InvalidPeriod {
                reason: "expected either year and month, or from and to".to_string(),
            }
            .into()),
        }
    }
}

fn parse_timestamp(value: &str) -> Result<Timestamp, ApiError> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.to_utc())
        .map_err(|_| {
            ApiError::from(SunshareError::Validation(ValidationError::InvalidTimestamp(
                value.to_owned(),
            )))
        })
}

fn parse_network_id(value: &str) -> Result<NetworkId, ApiError> {
    NetworkId::from_str(value).map_err(|err| SunshareError::from(err).into())
}

async fn settle<UR, RR, TR>(
    state: &AppState<UR, RR, TR>,
    id: &str,
    params: &BalanceQuery,
) -> Result<SettlementResult, ApiError>
where
    UR: UnitRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    TR: TariffRepository + Send + Sync + 'static,
{
    let network_id = parse_network_id(id)?;
    let period = params.period()?;
    let result = state.settlement_service.settle(network_id, period).await?;
    tracing::debug!(
        %network_id,
        units = result.units.len(),
        degraded = result.degraded_units.len(),
        "settled network"
    );
    Ok(result)
}

/// `GET /api/networks/{id}/balance?year=&month=` or `?from=&to=`
pub async fn balance<UR, RR, TR>(
    State(state): State<AppState<UR, RR, TR>>,
    Path(id): Path<String>,
    Query(params): Query<BalanceQuery>,
) -> Result<Json<SettlementResult>, ApiError>
where
    UR: UnitRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    TR: TariffRepository + Send + Sync + 'static,
{
    Ok(Json(settle(&state, &id, &params).await?))
}

/// `GET /api/networks/{id}/balance/csv?year=&month=` or `?from=&to=`
pub async fn balance_csv<UR, RR, TR>(
    State(state): State<AppState<UR, RR, TR>>,
    Path(id): Path<String>,
    Query(params): Query<BalanceQuery>,
) -> Result<Response, ApiError>
where
    UR: UnitRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    TR: TariffRepository + Send + Sync + 'static,
{
    let result = settle(&state, &id, &params).await?;
    let body = export::to_csv_string(&result)?;
    let filename = format!(
        "attachment; filename=\"balance-{}-{}.csv\"",
        result.network_id,
        result.period.start().format("%Y-%m")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, filename),
        ],
        body,
    )
        .into_response())
}
