//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use sunshare_domain::error::{SettlementError, SunshareError};

use crate::export::ExportError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`SunshareError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub enum ApiError {
    /// A failure reported by the settlement engine or its ports.
    Domain(SunshareError),
    /// The balance was computed but could not be rendered.
    Export(ExportError),
}

impl From<SunshareError> for ApiError {
    fn from(err: SunshareError) -> Self {
        Self::Domain(err)
    }
}

impl From<SettlementError> for ApiError {
    fn from(err: SettlementError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        Self::Export(err)
    }
}

fn internal() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal server error".to_string(),
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Domain(SunshareError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Domain(SunshareError::Settlement(err)) => match err {
                SettlementError::InvalidPeriod { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
                SettlementError::RateUnavailable { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
                }
                SettlementError::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, err.to_string()),
            },
            Self::Domain(SunshareError::Storage(err)) => {
                tracing::error!(error = %err, "storage error");
                internal()
            }
            Self::Export(err) => {
                tracing::error!(error = %err, "export error");
                internal()
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use sunshare_domain::error::ValidationError;

    use super::*;

    fn status_of(err: impl Into<ApiError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn should_map_errors_to_status_codes() {
        assert_eq!(
            status_of(SunshareError::from(ValidationError::EmptyName)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(SettlementError::InvalidPeriod {
                reason: "end before start".to_string()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(SettlementError::RateUnavailable { unit_id: None }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(SettlementError::Timeout {
                after: std::time::Duration::from_secs(30)
            }),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_of(SunshareError::Storage("disk on fire".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
