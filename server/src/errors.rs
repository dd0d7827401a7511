use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::github::ReleaseSourceError;
use crate::metrics_defs::REQUEST_FAILURES;
use crate::store::StoreError;

/// Result type alias for request handling
pub type Result<T, E = ApiError> = std::result::Result<T, E>;

/// Outcome of an internal request step, mapped to an HTTP status only at
/// the response boundary.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("missing or empty required parameter: {0}")]
    Validation(&'static str),

    #[error("release source error: {0}")]
    Upstream(#[from] ReleaseSourceError),

    #[error("ping store error: {0}")]
    Persistence(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(param) => {
                tracing::debug!(param, "rejecting request with missing parameter");
                StatusCode::FORBIDDEN.into_response()
            }
            ApiError::Upstream(_) | ApiError::Persistence(_) => {
                // Full detail stays in the server log; callers only ever
                // see the fixed body.
                tracing::error!(error = %self, "request failed");
                metrics::counter!(REQUEST_FAILURES.name).increment(1);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}
