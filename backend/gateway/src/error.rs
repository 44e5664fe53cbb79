//! HTTP error type for the analysis endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use fraudscreen_core::error::{NO_IMAGE_MESSAGE, PARSE_FAILED_MESSAGE};
use fraudscreen_core::{AnalysisError, ErrorEnvelope};

pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Document too large";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", NO_IMAGE_MESSAGE)]
    MissingImage,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("{}", PAYLOAD_TOO_LARGE_MESSAGE)]
    PayloadTooLarge,

    #[error("Not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingImage | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Analysis(AnalysisError::RateLimited(_)) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Analysis(AnalysisError::QuotaExhausted(_)) => StatusCode::PAYMENT_REQUIRED,
            ApiError::Analysis(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Schema failures share the parse-failure message on the wire; the
    /// offending path is only logged.
    pub fn envelope(&self) -> ErrorEnvelope {
        let (error, raw_response) = match self {
            ApiError::Analysis(AnalysisError::Parse { message, raw }) => {
                (message.clone(), Some(raw.clone()))
            }
            ApiError::Analysis(AnalysisError::Schema { raw, .. }) => {
                (PARSE_FAILED_MESSAGE.to_string(), Some(raw.clone()))
            }
            other => (other.to_string(), None),
        };
        ErrorEnvelope { error, raw_response }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, error = %self, "Analysis request failed");
        }
        (status, Json(self.envelope())).into_response()
    }
}
