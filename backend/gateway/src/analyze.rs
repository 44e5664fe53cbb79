//! `POST /analyze-document`

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{info, warn};

use fraudscreen_core::encode::DEFAULT_IMAGE_MIME;
use fraudscreen_core::{AnalysisResult, EncodedPayload};

use crate::error::ApiError;
use crate::server::GatewayState;

/// Request body. Both fields are optional on the wire so that a missing image
/// gets the documented 400 instead of a deserialization error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl AnalyzeRequest {
    fn into_payload(self) -> Result<EncodedPayload, ApiError> {
        let image = self
            .image_base64
            .filter(|s| !s.is_empty())
            .ok_or(ApiError::MissingImage)?;
        let mime = self
            .mime_type
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string());
        Ok(EncodedPayload::new(image, mime))
    }
}

pub async fn analyze_document(
    State(state): State<GatewayState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let body = body.map_err(body_rejection)?;
    let request: AnalyzeRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    let payload = request.into_payload()?;

    info!(mime_type = %payload.mime_type, payload_bytes = payload.image_base64.len(), "Analyze request");
    let result = state.service.analyze(payload).await?;
    Ok(Json(result))
}

fn body_rejection(rejection: BytesRejection) -> ApiError {
    warn!(status = %rejection.status(), reason = %rejection.body_text(), "Request body rejected");
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::InvalidBody(rejection.body_text())
    }
}

/// Unknown paths.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Known paths hit with an unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
