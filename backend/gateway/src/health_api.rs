//! Service health API
//!
//! Reports liveness and whether a model key is configured. Never calls the model.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::prompt::PROMPT_VERSION;
use crate::server::GatewayState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub model_configured: bool,
    pub prompt_version: &'static str,
}

/// Handler for `GET /api/health`
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        service: "fraudscreen",
        version: env!("CARGO_PKG_VERSION"),
        model_configured: state.service.is_configured(),
        prompt_version: PROMPT_VERSION,
    })
}
