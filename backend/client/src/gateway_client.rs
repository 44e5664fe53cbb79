//! HTTP client for the remote analysis function.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use fraudscreen_config::ClientConfig;
use fraudscreen_core::{parse_analysis, AnalysisError, AnalysisResult, EncodedPayload, ErrorEnvelope};

/// One analysis round trip. Implementations never retry.
#[async_trait]
pub trait AnalysisGateway: Send + Sync {
    async fn submit(&self, payload: &EncodedPayload) -> Result<AnalysisResult, AnalysisError>;
}

pub struct AnalysisGatewayClient {
    client: Client,
    endpoint: String,
    access_key: Option<String>,
}

impl AnalysisGatewayClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            access_key: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            access_key: config.access_key.clone().filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn with_access_key(mut self, key: impl Into<String>) -> Self {
        self.access_key = Some(key.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisGateway for AnalysisGatewayClient {
    async fn submit(&self, payload: &EncodedPayload) -> Result<AnalysisResult, AnalysisError> {
        let mut request = self.client.post(&self.endpoint).json(payload);
        if let Some(key) = &self.access_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        debug!(endpoint = %self.endpoint, mime_type = %payload.mime_type, "Submitting document");
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Analysis request did not reach the service");
            AnalysisError::Transport(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(map_error_status(status, &body));
        }

        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&body) {
            if let Some(message) = map.get("error").and_then(Value::as_str) {
                return Err(AnalysisError::Service(message.to_string()));
            }
        }

        parse_analysis(&body)
    }
}

fn map_error_status(status: StatusCode, body: &str) -> AnalysisError {
    let envelope = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope,
        Err(_) => {
            warn!(status = %status, "Analysis service returned a non-JSON error body");
            return AnalysisError::Service(format!("Analysis failed (HTTP {})", status.as_u16()));
        }
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => AnalysisError::RateLimited(envelope.error),
        StatusCode::PAYMENT_REQUIRED => AnalysisError::QuotaExhausted(envelope.error),
        _ => match envelope.raw_response {
            Some(raw) => AnalysisError::Parse {
                message: envelope.error,
                raw,
            },
            None => AnalysisError::Service(envelope.error),
        },
    }
}
