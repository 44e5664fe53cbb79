//! Analysis service: one encoded document in, one validated result out.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use fraudscreen_config::ModelConfig;
use fraudscreen_core::{parse_analysis, AnalysisError, AnalysisResult, EncodedPayload, VisionModel};
use fraudscreen_logging::{redact_sensitive_data, AnalysisEvent, EventLogger};

use crate::model::OpenAiCompatModel;
use crate::prompt::build_request;

pub struct AnalysisService {
    model: Option<Arc<dyn VisionModel>>,
    max_tokens: u32,
}

impl AnalysisService {
    pub fn new(model: Option<Arc<dyn VisionModel>>, max_tokens: u32) -> Self {
        Self { model, max_tokens }
    }

    /// Builds the OpenAI-compatible model when an API key is configured.
    pub fn from_config(config: &ModelConfig) -> Self {
        let model = config.api_key.as_deref().filter(|k| !k.trim().is_empty()).map(|key| {
            Arc::new(OpenAiCompatModel::new(key, &config.model).with_base_url(&config.base_url))
                as Arc<dyn VisionModel>
        });
        if model.is_none() {
            warn!("No model API key configured; analysis requests will fail");
        }
        Self::new(model, config.max_tokens)
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    /// Exactly one upstream call per invocation; no retries.
    pub async fn analyze(&self, image: EncodedPayload) -> Result<AnalysisResult, AnalysisError> {
        let model = self.model.as_ref().ok_or(AnalysisError::NotConfigured)?;
        let request_id = Uuid::new_v4();

        EventLogger::log_event(
            request_id,
            AnalysisEvent::Requested {
                mime_type: image.mime_type.clone(),
                payload_bytes: image.image_base64.len(),
            },
        );

        let outcome = self.run(model.as_ref(), image).await;
        match &outcome {
            Ok((result, latency_ms)) => {
                info!(%request_id, document_type = %result.document_type, "Analysis complete");
                EventLogger::log_event(
                    request_id,
                    AnalysisEvent::Completed {
                        document_type: result.document_type.clone(),
                        fraud_probability: result.fraud_probability.clone(),
                        risk_factor_count: result.risk_factors.len(),
                        latency_ms: *latency_ms,
                    },
                );
            }
            Err(e) => {
                EventLogger::log_event(
                    request_id,
                    AnalysisEvent::Failed {
                        kind: e.kind().to_string(),
                        error_msg: e.to_string(),
                        raw_response: e.raw_response().map(str::to_string),
                    },
                );
            }
        }
        outcome.map(|(result, _)| result)
    }

    async fn run(
        &self,
        model: &dyn VisionModel,
        image: EncodedPayload,
    ) -> Result<(AnalysisResult, u64), AnalysisError> {
        let request = build_request(image, self.max_tokens);
        let reply = model.complete(&request).await?;
        debug!(
            provider = model.name(),
            reply = %redact_sensitive_data(&reply.content),
            "Raw model reply"
        );
        let result = parse_analysis(&reply.content)?;
        Ok((result, reply.latency_ms))
    }
}
