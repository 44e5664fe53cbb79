use async_trait::async_trait;

use crate::encode::EncodedPayload;
use crate::error::AnalysisError;

/// Trait for hosted multimodal models used by the analysis service.
///
/// Implementations perform exactly one upstream call per `complete` and map
/// HTTP failures onto [`AnalysisError`] (429, 402, anything else).
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Provider name (e.g., "openai-compat").
    fn name(&self) -> &str;

    async fn complete(&self, request: &VisionRequest) -> Result<VisionReply, AnalysisError>;
}

/// One prompt plus one inline document image.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub image: EncodedPayload,
    pub max_tokens: u32,
}

/// Textual answer from the model.
#[derive(Debug, Clone)]
pub struct VisionReply {
    pub content: String,
    pub model: String,
    pub latency_ms: u64,
}
