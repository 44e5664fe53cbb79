//! OpenAI-compatible chat-completions client for vision models.
//!
//! The document travels inline as a `data:` URL in an `image_url` content part.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use fraudscreen_core::error::{EMPTY_REPLY_MESSAGE, UPSTREAM_FAILED_MESSAGE};
use fraudscreen_core::{AnalysisError, VisionModel, VisionReply, VisionRequest};
use fraudscreen_logging::redact_sensitive_data;

pub struct OpenAiCompatModel {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiCompatModel {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://ai.gateway.lovable.dev/v1".to_string(),
            model: model.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: MessageContent<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl VisionModel for OpenAiCompatModel {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn complete(&self, request: &VisionRequest) -> Result<VisionReply, AnalysisError> {
        let start = Instant::now();

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(&request.system_prompt),
                },
                ChatMessage {
                    role: "user",
                    content: MessageContent::Parts(vec![
                        ContentPart::Text {
                            text: &request.user_prompt,
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl {
                                url: request.image.data_url(),
                            },
                        },
                    ]),
                },
            ],
            max_tokens: request.max_tokens,
        };

        info!(model = %self.model, mime_type = %request.image.mime_type, "Analyzing document with vision model");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Vision model request failed");
                AnalysisError::Upstream(UPSTREAM_FAILED_MESSAGE.to_string())
            })?;

        let status = response.status();
        match status {
            StatusCode::TOO_MANY_REQUESTS => return Err(AnalysisError::rate_limited()),
            StatusCode::PAYMENT_REQUIRED => return Err(AnalysisError::quota_exhausted()),
            s if !s.is_success() => {
                let error_body = response.text().await.unwrap_or_default();
                error!(
                    status = %status,
                    body = %redact_sensitive_data(&error_body),
                    "AI gateway error"
                );
                return Err(AnalysisError::Upstream(UPSTREAM_FAILED_MESSAGE.to_string()));
            }
            _ => {}
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to decode vision model response");
            AnalysisError::Upstream(UPSTREAM_FAILED_MESSAGE.to_string())
        })?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| AnalysisError::Upstream(EMPTY_REPLY_MESSAGE.to_string()))?;

        let latency_ms = start.elapsed().as_millis() as u64;
        debug!(latency_ms, reply_chars = content.len(), "Vision model replied");

        Ok(VisionReply {
            content,
            model: self.model.clone(),
            latency_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::routing::post;
    use axum::{Json, Router};
    use fraudscreen_core::EncodedPayload;
    use serde_json::{json, Value};
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    #[derive(Clone)]
    struct Upstream {
        status: AxumStatus,
        reply: Value,
        seen: Arc<Mutex<Option<(Value, Option<String>)>>>,
    }

    async fn completions(
        State(upstream): State<Upstream>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (AxumStatus, Json<Value>) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        *upstream.seen.lock().unwrap() = Some((body, auth));
        (upstream.status, Json(upstream.reply.clone()))
    }

    async fn spawn_upstream(upstream: Upstream) -> SocketAddr {
        let app = Router::new()
            .route("/v1/chat/completions", post(completions))
            .with_state(upstream);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        addr
    }

    fn upstream(status: AxumStatus, reply: Value) -> Upstream {
        Upstream {
            status,
            reply,
            seen: Arc::new(Mutex::new(None)),
        }
    }

    fn request() -> VisionRequest {
        crate::prompt::build_request(EncodedPayload::new("QUJD", "image/png"), 4096)
    }

    fn model_for(addr: SocketAddr) -> OpenAiCompatModel {
        OpenAiCompatModel::new("test-key", "google/gemini-2.5-pro")
            .with_base_url(format!("http://{addr}/v1/"))
    }

    #[tokio::test]
    async fn sends_inline_image_and_returns_content() {
        let up = upstream(
            AxumStatus::OK,
            json!({ "choices": [{ "message": { "role": "assistant", "content": "{\"a\":1}" } }] }),
        );
        let seen = up.seen.clone();
        let addr = spawn_upstream(up).await;

        let reply = model_for(addr).complete(&request()).await.unwrap();
        assert_eq!(reply.content, "{\"a\":1}");
        assert_eq!(reply.model, "google/gemini-2.5-pro");

        let (body, auth) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(auth.as_deref(), Some("Bearer test-key"));
        assert_eq!(body["model"], "google/gemini-2.5-pro");
        assert_eq!(body["max_tokens"], 4096);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"][0]["type"], "text");
        assert_eq!(body["messages"][1]["content"][1]["type"], "image_url");
        assert_eq!(
            body["messages"][1]["content"][1]["image_url"]["url"],
            "data:image/png;base64,QUJD"
        );
    }

    #[tokio::test]
    async fn maps_429_to_rate_limited() {
        let addr = spawn_upstream(upstream(AxumStatus::TOO_MANY_REQUESTS, json!({}))).await;
        let err = model_for(addr).complete(&request()).await.unwrap_err();
        assert_eq!(err, AnalysisError::rate_limited());
    }

    #[tokio::test]
    async fn maps_402_to_quota_exhausted() {
        let addr = spawn_upstream(upstream(AxumStatus::PAYMENT_REQUIRED, json!({}))).await;
        let err = model_for(addr).complete(&request()).await.unwrap_err();
        assert_eq!(err, AnalysisError::quota_exhausted());
    }

    #[tokio::test]
    async fn maps_other_status_to_upstream() {
        let addr = spawn_upstream(upstream(
            AxumStatus::SERVICE_UNAVAILABLE,
            json!({ "error": "overloaded" }),
        ))
        .await;
        let err = model_for(addr).complete(&request()).await.unwrap_err();
        assert_eq!(err, AnalysisError::Upstream(UPSTREAM_FAILED_MESSAGE.into()));
    }

    #[tokio::test]
    async fn missing_content_is_empty_reply() {
        let addr = spawn_upstream(upstream(AxumStatus::OK, json!({ "choices": [] }))).await;
        let err = model_for(addr).complete(&request()).await.unwrap_err();
        assert_eq!(err, AnalysisError::Upstream(EMPTY_REPLY_MESSAGE.into()));
    }

    #[tokio::test]
    async fn unreachable_upstream_is_upstream_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let err = model_for(addr).complete(&request()).await.unwrap_err();
        assert_eq!(err.kind(), "upstream");
    }
}
