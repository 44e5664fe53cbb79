//! Analysis Event Logger
//!
//! Lifecycle events of one analysis request, serialized under the
//! `analysis_events` target so they land in the NDJSON log as one line each.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum AnalysisEvent {
    Requested {
        mime_type: String,
        payload_bytes: usize,
    },
    Completed {
        document_type: String,
        fraud_probability: String,
        risk_factor_count: usize,
        latency_ms: u64,
    },
    Failed {
        kind: String,
        error_msg: String,
        raw_response: Option<String>,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub request_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: AnalysisEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Redacts free-text fields, then emits the event through `tracing`.
    pub fn log_event(request_id: Uuid, event: AnalysisEvent) -> EventLogEntry {
        let entry = EventLogEntry {
            request_id,
            timestamp: Utc::now(),
            event: redact_event(event),
        };

        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "analysis_events", event = %json, "Analysis event");
        entry
    }
}

fn redact_event(mut event: AnalysisEvent) -> AnalysisEvent {
    if let AnalysisEvent::Failed {
        error_msg,
        raw_response,
        ..
    } = &mut event
    {
        *error_msg = redact_sensitive_data(error_msg);
        if let Some(raw) = raw_response {
            *raw = redact_sensitive_data(raw);
        }
    }
    event
}
