//! Structured logging for FraudScreen.
//!
//! Handles subscriber setup with optional NDJSON file rotation, redaction of
//! secrets and document payloads, and analysis lifecycle events.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{AnalysisEvent, EventLogEntry, EventLogger};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
