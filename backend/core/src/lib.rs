//! `fraudscreen-core`: data model and pure pipeline stages for document fraud screening.
//!
//! Provides:
//! - The validated [`AnalysisResult`] shape and the error taxonomy
//! - Document encoding for transport
//! - Reply sanitization and schema validation
//! - Risk tiering and per-factor severity

pub mod document;
pub mod encode;
pub mod error;
pub mod risk;
pub mod sanitize;
pub mod traits;
pub mod types;
pub mod validation;

pub use document::{detect_mime_type, is_accepted_mime, DocumentSource, UploadedDocument};
pub use encode::{encode, EncodedPayload};
pub use error::AnalysisError;
pub use risk::{classify, FactorSeverity, RatedFactor, RiskReport, RiskTier};
pub use sanitize::sanitize;
pub use traits::{VisionModel, VisionReply, VisionRequest};
pub use types::{AnalysisResult, DocumentDates, ErrorEnvelope, ExtractedFields};
pub use validation::{parse_analysis, validate, SchemaError};
