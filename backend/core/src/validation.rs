//! Shape validation for parsed model replies.
//!
//! `document_type`, `fraud_probability`, `confidence` and `risk_factors` are
//! mandatory. Every other string defaults to empty and every boolean to
//! `false` when absent or `null`; a value of the wrong type is rejected.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::{AnalysisError, PARSE_FAILED_MESSAGE};
use crate::sanitize::sanitize;
use crate::types::{AnalysisResult, DocumentDates, ExtractedFields};

/// A shape violation at a JSON path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{path}': {message}")]
pub struct SchemaError {
    pub path: String,
    pub message: String,
}

impl SchemaError {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Validate a parsed reply and build the typed result.
pub fn validate(value: &Value) -> Result<AnalysisResult, SchemaError> {
    let root = value
        .as_object()
        .ok_or_else(|| SchemaError::new("$", "expected a JSON object"))?;

    let extracted_fields = match root.get("extracted_fields") {
        None | Some(Value::Null) => ExtractedFields::default(),
        Some(Value::Object(fields)) => validate_fields(fields)?,
        Some(_) => return Err(SchemaError::new("extracted_fields", "expected an object")),
    };

    Ok(AnalysisResult {
        document_type: required_string(root, "document_type")?,
        fraud_probability: required_string(root, "fraud_probability")?,
        confidence: required_string(root, "confidence")?,
        risk_factors: risk_factors(root)?,
        extracted_fields,
    })
}

/// Sanitize, parse and validate a raw model reply.
///
/// Both failure kinds keep the unsanitized text for diagnostics.
pub fn parse_analysis(raw: &str) -> Result<AnalysisResult, AnalysisError> {
    let value: Value = serde_json::from_str(sanitize(raw)).map_err(|e| {
        tracing::debug!(error = %e, "Reply is not valid JSON");
        AnalysisError::Parse {
            message: PARSE_FAILED_MESSAGE.to_string(),
            raw: raw.to_string(),
        }
    })?;
    validate(&value).map_err(|e| AnalysisError::Schema {
        message: format!("Analysis result has an unexpected shape at {e}"),
        raw: raw.to_string(),
    })
}

fn validate_fields(fields: &Map<String, Value>) -> Result<ExtractedFields, SchemaError> {
    let dates = match fields.get("dates") {
        None | Some(Value::Null) => DocumentDates::default(),
        Some(Value::Object(dates)) => DocumentDates {
            issue_date: optional_string(dates, "extracted_fields.dates", "issue_date")?,
            event_date: optional_string(dates, "extracted_fields.dates", "event_date")?,
            due_date: optional_string(dates, "extracted_fields.dates", "due_date")?,
        },
        Some(_) => {
            return Err(SchemaError::new("extracted_fields.dates", "expected an object"));
        }
    };

    let path = "extracted_fields";
    Ok(ExtractedFields {
        name: optional_string(fields, path, "name")?,
        issuer: optional_string(fields, path, "issuer")?,
        institution: optional_string(fields, path, "institution")?,
        dates,
        amount: optional_string(fields, path, "amount")?,
        currency: optional_string(fields, path, "currency")?,
        has_signature: optional_bool(fields, path, "has_signature")?,
        has_stamp: optional_bool(fields, path, "has_stamp")?,
        has_watermark: optional_bool(fields, path, "has_watermark")?,
    })
}

fn required_string(obj: &Map<String, Value>, key: &str) -> Result<String, SchemaError> {
    match obj.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(SchemaError::new(key, "expected a string")),
        None => Err(SchemaError::new(key, "missing required field")),
    }
}

fn risk_factors(obj: &Map<String, Value>) -> Result<Vec<String>, SchemaError> {
    let items = match obj.get("risk_factors") {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(SchemaError::new("risk_factors", "expected an array")),
        None => return Err(SchemaError::new("risk_factors", "missing required field")),
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| SchemaError::new(format!("risk_factors[{i}]"), "expected a string"))
        })
        .collect()
}

fn optional_string(
    obj: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<String, SchemaError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(SchemaError::new(format!("{path}.{key}"), "expected a string")),
    }
}

fn optional_bool(obj: &Map<String, Value>, path: &str, key: &str) -> Result<bool, SchemaError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(SchemaError::new(format!("{path}.{key}"), "expected a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> AnalysisResult {
        AnalysisResult {
            document_type: "hospital bill".into(),
            fraud_probability: "72%".into(),
            confidence: "0.81".into(),
            risk_factors: vec![
                "Amount font differs from surrounding text".into(),
                "Issue date after treatment date".into(),
            ],
            extracted_fields: ExtractedFields {
                name: "A. Patient".into(),
                issuer: "City Hospital".into(),
                institution: "City Hospital".into(),
                dates: DocumentDates {
                    issue_date: "2024-03-02".into(),
                    event_date: "2024-03-05".into(),
                    due_date: String::new(),
                },
                amount: "18500".into(),
                currency: "INR".into(),
                has_signature: true,
                has_stamp: false,
                has_watermark: false,
            },
        }
    }

    #[test]
    fn round_trips_through_serialize_sanitize_validate() {
        let original = sample();
        let raw = format!("```json\n{}\n```", serde_json::to_string_pretty(&original).unwrap());
        assert_eq!(parse_analysis(&raw).unwrap(), original);
    }

    #[test]
    fn fenced_invoice_reply_is_accepted() {
        let raw = "```json\n{\"document_type\":\"invoice\",\"fraud_probability\":\"15%\",\"confidence\":\"0.9\",\"risk_factors\":[]}\n```";
        let result = parse_analysis(raw).unwrap();
        assert_eq!(result.document_type, "invoice");
        assert!(result.risk_factors.is_empty());
        assert_eq!(result.extracted_fields, ExtractedFields::default());
    }

    #[test]
    fn missing_optional_fields_default_to_empty() {
        let value = json!({
            "document_type": "receipt",
            "fraud_probability": "5%",
            "confidence": "0.7",
            "risk_factors": [],
            "extracted_fields": { "name": "Jo", "dates": { "issue_date": null }, "amount": null }
        });
        let result = validate(&value).unwrap();
        assert_eq!(result.extracted_fields.name, "Jo");
        assert_eq!(result.extracted_fields.dates.issue_date, "");
        assert_eq!(result.extracted_fields.amount, "");
        assert!(!result.extracted_fields.has_signature);
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let value = json!({ "document_type": "id", "confidence": "0.5", "risk_factors": [] });
        let err = validate(&value).unwrap_err();
        assert_eq!(err.path, "fraud_probability");
    }

    #[test]
    fn risk_factors_must_be_strings() {
        let value = json!({
            "document_type": "id",
            "fraud_probability": "40%",
            "confidence": "0.5",
            "risk_factors": ["ok", 3]
        });
        assert_eq!(validate(&value).unwrap_err().path, "risk_factors[1]");
    }

    #[test]
    fn truthy_string_is_not_a_boolean() {
        let value = json!({
            "document_type": "id",
            "fraud_probability": "40%",
            "confidence": "0.5",
            "risk_factors": [],
            "extracted_fields": { "has_stamp": "true" }
        });
        let err = validate(&value).unwrap_err();
        assert_eq!(err.path, "extracted_fields.has_stamp");
        assert_eq!(err.message, "expected a boolean");
    }

    #[test]
    fn numeric_probability_is_rejected() {
        let value = json!({
            "document_type": "id",
            "fraud_probability": 40,
            "confidence": "0.5",
            "risk_factors": []
        });
        assert_eq!(validate(&value).unwrap_err().path, "fraud_probability");
    }

    #[test]
    fn non_json_reply_is_parse_error_with_raw_text() {
        let raw = "I could not analyze this document.";
        match parse_analysis(raw).unwrap_err() {
            AnalysisError::Parse { message, raw: kept } => {
                assert_eq!(message, PARSE_FAILED_MESSAGE);
                assert_eq!(kept, raw);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn wrong_shape_is_schema_error_with_raw_text() {
        let raw = "```json\n[1, 2, 3]\n```";
        let err = parse_analysis(raw).unwrap_err();
        assert_eq!(err.kind(), "schema");
        assert_eq!(err.raw_response(), Some(raw));
    }
}
