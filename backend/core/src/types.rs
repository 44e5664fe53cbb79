use serde::{Deserialize, Serialize};

/// Validated fraud-screening verdict for one document.
///
/// Field order and names match the JSON the model is asked to produce, so
/// serializing this type yields the documented wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub document_type: String,
    /// Percentage string, e.g. `"72%"`.
    pub fraud_probability: String,
    /// Decimal string in `[0, 1]`, e.g. `"0.81"`.
    pub confidence: String,
    /// Insertion order is display order.
    pub risk_factors: Vec<String>,
    pub extracted_fields: ExtractedFields,
}

/// Data the model claims to have read off the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub name: String,
    pub issuer: String,
    pub institution: String,
    pub dates: DocumentDates,
    pub amount: String,
    pub currency: String,
    pub has_signature: bool,
    pub has_stamp: bool,
    pub has_watermark: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDates {
    pub issue_date: String,
    pub event_date: String,
    pub due_date: String,
}

/// Body of every non-success response from the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    /// Unsanitized model text; present only for parse failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl ExtractedFields {
    /// Currency and amount joined for display (`"USD 1200"`).
    ///
    /// Returns `None` when no amount was extracted.
    pub fn amount_display(&self) -> Option<String> {
        if self.amount.trim().is_empty() {
            return None;
        }
        Some(format!("{} {}", self.currency.trim(), self.amount.trim()).trim().to_string())
    }
}

impl AnalysisResult {
    pub fn has_risk_factors(&self) -> bool {
        !self.risk_factors.is_empty()
    }
}
