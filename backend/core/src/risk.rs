//! Risk tiering and the derived values the result views render.
//!
//! Everything here is pure and total: unparseable numbers count as zero.

use serde::Serialize;

use crate::types::AnalysisResult;

/// Inclusive lower bound of the medium tier.
pub const MEDIUM_RISK_THRESHOLD: f64 = 30.0;
/// Inclusive lower bound of the high tier.
pub const HIGH_RISK_THRESHOLD: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_RISK_THRESHOLD {
            Self::High
        } else if probability >= MEDIUM_RISK_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Medium => "Medium Risk",
            Self::High => "High Risk",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Low => "Document appears legitimate",
            Self::Medium => "Some concerns detected",
            Self::High => "Multiple fraud indicators",
        }
    }
}

/// Display bucket for one risk factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorSeverity {
    High,
    Medium,
    Info,
}

impl FactorSeverity {
    /// Position and overall probability only; the factor text is never read.
    /// The first factor is always high and the second at least medium, even
    /// for a low-risk document.
    pub fn for_position(index: usize, probability: f64) -> Self {
        if probability >= HIGH_RISK_THRESHOLD || index == 0 {
            Self::High
        } else if probability >= MEDIUM_RISK_THRESHOLD || index < 2 {
            Self::Medium
        } else {
            Self::Info
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatedFactor {
    pub text: String,
    pub severity: FactorSeverity,
}

/// Presentation values derived from one result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReport {
    /// Parsed fraud probability in percent.
    pub probability: f64,
    pub tier: RiskTier,
    /// Parsed confidence, nominally in `[0, 1]`.
    pub confidence: f64,
    /// Confidence as a whole percentage.
    pub confidence_percent: u8,
    /// Needle rotation in degrees, `-90` (0%) to `90` (100%).
    pub gauge_angle: f64,
    /// Width of the confidence bar in percent.
    pub confidence_fill: f64,
    pub factors: Vec<RatedFactor>,
}

impl RiskReport {
    pub fn issue_summary(&self) -> String {
        match self.factors.len() {
            0 => "No risk factors detected".to_string(),
            1 => "1 issue found".to_string(),
            n => format!("{n} issues found"),
        }
    }
}

/// Parse the leading number of `"72%"`, `"65% (high)"` or `"70-80%"`.
/// No leading number means `0`.
pub fn parse_probability(raw: &str) -> f64 {
    leading_number(raw)
}

/// Parse the leading number of `"0.81"` or `"0.81 (approx)"`; otherwise `0`.
pub fn parse_confidence(raw: &str) -> f64 {
    leading_number(raw)
}

/// Longest prefix of the trimmed text that reads as a decimal float:
/// optional sign, digits with at most one `.`, optional exponent.
fn leading_number(raw: &str) -> f64 {
    let s = raw.trim();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let mantissa_start = end;
    let mut seen_dot = false;
    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => end += 1,
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    if !s[mantissa_start..end].bytes().any(|b| b.is_ascii_digit()) {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

pub fn classify(result: &AnalysisResult) -> RiskReport {
    let probability = parse_probability(&result.fraud_probability);
    let confidence = parse_confidence(&result.confidence);
    let confidence_fill = (confidence * 100.0).clamp(0.0, 100.0);

    let factors = result
        .risk_factors
        .iter()
        .enumerate()
        .map(|(index, text)| RatedFactor {
            text: text.clone(),
            severity: FactorSeverity::for_position(index, probability),
        })
        .collect();

    RiskReport {
        probability,
        tier: RiskTier::from_probability(probability),
        confidence,
        confidence_percent: confidence_fill.round() as u8,
        gauge_angle: probability.clamp(0.0, 100.0) / 100.0 * 180.0 - 90.0,
        confidence_fill,
        factors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExtractedFields;
    use proptest::prelude::*;

    fn result(probability: &str, confidence: &str, factors: &[&str]) -> AnalysisResult {
        AnalysisResult {
            document_type: "invoice".into(),
            fraud_probability: probability.into(),
            confidence: confidence.into(),
            risk_factors: factors.iter().map(|f| f.to_string()).collect(),
            extracted_fields: ExtractedFields::default(),
        }
    }

    #[test]
    fn high_risk_scenario() {
        let report = classify(&result("72%", "0.81", &["Benign looking factor", "b"]));
        assert_eq!(report.tier, RiskTier::High);
        assert_eq!(report.confidence_percent, 81);
        assert_eq!(report.factors[0].severity, FactorSeverity::High);
        assert_eq!(report.factors[1].severity, FactorSeverity::High);
    }

    #[test]
    fn boundaries_are_inclusive_lower_bounds() {
        assert_eq!(RiskTier::from_probability(29.999), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(30.0), RiskTier::Medium);
        assert_eq!(RiskTier::from_probability(59.999), RiskTier::Medium);
        assert_eq!(RiskTier::from_probability(60.0), RiskTier::High);
        assert_eq!(classify(&result("30%", "0.5", &[])).tier, RiskTier::Medium);
        assert_eq!(classify(&result("60%", "0.5", &[])).tier, RiskTier::High);
    }

    #[test]
    fn unparseable_values_count_as_zero() {
        let report = classify(&result("unknown", "n/a", &[]));
        assert_eq!(report.probability, 0.0);
        assert_eq!(report.tier, RiskTier::Low);
        assert_eq!(report.confidence_percent, 0);
        assert_eq!(parse_probability("NaN%"), 0.0);
        assert_eq!(parse_probability(" 45 % "), 45.0);
    }

    #[test]
    fn trailing_text_after_number_is_ignored() {
        assert_eq!(parse_probability("65% (high)"), 65.0);
        assert_eq!(parse_probability("70-80%"), 70.0);
        assert_eq!(parse_probability("12.5%"), 12.5);
        assert_eq!(parse_probability("~40%"), 0.0);
        assert_eq!(parse_confidence("0.81 (approx)"), 0.81);
        assert_eq!(parse_confidence("1e-1"), 0.1);
        assert_eq!(parse_confidence(".5"), 0.5);
        assert_eq!(parse_confidence("7e"), 7.0);

        let report = classify(&result("65% (high)", "0.81 (approx)", &["a", "b", "c"]));
        assert_eq!(report.tier, RiskTier::High);
        assert_eq!(report.confidence_percent, 81);
        assert_eq!(report.factors[2].severity, FactorSeverity::High);
    }

    #[test]
    fn empty_factors_is_a_valid_report() {
        let report = classify(&result("10%", "0.95", &[]));
        assert!(report.factors.is_empty());
        assert_eq!(report.issue_summary(), "No risk factors detected");
    }

    #[test]
    fn positional_severity_for_low_risk() {
        let report = classify(&result("10%", "0.9", &["a", "b", "c"]));
        let severities: Vec<_> = report.factors.iter().map(|f| f.severity).collect();
        assert_eq!(
            severities,
            vec![FactorSeverity::High, FactorSeverity::Medium, FactorSeverity::Info]
        );
        assert_eq!(report.issue_summary(), "3 issues found");
    }

    #[test]
    fn medium_risk_lifts_later_factors_to_medium() {
        let report = classify(&result("45%", "0.6", &["a", "b", "c", "d"]));
        assert_eq!(report.factors[0].severity, FactorSeverity::High);
        assert!(report.factors[1..]
            .iter()
            .all(|f| f.severity == FactorSeverity::Medium));
    }

    #[test]
    fn gauge_angle_spans_half_circle() {
        assert_eq!(classify(&result("0%", "0", &[])).gauge_angle, -90.0);
        assert_eq!(classify(&result("50%", "0", &[])).gauge_angle, 0.0);
        assert_eq!(classify(&result("100%", "0", &[])).gauge_angle, 90.0);
        assert_eq!(classify(&result("140%", "0", &[])).gauge_angle, 90.0);
    }

    #[test]
    fn confidence_rounds_to_nearest_percent() {
        assert_eq!(classify(&result("1%", "0.816", &[])).confidence_percent, 82);
        assert_eq!(classify(&result("1%", "0.004", &[])).confidence_percent, 0);
        assert_eq!(classify(&result("1%", "1", &[])).confidence_fill, 100.0);
    }

    proptest! {
        #[test]
        fn tier_matches_thresholds(p in -50.0f64..150.0) {
            let tier = RiskTier::from_probability(p);
            prop_assert_eq!(tier == RiskTier::Low, p < 30.0);
            prop_assert_eq!(tier == RiskTier::Medium, (30.0..60.0).contains(&p));
            prop_assert_eq!(tier == RiskTier::High, p >= 60.0);
        }

        #[test]
        fn percent_strings_parse_back(p in 0u32..=100) {
            let report = classify(&result(&format!("{p}%"), "0.5", &[]));
            prop_assert_eq!(report.probability, p as f64);
        }
    }
}
