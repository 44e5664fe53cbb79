//! Plain-text rendering of an assessment.

use fraudscreen_client::Assessment;
use fraudscreen_core::{FactorSeverity, RiskTier};

use crate::terminal_output::{paint, render_fields, BOLD, DIM, GREEN, RED, YELLOW};

const EMPTY: &str = "—";

fn tier_style(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Low => GREEN,
        RiskTier::Medium => YELLOW,
        RiskTier::High => RED,
    }
}

fn severity_tag(severity: FactorSeverity) -> (&'static str, &'static str) {
    match severity {
        FactorSeverity::High => ("[high]", RED),
        FactorSeverity::Medium => ("[medium]", YELLOW),
        FactorSeverity::Info => ("[info]", DIM),
    }
}

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        EMPTY.to_string()
    } else {
        value.to_string()
    }
}

fn yes_no(value: bool) -> String {
    let text = if value { "yes" } else { "no" };
    text.to_string()
}

pub fn render(assessment: &Assessment, color: bool) -> String {
    let Assessment { result, report } = assessment;
    let tier = report.tier;
    let mut out = String::new();

    out.push_str(&format!(
        "\n{}  {}\n",
        paint(tier.label(), &format!("{BOLD}{}", tier_style(tier)), color),
        tier.description()
    ));
    out.push_str(&render_fields(&[
        ("Document type", or_dash(&result.document_type)),
        ("Fraud probability", or_dash(&result.fraud_probability)),
        ("Confidence", format!("{}%", report.confidence_percent)),
    ]));

    out.push_str(&format!("\n{}\n", paint("Risk factors", BOLD, color)));
    out.push_str(&format!("  {}\n", report.issue_summary()));
    for factor in &report.factors {
        let (tag, style) = severity_tag(factor.severity);
        out.push_str(&format!("  {} {}\n", paint(tag, style, color), factor.text));
    }

    let fields = &result.extracted_fields;
    out.push_str(&format!("\n{}\n", paint("Extracted fields", BOLD, color)));
    out.push_str(&render_fields(&[
        ("Name", or_dash(&fields.name)),
        ("Issuer", or_dash(&fields.issuer)),
        ("Institution", or_dash(&fields.institution)),
        ("Issue date", or_dash(&fields.dates.issue_date)),
        ("Event date", or_dash(&fields.dates.event_date)),
        ("Due date", or_dash(&fields.dates.due_date)),
        ("Amount", fields.amount_display().unwrap_or_else(|| EMPTY.to_string())),
        ("Signature", yes_no(fields.has_signature)),
        ("Stamp", yes_no(fields.has_stamp)),
        ("Watermark", yes_no(fields.has_watermark)),
    ]));

    out
}
