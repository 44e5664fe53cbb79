//! Recover the JSON payload from a model reply.
//!
//! Models often wrap their answer in a fenced code block even when told not
//! to. Truncated or doubly wrapped replies are passed through untouched and
//! are expected to fail JSON parsing downstream.

const FENCE: &str = "```";

/// Strip one surrounding code fence (with or without a language tag).
///
/// Unfenced input is returned trimmed.
pub fn sanitize(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix(FENCE) {
        text = skip_language_tag(rest);
    }
    if let Some(rest) = text.strip_suffix(FENCE) {
        text = rest;
    }
    text.trim()
}

fn skip_language_tag(after_fence: &str) -> &str {
    let end = after_fence
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.')))
        .unwrap_or(after_fence.len());
    &after_fence[end..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BODY: &str = r#"{"document_type":"invoice","risk_factors":[]}"#;

    #[test]
    fn fence_variants_yield_same_json() {
        let tagged = format!("```json\n{BODY}\n```");
        let bare = format!("```\n{BODY}\n```");
        assert_eq!(sanitize(&tagged), BODY);
        assert_eq!(sanitize(&bare), BODY);
        assert_eq!(sanitize(BODY), BODY);
    }

    #[test]
    fn tolerates_surrounding_whitespace_and_inline_fence() {
        assert_eq!(sanitize(&format!("  \n```JSON {BODY}```\n\n")), BODY);
        assert_eq!(sanitize(&format!("```{BODY}```")), BODY);
    }

    #[test]
    fn only_trailing_fence() {
        assert_eq!(sanitize(&format!("{BODY}\n```")), BODY);
    }

    #[test]
    fn truncated_reply_passes_through() {
        let truncated = "```json\n{\"document_type\": \"inv";
        assert_eq!(sanitize(truncated), "{\"document_type\": \"inv");
        assert!(serde_json::from_str::<serde_json::Value>(sanitize(truncated)).is_err());
    }

    #[test]
    fn doubly_wrapped_is_not_repaired() {
        let double = format!("```json\n```json\n{BODY}\n```\n```");
        let once = sanitize(&double);
        assert!(once.starts_with("```"));
        assert!(serde_json::from_str::<serde_json::Value>(once).is_err());
    }

    #[test]
    fn empty_input() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("```"), "");
    }

    proptest! {
        #[test]
        fn idempotent_on_unfenced_input(s in "[^`]*") {
            let once = sanitize(&s);
            prop_assert_eq!(sanitize(once), once);
        }

        #[test]
        fn strips_any_fence_around_object(key in "[a-z_]{1,12}", value in "[a-zA-Z0-9 ]{0,24}") {
            let json = serde_json::json!({ key: value }).to_string();
            let fenced = format!("```json\n{json}\n```");
            prop_assert_eq!(sanitize(&fenced), json.as_str());
        }
    }
}
