//! CLI Status Command
//!
//! Queries the health endpoint of the configured analysis service.

use anyhow::{Context, Result};
use reqwest::Url;
use serde_json::Value;

use crate::terminal_output::{note_error, note_success};

/// `/api/health` on the same origin as the analyze endpoint.
pub fn health_url(endpoint: &str) -> Result<Url> {
    let endpoint = Url::parse(endpoint).with_context(|| format!("Invalid endpoint {endpoint}"))?;
    endpoint
        .join("/api/health")
        .context("Cannot derive health URL from endpoint")
}

pub async fn run(endpoint: &str) -> Result<()> {
    let url = health_url(endpoint)?;
    let response = match reqwest::get(url.clone()).await {
        Ok(response) => response,
        Err(e) => {
            note_error(&format!("FraudScreen is not reachable at {url}: {e}"));
            return Ok(());
        }
    };

    let body: Value = response.json().await.context("Health response is not JSON")?;
    let configured = body["model_configured"].as_bool().unwrap_or(false);
    if configured {
        note_success(&format!("FraudScreen is up at {url}"));
    } else {
        note_error(&format!("FraudScreen is up at {url} but no model key is configured"));
    }
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_url_keeps_origin() {
        let url = health_url("http://localhost:8787/functions/v1/analyze-document").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8787/api/health");
    }

    #[test]
    fn rejects_garbage_endpoint() {
        assert!(health_url("not a url").is_err());
    }
}
