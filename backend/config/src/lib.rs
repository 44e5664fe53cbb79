//! `fraudscreen-config`: runtime configuration for the analysis service and CLI.
//!
//! Provides:
//! - Typed config schema (server, model, client, logging)
//! - YAML loading with `${ENV_VAR}` substitution
//! - Well-known environment overrides
//! - Default values, validation, and redaction for safe logging

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::{apply_env_overrides, resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config};
pub use redact::redact;
pub use schema::{ClientConfig, LoggingConfig, ModelConfig, ScreenConfig, ServerConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Load, substitute env vars, apply env overrides, and validate.
///
/// This is the main entry point for loading a config at runtime. `None`
/// means the default location under [`config_dir`].
pub async fn load_and_prepare(path: Option<&Path>) -> Result<ScreenConfig> {
    let env: HashMap<String, String> = std::env::vars().collect();
    let default_path = config_file_path(&config_dir());
    let path = path.unwrap_or(&default_path);

    let config = load_config(path, &env).await?;
    let config = apply_env_overrides(config, &env);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.into_iter().next() {
        bail!(first);
    }

    Ok(config)
}

impl ScreenConfig {
    /// JSON snapshot with secrets masked.
    pub fn redacted(&self) -> Result<serde_json::Value> {
        let value = serde_json::to_value(self).context("Failed to serialize config")?;
        Ok(redact(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacted_snapshot_hides_key() {
        let mut config = ScreenConfig::default();
        config.model.api_key = Some("live-key-0123456789".into());
        let snapshot = config.redacted().unwrap();
        assert_eq!(snapshot["model"]["api_key"], "live***");
        assert_eq!(snapshot["server"]["port"], 8787);
    }

    #[tokio::test]
    async fn invalid_file_fails_to_prepare() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        std::fs::write(&path, "server:\n  port: 0\n").unwrap();
        let err = load_and_prepare(Some(&path)).await.unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }
}
