//! Config validation with field paths and user-friendly messages.

use crate::schema::ScreenConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &ScreenConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_model(config, &mut report);
    validate_client(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_server(config: &ScreenConfig, report: &mut ValidationReport) {
    let server = &config.server;
    if server.port == 0 {
        report.error("server.port", "Port must be > 0");
    }
    if server.bind_address.trim().is_empty() {
        report.error("server.bind_address", "Bind address cannot be empty");
    }
    if server.max_body_bytes == 0 {
        report.error("server.max_body_bytes", "max_body_bytes must be > 0");
    }
}

fn validate_model(config: &ScreenConfig, report: &mut ValidationReport) {
    let model = &config.model;
    if !is_http_url(&model.base_url) {
        report.error("model.base_url", "Must be an http(s) URL");
    }
    if model.model.trim().is_empty() {
        report.error("model.model", "Model id cannot be empty");
    }
    if model.max_tokens == 0 {
        report.error("model.max_tokens", "max_tokens must be > 0");
    }
    if !model.is_configured() {
        report.warn(
            "model.api_key",
            "No API key configured; analysis requests will report the service as not configured",
        );
    }
}

fn validate_client(config: &ScreenConfig, report: &mut ValidationReport) {
    if !is_http_url(&config.client.endpoint) {
        report.error("client.endpoint", "Must be an http(s) URL");
    }
    if config.client.timeout_secs == Some(0) {
        report.error("client.timeout_secs", "Timeout must be > 0 when set");
    }
}

fn validate_logging(config: &ScreenConfig, report: &mut ValidationReport) {
    let level = config.logging.level.to_ascii_lowercase();
    let plain_level = matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error");
    // Directive strings such as `fraudscreen_gateway=debug` are left to EnvFilter.
    if !plain_level && !level.contains('=') {
        report.warn("logging.level", format!("Unknown log level '{}'", config.logging.level));
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
