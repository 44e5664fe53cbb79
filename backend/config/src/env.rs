//! Environment variable substitution and overrides for config values.
//!
//! Supports `${VAR_NAME}` syntax in string values, resolved at load time.
//! Only uppercase `[A-Z_][A-Z0-9_]*` variable names are matched.
//! `$${}` escapes to a literal `${}`.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::schema::ScreenConfig;

/// `$${NAME}` (escaped) or `${NAME}`.
static ENV_REF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config JSON value tree.
///
/// Returns an error if any referenced env var is not set or is empty.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    substitute_value(value, &std::env::vars().collect(), "")
}

/// Substitute env vars using a provided map (useful for testing).
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => {
            let result: Result<Vec<_>> = arr
                .iter()
                .enumerate()
                .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
                .collect();
            Ok(Value::Array(result?))
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_REF_PATTERN.replace_all(s, |caps: &Captures| {
        let var_name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Apply the well-known environment overrides on top of a loaded config.
pub fn apply_env_overrides(mut config: ScreenConfig, env: &HashMap<String, String>) -> ScreenConfig {
    let get = |name: &str| env.get(name).filter(|v| !v.trim().is_empty()).cloned();

    if let Some(bind) = get("FRAUDSCREEN_BIND") {
        config.server.bind_address = bind;
    }
    if let Some(port) = get("FRAUDSCREEN_PORT").and_then(|p| p.parse().ok()) {
        config.server.port = port;
    }
    if let Some(key) = get("AI_GATEWAY_API_KEY") {
        config.model.api_key = Some(key);
    }
    if let Some(url) = get("AI_GATEWAY_URL") {
        config.model.base_url = url;
    }
    if let Some(endpoint) = get("FRAUDSCREEN_ENDPOINT") {
        config.client.endpoint = endpoint;
    }
    if let Some(key) = get("FRAUDSCREEN_ACCESS_KEY") {
        config.client.access_key = Some(key);
    }
    if let Some(dir) = get("FRAUDSCREEN_LOG_DIR") {
        config.logging.dir = Some(PathBuf::from(dir));
    }
    if let Some(level) = get("RUST_LOG") {
        config.logging.level = level;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_simple_var() {
        let v = json!({"model": {"api_key": "${AI_GATEWAY_API_KEY}"}});
        let env = env(&[("AI_GATEWAY_API_KEY", "gw-abc123")]);
        let result = resolve_env_vars_with(&v, &env).unwrap();
        assert_eq!(result["model"]["api_key"], "gw-abc123");
    }

    #[test]
    fn error_on_missing_var_names_path() {
        let v = json!({"client": {"access_key": "${MISSING_VAR}"}});
        let err = resolve_env_vars_with(&v, &HashMap::new()).unwrap_err().to_string();
        assert!(err.contains("MISSING_VAR"));
        assert!(err.contains("client.access_key"));
    }

    #[test]
    fn escaped_reference_is_literal() {
        let v = json!({"note": "keep $${HOME_DIR} but use ${NAME}"});
        let env = env(&[("NAME", "x")]);
        let result = resolve_env_vars_with(&v, &env).unwrap();
        assert_eq!(result["note"], "keep ${HOME_DIR} but use x");
    }

    #[test]
    fn passthrough_non_var_strings() {
        let v = json!({"key": "plain-string", "port": 8080});
        let result = resolve_env_vars_with(&v, &HashMap::new()).unwrap();
        assert_eq!(result, v);
    }

    #[test]
    fn overrides_take_precedence() {
        let env = env(&[
            ("FRAUDSCREEN_PORT", "9100"),
            ("AI_GATEWAY_API_KEY", "secret"),
            ("FRAUDSCREEN_BIND", ""),
        ]);
        let config = apply_env_overrides(ScreenConfig::default(), &env);
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.model.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn unparseable_port_is_ignored() {
        let env = env(&[("FRAUDSCREEN_PORT", "eighty")]);
        let config = apply_env_overrides(ScreenConfig::default(), &env);
        assert_eq!(config.server.port, crate::defaults::DEFAULT_PORT);
    }
}
