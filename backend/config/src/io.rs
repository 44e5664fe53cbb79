//! Config file location and loading.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::env::resolve_env_vars_with;
use crate::schema::ScreenConfig;

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the FraudScreen config directory.
/// Priority: `FRAUDSCREEN_CONFIG_DIR` env > `~/.fraudscreen/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FRAUDSCREEN_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".fraudscreen"),
        None => PathBuf::from(".fraudscreen"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Load and parse the config from disk, substituting `${VAR}` references
/// from `env`.
///
/// Returns `Ok(Default::default())` if the file doesn't exist (first run).
pub async fn load_config(
    path: &Path,
    env: &std::collections::HashMap<String, String>,
) -> Result<ScreenConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(ScreenConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let value: Value = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;
    if value.is_null() {
        return Ok(ScreenConfig::default());
    }

    let value = resolve_env_vars_with(&value, env).context("Failed to resolve env vars in config")?;
    let config: ScreenConfig = serde_json::from_value(value)
        .with_context(|| format!("Invalid config at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}
