//! Default values applied when a config section or field is omitted.

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 8787;

/// 25 MiB of JSON, enough for a ~18 MiB document after base64.
pub const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

pub const DEFAULT_MODEL_BASE_URL: &str = "https://ai.gateway.lovable.dev/v1";

pub const DEFAULT_MODEL: &str = "google/gemini-2.5-pro";

/// Default max tokens for model responses.
pub const DEFAULT_MODEL_MAX_TOKENS: u32 = 4096;

pub const DEFAULT_LOG_LEVEL: &str = "info";
