use thiserror::Error;

pub const NO_IMAGE_MESSAGE: &str = "No image data provided";
pub const NOT_CONFIGURED_MESSAGE: &str = "AI service not configured";
pub const RATE_LIMITED_MESSAGE: &str = "Rate limit exceeded. Please try again later.";
pub const QUOTA_EXHAUSTED_MESSAGE: &str = "API credits exhausted. Please add funds.";
pub const UPSTREAM_FAILED_MESSAGE: &str = "AI analysis failed";
pub const EMPTY_REPLY_MESSAGE: &str = "No analysis result returned";
pub const PARSE_FAILED_MESSAGE: &str = "Failed to parse analysis result";

/// Terminal failure of a single analysis attempt.
///
/// The `Display` output is the short message shown to the user. None of these
/// are retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The local byte source could not be read.
    #[error("Could not read document: {0}")]
    Read(String),

    /// No response reached the analysis service.
    #[error("Analysis service unreachable: {0}")]
    Transport(String),

    #[error("{0}")]
    RateLimited(String),

    #[error("{0}")]
    QuotaExhausted(String),

    /// Any other non-success status from the upstream model.
    #[error("{0}")]
    Upstream(String),

    /// Error envelope returned by the analysis service.
    #[error("{0}")]
    Service(String),

    /// The sanitized reply is not valid JSON. `raw` keeps the upstream text.
    #[error("{message}")]
    Parse { message: String, raw: String },

    /// Valid JSON of the wrong shape. `raw` keeps the upstream text.
    #[error("{message}")]
    Schema { message: String, raw: String },

    #[error("AI service not configured")]
    NotConfigured,
}

impl AnalysisError {
    pub fn rate_limited() -> Self {
        Self::RateLimited(RATE_LIMITED_MESSAGE.to_string())
    }

    pub fn quota_exhausted() -> Self {
        Self::QuotaExhausted(QUOTA_EXHAUSTED_MESSAGE.to_string())
    }

    /// Unsanitized upstream text, kept for diagnostics only.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::Parse { raw, .. } | Self::Schema { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// Stable label for logs and structured events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Read(_) => "read",
            Self::Transport(_) => "transport",
            Self::RateLimited(_) => "rate_limited",
            Self::QuotaExhausted(_) => "quota_exhausted",
            Self::Upstream(_) => "upstream",
            Self::Service(_) => "service",
            Self::Parse { .. } => "parse",
            Self::Schema { .. } => "schema",
            Self::NotConfigured => "not_configured",
        }
    }
}
