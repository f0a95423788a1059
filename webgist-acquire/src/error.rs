//! Error types for the webgist-acquire crate.
//!
//! Messages are stable strings suitable for logs. Queries never appear in
//! error messages; only provider names, endpoints and status details do.

/// Errors that can occur while acquiring content.
///
/// Only [`AcquireError::Exhausted`] and [`AcquireError::Config`] ever leave
/// the orchestrator; the other variants describe a single adapter or fetch
/// failing and are recovered locally.
#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    /// Transport-level failure: connection, timeout, non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The response was an anti-automation challenge or notice rather than content.
    #[error("blocked: {0}")]
    Blocked(String),

    /// The provider answered but produced no usable URLs.
    #[error("no results: {0}")]
    NoResults(String),

    /// A response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid acquisition configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Every provider failed and no emergency constructor was configured.
    #[error("all providers failed: {0}")]
    Exhausted(String),
}

impl AcquireError {
    /// Short machine-readable label, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http(_) => "http",
            Self::Blocked(_) => "blocked",
            Self::NoResults(_) => "no_results",
            Self::Parse(_) => "parse",
            Self::Config(_) => "config",
            Self::Exhausted(_) => "exhausted",
        }
    }

    /// Returns `true` if this failure came from block detection.
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked(_))
    }
}

/// Convenience type alias for webgist-acquire results.
pub type Result<T> = std::result::Result<T, AcquireError>;
