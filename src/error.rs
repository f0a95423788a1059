//! Error types for webgist.

/// Top-level error type for configuration and summarisation.
///
/// Acquisition failures never appear here: acquisition degrades to an
/// empty result instead of failing.
#[derive(Debug, thiserror::Error)]
pub enum WebgistError {
    /// Configuration file could not be parsed or is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// Language model request or response error.
    #[error("LLM error: {0}")]
    Llm(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<webgist_acquire::AcquireError> for WebgistError {
    fn from(err: webgist_acquire::AcquireError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, WebgistError>;
