//! The acquisition entry point: input in, extracted content out.

use crate::classify::{classify, Input};
use crate::config::AcquireConfig;
use crate::error::Result;
use crate::fetch::fetch_all;
use crate::http::HttpClient;
use crate::orchestrator::Orchestrator;
use crate::types::AcquiredContent;

/// A configured acquisition pipeline.
///
/// Build once and reuse: the HTTP connection pool and adapter list live
/// as long as the `Acquirer`. No other state survives between calls.
#[derive(Debug)]
pub struct Acquirer {
    client: HttpClient,
    orchestrator: Orchestrator,
}

impl Acquirer {
    /// Validate `config` and build the client and provider chain from it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AcquireError::Config`] if the configuration is
    /// invalid or the HTTP client cannot be built.
    pub fn new(config: &AcquireConfig) -> Result<Self> {
        config.validate()?;
        let client = HttpClient::new(config)?;
        let orchestrator = Orchestrator::from_config(config, &client);
        Ok(Self {
            client,
            orchestrator,
        })
    }

    /// Replace the provider chain, keeping the HTTP client.
    pub fn with_orchestrator(mut self, orchestrator: Orchestrator) -> Self {
        self.orchestrator = orchestrator;
        self
    }

    /// The provider chain queries go through.
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Candidate URLs for `input` without fetching them.
    ///
    /// A URL input is its own single candidate. Empty input has none.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AcquireError::Exhausted`] when every provider fails
    /// and no emergency constructor is configured.
    pub async fn candidates(&self, input: &str) -> Result<Vec<String>> {
        match classify(input) {
            Input::Url(url) => Ok(vec![url]),
            Input::Query(query) if query.is_empty() => Ok(Vec::new()),
            Input::Query(query) => self.orchestrator.resolve_query(&query).await,
        }
    }

    /// Acquire content for `input`.
    ///
    /// Never fails. An empty result means nothing could be acquired and the
    /// caller should fall back to answering without sources.
    pub async fn acquire(&self, input: &str) -> Vec<AcquiredContent> {
        let urls = match self.candidates(input).await {
            Ok(urls) => urls,
            Err(err) => {
                tracing::warn!(kind = err.kind(), error = %err, "no candidate URLs");
                return Vec::new();
            }
        };
        if urls.is_empty() {
            return Vec::new();
        }

        let contents = fetch_all(&self.client, &urls).await;
        tracing::info!(
            candidates = urls.len(),
            acquired = contents.len(),
            "acquisition complete"
        );
        contents
    }
}

/// One-shot acquisition with `config`.
///
/// Builds an [`Acquirer`] for the call. An invalid configuration is
/// logged and treated like a total failure: the result is empty.
///
/// # Examples
///
/// ```no_run
/// # async fn example() {
/// let config = webgist_acquire::AcquireConfig::default();
/// let contents = webgist_acquire::acquire("giraffe height facts", &config).await;
/// for content in &contents {
///     println!("{}: {}", content.title, content.url);
/// }
/// # }
/// ```
pub async fn acquire(input: &str, config: &AcquireConfig) -> Vec<AcquiredContent> {
    match Acquirer::new(config) {
        Ok(acquirer) => acquirer.acquire(input).await,
        Err(err) => {
            tracing::warn!(kind = err.kind(), error = %err, "acquisition not attempted");
            Vec::new()
        }
    }
}
