//! Fallback orchestrator: first success wins.
//!
//! Adapters are tried one at a time in priority order. The first adapter
//! that returns a non-empty list decides the candidate URLs and no later
//! adapter is contacted. Sequential trials keep request volume low, which
//! matters more than latency when every backend rate-limits scrapers.

use crate::config::AcquireConfig;
use crate::error::{AcquireError, Result};
use crate::http::HttpClient;
use crate::provider::ProviderAdapter;
use crate::providers::{
    DuckDuckGoAdapter, EmergencyConstructor, InstantAnswerAdapter, SearxNgAdapter,
    WikipediaAdapter,
};
use crate::types::ProviderKind;

/// Ordered adapter list plus an optional last-resort constructor.
pub struct Orchestrator {
    adapters: Vec<Box<dyn ProviderAdapter>>,
    emergency: Option<EmergencyConstructor>,
}

impl Orchestrator {
    /// Build from an explicit adapter list, tried in the order given.
    pub fn new(
        adapters: Vec<Box<dyn ProviderAdapter>>,
        emergency: Option<EmergencyConstructor>,
    ) -> Self {
        Self {
            adapters,
            emergency,
        }
    }

    /// Build the configured providers in priority order.
    ///
    /// Every adapter shares `client`, so they share its connection pool and
    /// header policy.
    pub fn from_config(config: &AcquireConfig, client: &HttpClient) -> Self {
        let max = config.max_candidates;
        let adapters = config
            .ordered_providers()
            .into_iter()
            .map(|kind| -> Box<dyn ProviderAdapter> {
                match kind {
                    ProviderKind::SearxNg => Box::new(SearxNgAdapter::new(
                        client.clone(),
                        config.searx_instances.clone(),
                        max,
                    )),
                    ProviderKind::DuckDuckGoHtml => Box::new(DuckDuckGoAdapter::new(
                        client.clone(),
                        config.duckduckgo_html_url.clone(),
                        max,
                    )),
                    ProviderKind::DuckDuckGoInstant => Box::new(InstantAnswerAdapter::new(
                        client.clone(),
                        config.duckduckgo_api_url.clone(),
                        max,
                    )),
                    ProviderKind::Wikipedia => Box::new(WikipediaAdapter::new(
                        client.clone(),
                        config.wikipedia_api_url.clone(),
                        max,
                    )),
                }
            })
            .collect();

        let emergency = config
            .emergency_fallback
            .then(|| EmergencyConstructor::new(max));

        Self::new(adapters, emergency)
    }

    /// Names of the adapters, in trial order.
    pub fn adapter_names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    /// Returns `true` if an emergency constructor backs the adapter list.
    pub fn has_emergency_fallback(&self) -> bool {
        self.emergency.is_some()
    }

    /// Resolve `query` to candidate URLs.
    ///
    /// Returns the first adapter's successful output unchanged. Failures
    /// are logged with the adapter name and error kind, then the next
    /// adapter is tried. An adapter returning an empty list counts as a
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError::Exhausted`] if every adapter fails and no
    /// emergency constructor is configured. With one configured this never
    /// fails.
    pub async fn resolve_query(&self, query: &str) -> Result<Vec<String>> {
        tracing::trace!(query, "resolving query");

        let mut failures: Vec<String> = Vec::with_capacity(self.adapters.len());
        for adapter in &self.adapters {
            let provider = adapter.name();
            match adapter.resolve(query).await {
                Ok(urls) if !urls.is_empty() => {
                    tracing::info!(provider, count = urls.len(), "provider supplied candidates");
                    return Ok(urls);
                }
                Ok(_) => {
                    tracing::warn!(provider, kind = "no_results", "provider returned an empty list");
                    failures.push(format!("{provider}: empty result list"));
                }
                Err(err) => {
                    tracing::warn!(provider, kind = err.kind(), error = %err, "provider failed");
                    failures.push(format!("{provider}: {err}"));
                }
            }
        }

        match self.emergency {
            Some(ref emergency) => {
                let urls = emergency.construct(query);
                tracing::info!(
                    provider = "emergency",
                    count = urls.len(),
                    "all providers failed, using heuristic candidates"
                );
                Ok(urls)
            }
            None => {
                if failures.is_empty() {
                    return Err(AcquireError::Exhausted("no providers configured".into()));
                }
                Err(AcquireError::Exhausted(failures.join("; ")))
            }
        }
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("adapters", &self.adapter_names())
            .field("emergency", &self.emergency)
            .finish()
    }
}
