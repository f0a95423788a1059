//! Acquisition configuration with sensible defaults.
//!
//! [`AcquireConfig`] controls which providers take part in the fallback
//! chain, how many candidate URLs are fetched, request timeouts and the
//! endpoint each provider talks to. The defaults target the public
//! services; endpoints are overridable for private mirrors and tests.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AcquireError;
use crate::types::ProviderKind;

/// Upper bound on candidate URLs per acquisition. Bounds fetch fan-out and
/// the amount of text handed to the model.
pub const MAX_CANDIDATES_LIMIT: usize = 5;

/// Public SearXNG instances tried in order when none are configured.
pub const DEFAULT_SEARX_INSTANCES: &[&str] = &[
    "https://searx.be",
    "https://search.sapti.me",
    "https://searx.tiekoetter.com",
    "https://priv.au",
];

/// Configuration for content acquisition.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour. Deserializes from a partial TOML
/// table; missing fields take their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquireConfig {
    /// Providers that take part in the fallback chain. They are always
    /// tried in [`ProviderKind::priority`] order, whatever order is listed here.
    pub providers: Vec<ProviderKind>,
    /// Build heuristic URLs from the query when every provider fails.
    pub emergency_fallback: bool,
    /// Maximum candidate URLs a provider may return (1..=5).
    pub max_candidates: usize,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Fixed User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents on every request.
    pub user_agent: Option<String>,
    /// SearXNG mirror base URLs, tried in order.
    pub searx_instances: Vec<String>,
    /// DuckDuckGo HTML results endpoint.
    pub duckduckgo_html_url: String,
    /// DuckDuckGo instant-answer API endpoint.
    pub duckduckgo_api_url: String,
    /// Wikipedia `api.php` endpoint.
    pub wikipedia_api_url: String,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            providers: ProviderKind::all().to_vec(),
            emergency_fallback: true,
            max_candidates: 3,
            timeout_seconds: 10,
            user_agent: None,
            searx_instances: DEFAULT_SEARX_INSTANCES
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
            duckduckgo_html_url: "https://html.duckduckgo.com/html/".to_owned(),
            duckduckgo_api_url: "https://api.duckduckgo.com/".to_owned(),
            wikipedia_api_url: "https://en.wikipedia.org/w/api.php".to_owned(),
        }
    }
}

impl AcquireConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_candidates` must be within `1..=5`
    /// - `timeout_seconds` must be greater than 0
    /// - at least one provider or the emergency fallback must be enabled
    /// - `searx_instances` must not be empty when SearXNG is enabled
    /// - every endpoint must be an absolute `http(s)` URL
    pub fn validate(&self) -> Result<(), AcquireError> {
        if self.max_candidates == 0 || self.max_candidates > MAX_CANDIDATES_LIMIT {
            return Err(AcquireError::Config(format!(
                "max_candidates must be between 1 and {MAX_CANDIDATES_LIMIT}"
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(AcquireError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.providers.is_empty() && !self.emergency_fallback {
            return Err(AcquireError::Config(
                "at least one provider or the emergency fallback must be enabled".into(),
            ));
        }
        if self.providers.contains(&ProviderKind::SearxNg) && self.searx_instances.is_empty() {
            return Err(AcquireError::Config(
                "searx_instances must not be empty when searxng is enabled".into(),
            ));
        }

        let endpoints = self
            .searx_instances
            .iter()
            .map(|s| ("searx_instances", s.as_str()))
            .chain([
                ("duckduckgo_html_url", self.duckduckgo_html_url.as_str()),
                ("duckduckgo_api_url", self.duckduckgo_api_url.as_str()),
                ("wikipedia_api_url", self.wikipedia_api_url.as_str()),
            ]);
        for (field, raw) in endpoints {
            let valid = Url::parse(raw)
                .map(|u| matches!(u.scheme(), "http" | "https"))
                .unwrap_or(false);
            if !valid {
                return Err(AcquireError::Config(format!(
                    "{field} must be an absolute http(s) URL, got {raw:?}"
                )));
            }
        }
        Ok(())
    }

    /// Enabled providers in priority order, without duplicates.
    pub fn ordered_providers(&self) -> Vec<ProviderKind> {
        let mut providers = self.providers.clone();
        providers.sort();
        providers.dedup();
        providers
    }
}
