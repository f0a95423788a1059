//! Core types for acquired content and provider identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fetched and extracted content for one candidate URL.
///
/// Produced once per successfully fetched URL and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquiredContent {
    /// The page `<title>`, empty if the page has none.
    pub title: String,
    /// Visible text of the page body.
    pub content: String,
    /// Canonical source URL of the page.
    pub url: String,
}

/// The search backends an acquisition can fall back through.
///
/// Variant order is the priority order: the orchestrator always tries
/// lower [`ProviderKind::priority`] values first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Public SearXNG meta-search mirrors.
    #[serde(rename = "searxng")]
    SearxNg,
    /// DuckDuckGo HTML results page scrape.
    #[serde(rename = "duckduckgo_html")]
    DuckDuckGoHtml,
    /// DuckDuckGo instant-answer JSON API.
    #[serde(rename = "duckduckgo_instant")]
    DuckDuckGoInstant,
    /// Wikipedia opensearch API. Rarely blocks, least specific.
    #[serde(rename = "wikipedia")]
    Wikipedia,
}

impl ProviderKind {
    /// Returns the human-readable name of this provider.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SearxNg => "SearXNG",
            Self::DuckDuckGoHtml => "DuckDuckGo",
            Self::DuckDuckGoInstant => "DuckDuckGo Instant Answer",
            Self::Wikipedia => "Wikipedia",
        }
    }

    /// Position in the fallback chain (0 is tried first).
    pub fn priority(&self) -> u8 {
        match self {
            Self::SearxNg => 0,
            Self::DuckDuckGoHtml => 1,
            Self::DuckDuckGoInstant => 2,
            Self::Wikipedia => 3,
        }
    }

    /// Returns all providers in priority order.
    pub fn all() -> &'static [ProviderKind] {
        &[
            Self::SearxNg,
            Self::DuckDuckGoHtml,
            Self::DuckDuckGoInstant,
            Self::Wikipedia,
        ]
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
