//! Provider adapter implementations.
//!
//! Each module provides a struct implementing [`crate::provider::ProviderAdapter`]
//! for one search backend, plus the network-free [`EmergencyConstructor`]
//! used as the last resort.

pub mod duckduckgo;
pub mod emergency;
pub mod instant_answer;
pub mod searxng;
pub mod wikipedia;

pub use duckduckgo::DuckDuckGoAdapter;
pub use emergency::EmergencyConstructor;
pub use instant_answer::InstantAnswerAdapter;
pub use searxng::SearxNgAdapter;
pub use wikipedia::WikipediaAdapter;

use scraper::{Html, Selector};
use url::Url;

use crate::error::{AcquireError, Result};

/// Returns `true` if `html` contains an element matching `selector`.
///
/// Adapters use it to tell a results page from an interstitial: a page
/// that lists results is answering, whatever words its snippets contain.
pub(crate) fn has_results(html: &str, selector: &str) -> Result<bool> {
    let sel = Selector::parse(selector)
        .map_err(|e| AcquireError::Parse(format!("invalid result selector: {e:?}")))?;
    Ok(Html::parse_document(html).select(&sel).next().is_some())
}

/// Returns `true` if `host` is `domain` or one of its subdomains.
pub(crate) fn host_matches(host: &str, domain: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{domain}"))
}

/// Returns `true` if `url` is absolute http(s) and its host is in `domains`.
pub(crate) fn url_host_in(url: &Url, domains: &[&str]) -> bool {
    url.host_str()
        .is_some_and(|host| domains.iter().any(|d| host_matches(host, d)))
}

/// An insertion-ordered, deduplicated, capped list of candidate URLs.
#[derive(Debug)]
pub(crate) struct Candidates {
    urls: Vec<String>,
    cap: usize,
}

impl Candidates {
    pub(crate) fn with_cap(cap: usize) -> Self {
        Self {
            urls: Vec::with_capacity(cap),
            cap,
        }
    }

    /// Add `url` unless already present. Returns `false` once the cap is hit.
    pub(crate) fn push(&mut self, url: String) -> bool {
        if self.is_full() {
            return false;
        }
        if !self.urls.contains(&url) {
            self.urls.push(url);
        }
        !self.is_full()
    }

    pub(crate) fn is_full(&self) -> bool {
        self.urls.len() >= self.cap
    }

    pub(crate) fn into_vec(self) -> Vec<String> {
        self.urls
    }
}
