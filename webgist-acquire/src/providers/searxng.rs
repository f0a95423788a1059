//! SearXNG meta-search: public mirrors tried in order.
//!
//! [SearXNG](https://docs.searxng.org/) instances aggregate several engines
//! behind one results page. Public instances come and go and rate-limit
//! aggressively, so the adapter walks a short mirror list and takes the
//! first instance that answers with usable links.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use scraper::{Html, Selector};
use url::Url;

use crate::block::{BlockDetector, SEARXNG_BLOCK_SIGNATURES};
use crate::error::{AcquireError, Result};
use crate::http::{host_of, HttpClient};
use crate::provider::ProviderAdapter;
use crate::types::ProviderKind;

use super::{has_results, host_matches, url_host_in, Candidates};

/// SearXNG project, documentation and instance-directory hosts.
const SELF_REFERENTIAL_DOMAINS: &[&str] = &["searx.space", "searxng.org", "searx.github.io"];

/// CDN and static-asset hosts that appear in page chrome, never as results.
const STATIC_ASSET_DOMAINS: &[&str] = &[
    "cdnjs.cloudflare.com",
    "cdn.jsdelivr.net",
    "unpkg.com",
    "fonts.googleapis.com",
    "fonts.gstatic.com",
];

/// Advertising and tracking hosts.
const AD_SERVICE_DOMAINS: &[&str] = &[
    "doubleclick.net",
    "googleadservices.com",
    "googlesyndication.com",
    "googletagmanager.com",
    "google-analytics.com",
];

/// Encyclopedia results are left to the Wikipedia adapter.
const RESERVED_DOMAINS: &[&str] = &["wikipedia.org"];

/// Result containers for the simple and oscar themes.
const RESULT_CONTAINER_SELECTOR: &str = "article.result, div.result, #urls";

/// Result-link selectors for the simple and oscar themes.
const RESULT_LINK_SELECTOR: &str = "article.result a[href], div.result a[href], #urls a[href]";

/// SearXNG meta-search adapter.
///
/// Priority 1 provider. Each mirror gets one request; a non-OK status,
/// transport error, block page or empty filtered list moves on to the next.
/// The block detector only sees pages without result containers.
pub struct SearxNgAdapter {
    client: HttpClient,
    instances: Vec<String>,
    max_results: usize,
    detector: Box<dyn BlockDetector>,
}

impl SearxNgAdapter {
    /// Create an adapter over `instances` (base URLs, tried in order).
    pub fn new(client: HttpClient, instances: Vec<String>, max_candidates: usize) -> Self {
        Self {
            client,
            instances,
            max_results: max_candidates,
            detector: Box::new(SEARXNG_BLOCK_SIGNATURES),
        }
    }

    /// Replace the block-page detector.
    pub fn with_block_detector(mut self, detector: impl BlockDetector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    /// Query one mirror.
    async fn query_instance(&self, instance: &str, query: &str) -> Result<Vec<String>> {
        let base = instance.trim_end_matches('/');
        let url = Url::parse_with_params(
            &format!("{base}/search"),
            &[("q", query), ("categories", "general"), ("language", "en")],
        )
        .map_err(|e| AcquireError::Config(format!("invalid SearXNG instance {base}: {e}")))?;

        let html = self.client.get_text(url.as_str(), HeaderMap::new()).await?;

        let listed = has_results(&html, RESULT_CONTAINER_SELECTOR)?;
        if !listed && self.detector.is_blocked(&html) {
            return Err(AcquireError::Blocked(format!(
                "SearXNG instance {} is rate limiting",
                host_of(base)
            )));
        }

        let urls = parse_searxng_html(&html, &host_of(base), self.max_results)?;
        if urls.is_empty() {
            return Err(AcquireError::NoResults(format!(
                "SearXNG instance {} returned no usable links",
                host_of(base)
            )));
        }
        Ok(urls)
    }
}

#[async_trait]
impl ProviderAdapter for SearxNgAdapter {
    fn name(&self) -> &str {
        ProviderKind::SearxNg.name()
    }

    async fn resolve(&self, query: &str) -> Result<Vec<String>> {
        tracing::trace!(query, "SearXNG search");

        let mut failures = Vec::with_capacity(self.instances.len());
        for instance in &self.instances {
            match self.query_instance(instance, query).await {
                Ok(urls) => {
                    tracing::debug!(instance = %host_of(instance), count = urls.len(), "SearXNG instance answered");
                    return Ok(urls);
                }
                Err(err) => {
                    tracing::debug!(
                        instance = %host_of(instance),
                        kind = err.kind(),
                        error = %err,
                        "SearXNG instance failed, trying next mirror"
                    );
                    failures.push(err);
                }
            }
        }

        if !failures.is_empty() && failures.iter().all(AcquireError::is_blocked) {
            return Err(AcquireError::Blocked(format!(
                "all {} SearXNG instances are rate limiting",
                failures.len()
            )));
        }
        let summary = failures
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(AcquireError::NoResults(format!(
            "no SearXNG instance answered: {summary}"
        )))
    }
}

/// Parse a SearXNG results page into candidate URLs.
///
/// Prefers links inside result containers; if the theme is unknown and
/// none match, falls back to every link on the page. Either way the
/// denylists and `instance_host` are filtered out.
pub(crate) fn parse_searxng_html(
    html: &str,
    instance_host: &str,
    max_results: usize,
) -> Result<Vec<String>> {
    let document = Html::parse_document(html);

    let result_sel = Selector::parse(RESULT_LINK_SELECTOR)
        .map_err(|e| AcquireError::Parse(format!("invalid result selector: {e:?}")))?;
    let any_link_sel = Selector::parse("a[href]")
        .map_err(|e| AcquireError::Parse(format!("invalid link selector: {e:?}")))?;

    let scoped: Vec<&str> = document
        .select(&result_sel)
        .filter_map(|el| el.value().attr("href"))
        .collect();
    let hrefs = if scoped.is_empty() {
        document
            .select(&any_link_sel)
            .filter_map(|el| el.value().attr("href"))
            .collect()
    } else {
        scoped
    };

    let mut candidates = Candidates::with_cap(max_results);
    for href in hrefs {
        let Ok(url) = Url::parse(href.trim()) else {
            continue;
        };
        if !matches!(url.scheme(), "http" | "https") || is_denied(&url, instance_host) {
            continue;
        }
        if !candidates.push(url.to_string()) {
            break;
        }
    }

    let urls = candidates.into_vec();
    tracing::debug!(count = urls.len(), "SearXNG results parsed");
    Ok(urls)
}

fn is_denied(url: &Url, instance_host: &str) -> bool {
    let Some(host) = url.host_str() else {
        return true;
    };
    if host_matches(host, &instance_host.to_ascii_lowercase()) {
        return true;
    }
    // The project's own repositories, linked from every page footer.
    if host_matches(host, "github.com") && url.path().to_ascii_lowercase().starts_with("/searx") {
        return true;
    }
    [
        SELF_REFERENTIAL_DOMAINS,
        STATIC_ASSET_DOMAINS,
        AD_SERVICE_DOMAINS,
        RESERVED_DOMAINS,
    ]
    .iter()
    .any(|domains| url_host_in(url, domains))
}
