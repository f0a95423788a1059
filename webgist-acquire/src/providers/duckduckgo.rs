//! DuckDuckGo HTML results scrape.
//!
//! Uses the HTML-only endpoint at `https://html.duckduckgo.com/html/`,
//! which needs no JavaScript. Result links come in two shapes: redirect
//! wrappers (`//duckduckgo.com/l/?uddg=<encoded target>`) and bare
//! outbound links. Both are collected in page order.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use scraper::{Html, Selector};
use url::Url;

use crate::block::{BlockDetector, DUCKDUCKGO_BLOCK_SIGNATURES};
use crate::error::{AcquireError, Result};
use crate::http::HttpClient;
use crate::provider::ProviderAdapter;
use crate::types::ProviderKind;

use super::{has_results, url_host_in, Candidates};

/// This adapter never returns more than three URLs.
pub const DUCKDUCKGO_MAX_RESULTS: usize = 3;

/// Hosts never returned as candidates: the provider itself and video sharing.
const EXCLUDED_DOMAINS: &[&str] = &["duckduckgo.com", "youtube.com", "youtu.be"];

/// Result containers on the HTML endpoint.
const RESULT_CONTAINER_SELECTOR: &str = "div.result, div.web-result, a.result__a";

/// DuckDuckGo HTML search scraper.
///
/// Priority 2 provider. Block pages are reported as
/// [`AcquireError::Blocked`], never as an empty success, so logs can tell
/// "no results" from "detected as automation".
pub struct DuckDuckGoAdapter {
    client: HttpClient,
    endpoint: String,
    max_results: usize,
    detector: Box<dyn BlockDetector>,
}

impl DuckDuckGoAdapter {
    /// Create an adapter querying `endpoint` (the HTML results URL).
    pub fn new(client: HttpClient, endpoint: impl Into<String>, max_candidates: usize) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            max_results: max_candidates.min(DUCKDUCKGO_MAX_RESULTS),
            detector: Box::new(DUCKDUCKGO_BLOCK_SIGNATURES),
        }
    }

    /// Replace the block-page detector.
    pub fn with_block_detector(mut self, detector: impl BlockDetector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    /// Extract the target URL from a result link.
    ///
    /// DDG wraps URLs like: `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`
    /// The `uddg` parameter is URL-decoded. Bare `http(s)` links are returned
    /// as-is; anything else (anchors, javascript:, relative pages) is `None`.
    fn extract_url(href: &str) -> Option<String> {
        let full_href = if href.starts_with("//") {
            format!("https:{href}")
        } else if href.starts_with('/') {
            format!("https://duckduckgo.com{href}")
        } else {
            href.to_owned()
        };

        let parsed = Url::parse(&full_href).ok()?;

        let is_redirect = parsed
            .host_str()
            .is_some_and(|h| super::host_matches(h, "duckduckgo.com"))
            && parsed.path().starts_with("/l/");

        if is_redirect {
            parsed
                .query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, value)| value.into_owned())
                .filter(|target| target.starts_with("http://") || target.starts_with("https://"))
        } else if matches!(parsed.scheme(), "http" | "https") {
            Some(full_href)
        } else {
            None
        }
    }
}

#[async_trait]
impl ProviderAdapter for DuckDuckGoAdapter {
    fn name(&self) -> &str {
        ProviderKind::DuckDuckGoHtml.name()
    }

    async fn resolve(&self, query: &str) -> Result<Vec<String>> {
        tracing::trace!(query, "DuckDuckGo search");

        let url = Url::parse_with_params(&self.endpoint, &[("q", query)])
            .map_err(|e| AcquireError::Config(format!("invalid DuckDuckGo endpoint: {e}")))?;

        let html = self.client.get_text(url.as_str(), HeaderMap::new()).await?;

        tracing::trace!(bytes = html.len(), "DuckDuckGo response received");

        let listed = has_results(&html, RESULT_CONTAINER_SELECTOR)?;
        if !listed && self.detector.is_blocked(&html) {
            return Err(AcquireError::Blocked(
                "DuckDuckGo served an anti-automation challenge".into(),
            ));
        }

        let urls = parse_duckduckgo_html(&html, self.max_results)?;
        if urls.is_empty() {
            return Err(AcquireError::NoResults(
                "DuckDuckGo page held no result links".into(),
            ));
        }
        Ok(urls)
    }
}

/// Parse a DuckDuckGo HTML results page into candidate URLs.
///
/// Extracted as a separate function for testability with mock HTML.
pub(crate) fn parse_duckduckgo_html(html: &str, max_results: usize) -> Result<Vec<String>> {
    let document = Html::parse_document(html);

    let link_sel = Selector::parse("a[href]")
        .map_err(|e| AcquireError::Parse(format!("invalid link selector: {e:?}")))?;

    let mut candidates = Candidates::with_cap(max_results);

    for element in document.select(&link_sel) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(target) = DuckDuckGoAdapter::extract_url(href.trim()) else {
            continue;
        };

        let excluded = Url::parse(&target)
            .map(|u| url_host_in(&u, EXCLUDED_DOMAINS))
            .unwrap_or(true);
        if excluded {
            continue;
        }

        if !candidates.push(target) {
            break;
        }
    }

    let urls = candidates.into_vec();
    tracing::debug!(count = urls.len(), "DuckDuckGo results parsed");
    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AcquireConfig;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MOCK_DDG_HTML: &str = r#"<!DOCTYPE html>
<html>
<body>
<div class="header"><a href="https://duckduckgo.com/">DuckDuckGo</a></div>
<div class="result results_links results_links_deep web-result">
    <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F&amp;rut=abc123">
        Rust Programming Language
    </a>
    <a class="result__url" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F&amp;rut=abc123">www.rust-lang.org</a>
</div>
<div class="result results_links results_links_deep web-result">
    <a class="result__a" href="https://www.youtube.com/watch?v=abc">Rust in 100 seconds</a>
</div>
<div class="result results_links results_links_deep web-result">
    <a class="result__a" href="https://doc.rust-lang.org/book/">The Rust Programming Language Book</a>
</div>
<div class="result results_links results_links_deep web-result">
    <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fen.wikipedia.org%2Fwiki%2FRust_(programming_language)&amp;rut=def456">
        Rust (programming language) - Wikipedia
    </a>
</div>
<div class="result results_links results_links_deep web-result">
    <a class="result__a" href="https://crates.io/">crates.io</a>
</div>
</body>
</html>"#;

    const BLOCK_PAGE_HTML: &str = r#"<!DOCTYPE html>
<html><body>
<div class="anomaly-modal__mask">
  <div class="anomaly-modal__title">Unfortunately, bots use DuckDuckGo too.</div>
  <div class="anomaly-modal__description">Please complete the following challenge to confirm this search was made by a human.</div>
</div>
</body></html>"#;

    fn adapter_for(server: &MockServer) -> DuckDuckGoAdapter {
        let client = HttpClient::new(&AcquireConfig::default()).expect("client");
        DuckDuckGoAdapter::new(client, format!("{}/html/", server.uri()), 3)
    }

    #[test]
    fn extract_url_from_ddg_redirect() {
        let href = "//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fpage&rut=abc";
        let result = DuckDuckGoAdapter::extract_url(href);
        assert_eq!(result, Some("https://example.com/page".to_string()));
    }

    #[test]
    fn extract_url_from_relative_redirect() {
        let href = "/l/?uddg=https%3A%2F%2Fexample.com%2F&rut=abc";
        let result = DuckDuckGoAdapter::extract_url(href);
        assert_eq!(result, Some("https://example.com/".to_string()));
    }

    #[test]
    fn extract_url_direct_link() {
        let href = "https://example.com/direct";
        let result = DuckDuckGoAdapter::extract_url(href);
        assert_eq!(result, Some("https://example.com/direct".to_string()));
    }

    #[test]
    fn extract_url_rejects_non_http() {
        assert!(DuckDuckGoAdapter::extract_url("javascript:void(0)").is_none());
        assert!(DuckDuckGoAdapter::extract_url("mailto:a@b.c").is_none());
        assert!(DuckDuckGoAdapter::extract_url("not-a-url").is_none());
    }

    #[test]
    fn parse_mock_html_decodes_dedups_and_filters() {
        let results = parse_duckduckgo_html(MOCK_DDG_HTML, 10).expect("should parse");
        assert_eq!(
            results,
            vec![
                "https://www.rust-lang.org/".to_string(),
                "https://doc.rust-lang.org/book/".to_string(),
                "https://en.wikipedia.org/wiki/Rust_(programming_language)".to_string(),
                "https://crates.io/".to_string(),
            ]
        );
    }

    #[test]
    fn parse_respects_max_results() {
        let results = parse_duckduckgo_html(MOCK_DDG_HTML, 2).expect("should parse");
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn parse_empty_html_returns_empty() {
        let results = parse_duckduckgo_html("<html><body></body></html>", 10).expect("should parse");
        assert!(results.is_empty());
    }

    #[test]
    fn adapter_caps_at_three_even_with_larger_config() {
        let client = HttpClient::new(&AcquireConfig::default()).expect("client");
        let adapter = DuckDuckGoAdapter::new(client, "https://html.duckduckgo.com/html/", 5);
        assert_eq!(adapter.max_results, DUCKDUCKGO_MAX_RESULTS);
    }

    #[test]
    fn is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DuckDuckGoAdapter>();
    }

    #[tokio::test]
    async fn resolve_returns_first_three_links() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/html/"))
            .and(query_param("q", "rust programming"))
            .respond_with(ResponseTemplate::new(200).set_body_string(MOCK_DDG_HTML))
            .expect(1)
            .mount(&server)
            .await;

        let urls = adapter_for(&server)
            .resolve("rust programming")
            .await
            .expect("should resolve");
        assert_eq!(urls.len(), 3);
        assert_eq!(urls[0], "https://www.rust-lang.org/");
    }

    #[tokio::test]
    async fn block_page_is_a_failure_not_an_empty_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(BLOCK_PAGE_HTML))
            .mount(&server)
            .await;

        let err = adapter_for(&server).resolve("anything").await.unwrap_err();
        assert!(err.is_blocked(), "expected Blocked, got {err}");
    }

    #[tokio::test]
    async fn challenge_wording_in_result_snippets_is_not_a_block() {
        let server = MockServer::start().await;
        let page = r#"<html><head><title>anomaly-modal at DuckDuckGo</title></head><body>
<form><input name="q" value="anomaly-modal If this persists, please email us"></form>
<div class="result results_links web-result">
    <a class="result__a" href="https://example.org/ddg-anomaly-modal">Why DuckDuckGo shows anomaly-modal</a>
    <a class="result__snippet">The page ends with "If this persists, please email us".</a>
</div>
</body></html>"#;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page))
            .mount(&server)
            .await;

        let urls = adapter_for(&server)
            .resolve("anomaly-modal If this persists, please email us")
            .await
            .expect("a results page is not a block page");
        assert_eq!(urls, vec!["https://example.org/ddg-anomaly-modal".to_string()]);
    }

    #[tokio::test]
    async fn page_without_links_is_no_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body>No results.</body></html>"),
            )
            .mount(&server)
            .await;

        let err = adapter_for(&server).resolve("zzzz").await.unwrap_err();
        assert_eq!(err.kind(), "no_results");
    }

    #[tokio::test]
    async fn custom_detector_replaces_signatures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(BLOCK_PAGE_HTML))
            .mount(&server)
            .await;

        let adapter = adapter_for(&server).with_block_detector(crate::block::never_blocked);
        let err = adapter.resolve("anything").await.unwrap_err();
        // No block detected, and the challenge page has no outbound links.
        assert_eq!(err.kind(), "no_results");
    }

    #[tokio::test]
    async fn server_error_is_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = adapter_for(&server).resolve("anything").await.unwrap_err();
        assert_eq!(err.kind(), "http");
    }

    #[tokio::test]
    #[ignore] // Live test: run with `cargo test -- --ignored`
    async fn live_duckduckgo_search() {
        let client = HttpClient::new(&AcquireConfig::default()).expect("client");
        let adapter = DuckDuckGoAdapter::new(client, "https://html.duckduckgo.com/html/", 3);
        match adapter.resolve("rust programming").await {
            Ok(urls) => {
                assert!(!urls.is_empty());
                assert!(urls.len() <= 3);
            }
            Err(err) => assert!(err.is_blocked(), "unexpected failure: {err}"),
        }
    }
}
