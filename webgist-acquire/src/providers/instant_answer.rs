//! DuckDuckGo Instant Answer API.
//!
//! The [Instant Answer API](https://api.duckduckgo.com/api) returns an
//! abstract source URL for well-known topics and a list of related
//! topics, some nested one level deep in named groups. It is lighter than
//! the HTML scrape but answers far fewer queries.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::block::{BlockDetector, INSTANT_ANSWER_BLOCK_SIGNATURES};
use crate::error::{AcquireError, Result};
use crate::http::{accept, HttpClient};
use crate::provider::ProviderAdapter;
use crate::types::ProviderKind;

use super::Candidates;

/// DuckDuckGo instant-answer adapter.
///
/// Priority 3 provider. The API sometimes answers HTTP 200 with an HTML
/// notice instead of JSON; that is reported as [`AcquireError::Blocked`].
pub struct InstantAnswerAdapter {
    client: HttpClient,
    endpoint: String,
    max_results: usize,
    detector: Box<dyn BlockDetector>,
}

impl InstantAnswerAdapter {
    /// Create an adapter querying `endpoint` (the API base URL).
    pub fn new(client: HttpClient, endpoint: impl Into<String>, max_candidates: usize) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            max_results: max_candidates,
            detector: Box::new(INSTANT_ANSWER_BLOCK_SIGNATURES),
        }
    }

    /// Replace the soft-block detector.
    pub fn with_block_detector(mut self, detector: impl BlockDetector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }
}

#[async_trait]
impl ProviderAdapter for InstantAnswerAdapter {
    fn name(&self) -> &str {
        ProviderKind::DuckDuckGoInstant.name()
    }

    async fn resolve(&self, query: &str) -> Result<Vec<String>> {
        tracing::trace!(query, "DuckDuckGo instant answer lookup");

        let url = Url::parse_with_params(
            &self.endpoint,
            &[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
                ("no_redirect", "1"),
            ],
        )
        .map_err(|e| AcquireError::Config(format!("invalid instant answer endpoint: {e}")))?;

        let body = self
            .client
            .get_text(url.as_str(), accept("application/json"))
            .await?;

        // A body that decodes as an answer is never a block notice.
        let urls = match parse_instant_answer(&body, self.max_results) {
            Ok(urls) => urls,
            Err(_) if self.detector.is_blocked(&body) => {
                return Err(AcquireError::Blocked(
                    "DuckDuckGo instant answer API redirected to the non-JavaScript site".into(),
                ));
            }
            Err(err) => return Err(err),
        };
        if urls.is_empty() {
            return Err(AcquireError::NoResults(
                "DuckDuckGo instant answer had no abstract or related topics".into(),
            ));
        }
        Ok(urls)
    }
}

#[derive(Debug, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

/// Either a plain topic (`FirstURL`) or a named group of topics (`Topics`).
#[derive(Debug, Deserialize)]
struct RelatedTopic {
    #[serde(rename = "FirstURL", default)]
    first_url: Option<String>,
    #[serde(rename = "Topics", default)]
    topics: Vec<RelatedTopic>,
}

impl RelatedTopic {
    fn collect_urls<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(ref url) = self.first_url {
            out.push(url.as_str());
        }
        for topic in &self.topics {
            topic.collect_urls(out);
        }
    }
}

/// Decode an API response into candidate URLs: the abstract source first,
/// then related topics in order, groups flattened.
pub(crate) fn parse_instant_answer(body: &str, max_results: usize) -> Result<Vec<String>> {
    let answer: InstantAnswer = serde_json::from_str(body)
        .map_err(|e| AcquireError::Parse(format!("instant answer JSON: {e}")))?;

    let mut raw = Vec::new();
    if !answer.abstract_url.is_empty() {
        raw.push(answer.abstract_url.as_str());
    }
    for topic in &answer.related_topics {
        topic.collect_urls(&mut raw);
    }

    let mut candidates = Candidates::with_cap(max_results);
    for url in raw {
        let is_web = Url::parse(url)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false);
        if is_web && !candidates.push(url.to_owned()) {
            break;
        }
    }

    let urls = candidates.into_vec();
    tracing::debug!(count = urls.len(), "instant answer parsed");
    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AcquireConfig;
    use wiremock::matchers::{header, method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GIRAFFE_ANSWER: &str = r#"{
        "Heading": "Giraffe",
        "AbstractText": "The giraffe is a large African hoofed mammal.",
        "AbstractURL": "https://en.wikipedia.org/wiki/Giraffe",
        "RelatedTopics": [
            {"FirstURL": "https://duckduckgo.com/Okapi", "Text": "Okapi"},
            {
                "Name": "Subspecies",
                "Topics": [
                    {"FirstURL": "https://duckduckgo.com/Masai_giraffe", "Text": "Masai giraffe"},
                    {"FirstURL": "https://duckduckgo.com/Reticulated_giraffe", "Text": "Reticulated giraffe"}
                ]
            }
        ]
    }"#;

    fn client() -> HttpClient {
        HttpClient::new(&AcquireConfig::default()).expect("client")
    }

    #[test]
    fn abstract_first_then_flattened_topics() {
        let urls = parse_instant_answer(GIRAFFE_ANSWER, 5).expect("should parse");
        assert_eq!(
            urls,
            vec![
                "https://en.wikipedia.org/wiki/Giraffe".to_string(),
                "https://duckduckgo.com/Okapi".to_string(),
                "https://duckduckgo.com/Masai_giraffe".to_string(),
                "https://duckduckgo.com/Reticulated_giraffe".to_string(),
            ]
        );
    }

    #[test]
    fn capped_at_max_results() {
        let urls = parse_instant_answer(GIRAFFE_ANSWER, 2).expect("should parse");
        assert_eq!(urls.len(), 2);
    }

    #[test]
    fn empty_answer_parses_to_nothing() {
        let body = r#"{"Heading": "", "AbstractURL": "", "RelatedTopics": []}"#;
        let urls = parse_instant_answer(body, 3).expect("should parse");
        assert!(urls.is_empty());
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let err = parse_instant_answer("<html>not json</html>", 3).unwrap_err();
        assert_eq!(err.kind(), "parse");
    }

    #[test]
    fn is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InstantAnswerAdapter>();
    }

    #[tokio::test]
    async fn resolves_with_json_accept_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "giraffe"))
            .and(query_param("format", "json"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(GIRAFFE_ANSWER))
            .expect(1)
            .mount(&server)
            .await;

        let adapter = InstantAnswerAdapter::new(client(), format!("{}/", server.uri()), 3);
        let urls = adapter.resolve("giraffe").await.expect("should resolve");
        assert_eq!(urls.len(), 3);
        assert_eq!(urls[0], "https://en.wikipedia.org/wiki/Giraffe");
    }

    #[tokio::test]
    async fn soft_block_on_200_is_blocked() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<html><body>You are being redirected to the non-JavaScript site.</body></html>",
            ))
            .mount(&server)
            .await;

        let adapter = InstantAnswerAdapter::new(client(), format!("{}/", server.uri()), 3);
        let err = adapter.resolve("giraffe").await.unwrap_err();
        assert!(err.is_blocked());
    }

    #[tokio::test]
    async fn notice_wording_inside_json_is_not_a_block() {
        let server = MockServer::start().await;
        let body = r#"{
            "AbstractText": "If this error persists, you are redirected to the non-JavaScript site.",
            "AbstractURL": "https://example.org/noscript-redirects",
            "RelatedTopics": []
        }"#;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let adapter = InstantAnswerAdapter::new(client(), format!("{}/", server.uri()), 3);
        let urls = adapter
            .resolve("redirected to the non-JavaScript site")
            .await
            .expect("decoded answer");
        assert_eq!(urls, vec!["https://example.org/noscript-redirects".to_string()]);
    }

    #[tokio::test]
    async fn unrecognised_non_json_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let adapter = InstantAnswerAdapter::new(client(), format!("{}/", server.uri()), 3);
        let err = adapter.resolve("giraffe").await.unwrap_err();
        assert_eq!(err.kind(), "parse");
    }

    #[tokio::test]
    async fn no_topics_is_no_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"AbstractURL": "", "RelatedTopics": []}"#),
            )
            .mount(&server)
            .await;

        let adapter = InstantAnswerAdapter::new(client(), format!("{}/", server.uri()), 3);
        let err = adapter.resolve("qwxzv").await.unwrap_err();
        assert_eq!(err.kind(), "no_results");
    }

    #[tokio::test]
    #[ignore] // Live test: run with `cargo test -- --ignored`
    async fn live_instant_answer() {
        let adapter = InstantAnswerAdapter::new(client(), "https://api.duckduckgo.com/", 3);
        match adapter.resolve("giraffe").await {
            Ok(urls) => assert!(urls.len() <= 3),
            Err(err) => assert!(
                err.is_blocked() || err.kind() == "no_results",
                "unexpected failure: {err}"
            ),
        }
    }
}
