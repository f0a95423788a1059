//! Wikipedia opensearch API.
//!
//! `action=opensearch` answers with a four-element array:
//! `[query, [titles], [descriptions], [urls]]`. Only the fourth element
//! is used.

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::{AcquireError, Result};
use crate::http::{accept, HttpClient};
use crate::provider::ProviderAdapter;
use crate::types::ProviderKind;

use super::Candidates;

/// Wikipedia article search adapter.
///
/// Priority 4 provider. Needs no block detection: the API is public and
/// does not serve challenge pages.
pub struct WikipediaAdapter {
    client: HttpClient,
    endpoint: String,
    max_results: usize,
}

impl WikipediaAdapter {
    /// Create an adapter querying `endpoint` (an `api.php` URL).
    pub fn new(client: HttpClient, endpoint: impl Into<String>, max_candidates: usize) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            max_results: max_candidates,
        }
    }
}

#[async_trait]
impl ProviderAdapter for WikipediaAdapter {
    fn name(&self) -> &str {
        ProviderKind::Wikipedia.name()
    }

    async fn resolve(&self, query: &str) -> Result<Vec<String>> {
        tracing::trace!(query, "Wikipedia opensearch");

        let limit = self.max_results.to_string();
        let url = Url::parse_with_params(
            &self.endpoint,
            &[
                ("action", "opensearch"),
                ("search", query),
                ("limit", limit.as_str()),
                ("namespace", "0"),
                ("format", "json"),
            ],
        )
        .map_err(|e| AcquireError::Config(format!("invalid Wikipedia endpoint: {e}")))?;

        let body = self
            .client
            .get_text(url.as_str(), accept("application/json"))
            .await?;

        let urls = parse_opensearch(&body, self.max_results)?;
        if urls.is_empty() {
            return Err(AcquireError::NoResults(
                "Wikipedia opensearch matched no articles".into(),
            ));
        }
        Ok(urls)
    }
}

/// Pull the `https://` article URLs out of an opensearch response.
pub(crate) fn parse_opensearch(body: &str, max_results: usize) -> Result<Vec<String>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| AcquireError::Parse(format!("opensearch JSON: {e}")))?;

    let links = value
        .as_array()
        .and_then(|parts| parts.get(3))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            AcquireError::Parse("opensearch response is not a four-element array".into())
        })?;

    let mut candidates = Candidates::with_cap(max_results);
    for link in links.iter().filter_map(Value::as_str) {
        if link.starts_with("https://") && !candidates.push(link.to_owned()) {
            break;
        }
    }

    let urls = candidates.into_vec();
    tracing::debug!(count = urls.len(), "opensearch parsed");
    Ok(urls)
}
