//! Trait definition for pluggable search provider adapters.
//!
//! Each provider (SearXNG, DuckDuckGo, the instant-answer API, Wikipedia)
//! implements [`ProviderAdapter`] to turn a free-text query into a short,
//! ranked list of candidate URLs.

use async_trait::async_trait;

use crate::error::Result;

/// A search backend that resolves a query to candidate URLs.
///
/// Implementors own their whole request/parse cycle:
///
/// - URL construction with query encoding
/// - HTTP request through the shared [`crate::http::HttpClient`]
/// - block-page detection via a [`crate::block::BlockDetector`]
/// - extraction, filtering, deduplication and capping of URLs
///
/// "Usable" is adapter-specific, but every implementation must return
/// `Err` rather than `Ok(vec![])` when it has nothing usable, so the
/// orchestrator can tell failure from success. Implementations are
/// object-safe so adapter lists stay open-ended.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Human-readable provider name, used in logs and error summaries.
    fn name(&self) -> &str;

    /// Resolve `query` to at most the configured number of candidate URLs.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AcquireError::Blocked`] when an anti-automation page
    /// is detected, [`crate::AcquireError::NoResults`] when the response
    /// holds no usable URL, and [`crate::AcquireError::Http`] /
    /// [`crate::AcquireError::Parse`] for transport and decoding failures.
    async fn resolve(&self, query: &str) -> Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AcquireError;

    /// A canned adapter for exercising trait-object dispatch.
    struct FixedAdapter {
        urls: Vec<String>,
    }

    #[async_trait]
    impl ProviderAdapter for FixedAdapter {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn resolve(&self, _query: &str) -> Result<Vec<String>> {
            if self.urls.is_empty() {
                return Err(AcquireError::NoResults("fixed adapter is empty".into()));
            }
            Ok(self.urls.clone())
        }
    }

    #[test]
    fn adapter_is_object_safe_and_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn ProviderAdapter>();
        let _boxed: Box<dyn ProviderAdapter> = Box::new(FixedAdapter { urls: vec![] });
    }

    #[tokio::test]
    async fn boxed_adapter_resolves() {
        let adapter: Box<dyn ProviderAdapter> = Box::new(FixedAdapter {
            urls: vec!["https://example.com".into()],
        });
        let urls = adapter.resolve("anything").await.expect("should resolve");
        assert_eq!(urls, vec!["https://example.com".to_string()]);
        assert_eq!(adapter.name(), "fixed");
    }

    #[tokio::test]
    async fn empty_adapter_fails_instead_of_returning_nothing() {
        let adapter = FixedAdapter { urls: vec![] };
        let err = adapter.resolve("anything").await.unwrap_err();
        assert_eq!(err.kind(), "no_results");
    }
}
