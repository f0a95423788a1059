//! Concurrent fetch stage.
//!
//! Every candidate URL is fetched and extracted concurrently on the
//! calling task. A failed URL is logged and dropped; it never affects its
//! siblings and never fails the stage.

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use url::Url;

use crate::error::{AcquireError, Result};
use crate::extract::extract;
use crate::http::{host_of, HttpClient};
use crate::types::AcquiredContent;

/// Fetch and extract every URL in `urls`, returning only the successes.
///
/// Results keep the order of `urls`. The returned future completes once
/// every fetch has settled.
pub async fn fetch_all(client: &HttpClient, urls: &[String]) -> Vec<AcquiredContent> {
    let futures = urls.iter().map(|url| async move {
        let outcome = fetch_one(client, url).await;
        (url, outcome)
    });
    let outcomes = futures::future::join_all(futures).await;

    let mut contents = Vec::with_capacity(outcomes.len());
    for (url, outcome) in outcomes {
        match outcome {
            Ok(content) => contents.push(content),
            Err(err) => {
                tracing::warn!(host = %host_of(url), kind = err.kind(), error = %err, "fetch failed");
            }
        }
    }

    tracing::debug!(
        requested = urls.len(),
        fetched = contents.len(),
        "fetch stage settled"
    );
    contents
}

/// Fetch one URL and extract it into an [`AcquiredContent`].
///
/// # Errors
///
/// Returns [`AcquireError::Http`] on transport failure or non-2xx status,
/// and [`AcquireError::Parse`] when the response is not a text document or
/// extraction finds no visible text.
pub async fn fetch_one(client: &HttpClient, url: &str) -> Result<AcquiredContent> {
    let response = client.get(url, HeaderMap::new()).await?;

    let status = response.status();
    if !status.is_success() {
        return Err(AcquireError::Http(format!(
            "{} returned status {status}",
            host_of(url)
        )));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_ascii_lowercase);
    if let Some(ref ct) = content_type {
        if !is_textual(ct) {
            return Err(AcquireError::Parse(format!(
                "{} served non-text content ({ct})",
                host_of(url)
            )));
        }
    }

    let body = response
        .text()
        .await
        .map_err(|e| AcquireError::Http(format!("{} body read failed: {e}", host_of(url))))?;

    let page = extract(&body);
    if page.content.is_empty() {
        return Err(AcquireError::Parse(format!(
            "{} has no visible text",
            host_of(url)
        )));
    }

    let canonical = resolve_canonical(url, &page.url);
    Ok(AcquiredContent {
        title: page.title,
        content: page.content,
        url: canonical,
    })
}

/// The page's canonical URL resolved against `requested`, or `requested`
/// itself when the page declares none (or an unusable one).
fn resolve_canonical(requested: &str, canonical: &str) -> String {
    if canonical.is_empty() {
        return requested.to_owned();
    }
    Url::parse(requested)
        .and_then(|base| base.join(canonical))
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .map(String::from)
        .unwrap_or_else(|| requested.to_owned())
}

fn is_textual(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or("").trim();
    mime.starts_with("text/")
        || mime == "application/xhtml+xml"
        || mime == "application/xml"
        || mime.ends_with("+xml")
}
