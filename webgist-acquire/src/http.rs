//! Outbound HTTP with browser-like request shaping.
//!
//! Every request carries a realistic browser header set and a User-Agent
//! drawn at random from a fixed pool, so a burst of calls does not share
//! one fingerprint. Callers may override any default header. There is no
//! retry and no rate limiting here: one call is one best-effort request.

use std::time::Duration;

use rand::seq::SliceRandom;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};

use crate::config::AcquireConfig;
use crate::error::{AcquireError, Result};

/// A browser signature: User-Agent plus the client hints that browser sends.
#[derive(Debug, Clone, Copy)]
pub struct BrowserProfile {
    /// `User-Agent` header value.
    pub user_agent: &'static str,
    /// `Sec-CH-UA` brand list. Firefox sends no client hints.
    pub sec_ch_ua: Option<&'static str>,
    /// `Sec-CH-UA-Platform` value.
    pub platform: Option<&'static str>,
}

/// Realistic browser profiles, one chosen per request.
const BROWSER_PROFILES: &[BrowserProfile] = &[
    BrowserProfile {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
        sec_ch_ua: Some(r#""Google Chrome";v="131", "Chromium";v="131", "Not_A Brand";v="24""#),
        platform: Some(r#""Windows""#),
    },
    BrowserProfile {
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
        sec_ch_ua: Some(r#""Google Chrome";v="131", "Chromium";v="131", "Not_A Brand";v="24""#),
        platform: Some(r#""macOS""#),
    },
    BrowserProfile {
        user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
        sec_ch_ua: Some(r#""Google Chrome";v="131", "Chromium";v="131", "Not_A Brand";v="24""#),
        platform: Some(r#""Linux""#),
    },
    BrowserProfile {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 Edg/131.0.0.0",
        sec_ch_ua: Some(r#""Microsoft Edge";v="131", "Chromium";v="131", "Not_A Brand";v="24""#),
        platform: Some(r#""Windows""#),
    },
    BrowserProfile {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
        sec_ch_ua: None,
        platform: None,
    },
    BrowserProfile {
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
        sec_ch_ua: None,
        platform: None,
    },
    BrowserProfile {
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.1 Safari/605.1.15",
        sec_ch_ua: None,
        platform: None,
    },
];

/// Select a random browser profile from the rotation pool.
pub fn random_profile() -> BrowserProfile {
    let mut rng = rand::thread_rng();
    BROWSER_PROFILES
        .choose(&mut rng)
        .copied()
        // SAFETY: BROWSER_PROFILES is a non-empty const array, choose only returns None on empty slices
        .unwrap_or(BROWSER_PROFILES[0])
}

/// Select a random User-Agent string from the rotation pool.
pub fn random_user_agent() -> &'static str {
    random_profile().user_agent
}

/// HTTP client that shapes every request like a browser navigation.
///
/// Holds no cookies and no per-session identity; cloning is cheap and
/// clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    fixed_user_agent: Option<HeaderValue>,
}

impl HttpClient {
    /// Build a client from acquisition config.
    ///
    /// The client has:
    /// - Timeout from config, applied to every request
    /// - Brotli and gzip decompression
    /// - Up to 10 redirects followed
    /// - No cookie store, so calls never share a session
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError::Config`] if the configured User-Agent is not a
    /// valid header value, or [`AcquireError::Http`] if the client cannot be
    /// constructed.
    pub fn new(config: &AcquireConfig) -> Result<Self> {
        let fixed_user_agent = match config.user_agent {
            Some(ref custom) => Some(
                HeaderValue::from_str(custom)
                    .map_err(|e| AcquireError::Config(format!("invalid user_agent: {e}")))?,
            ),
            None => None,
        };

        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| AcquireError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner,
            fixed_user_agent,
        })
    }

    /// The default header set for one request, with a freshly rotated identity.
    pub fn browser_headers(&self) -> HeaderMap {
        let profile = random_profile();
        let mut headers = HeaderMap::new();

        let user_agent = match self.fixed_user_agent {
            Some(ref ua) => ua.clone(),
            None => HeaderValue::from_static(profile.user_agent),
        };
        headers.insert(header::USER_AGENT, user_agent);
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(header::DNT, HeaderValue::from_static("1"));
        headers.insert(
            header::UPGRADE_INSECURE_REQUESTS,
            HeaderValue::from_static("1"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-dest"),
            HeaderValue::from_static("document"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-mode"),
            HeaderValue::from_static("navigate"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-site"),
            HeaderValue::from_static("none"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-user"),
            HeaderValue::from_static("?1"),
        );

        // Client hints must describe the same browser as the User-Agent.
        let hints = match self.fixed_user_agent {
            Some(_) => None,
            None => profile.sec_ch_ua.zip(profile.platform),
        };
        if let Some((brands, platform)) = hints {
            headers.insert(
                HeaderName::from_static("sec-ch-ua"),
                HeaderValue::from_static(brands),
            );
            headers.insert(
                HeaderName::from_static("sec-ch-ua-mobile"),
                HeaderValue::from_static("?0"),
            );
            headers.insert(
                HeaderName::from_static("sec-ch-ua-platform"),
                HeaderValue::from_static(platform),
            );
        }

        headers
    }

    /// Send one GET request with browser headers, `overrides` taking precedence.
    ///
    /// The response is returned whatever its status; callers decide what a
    /// non-success status means for them.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError::Http`] on connection failure or timeout.
    pub async fn get(&self, url: &str, overrides: HeaderMap) -> Result<reqwest::Response> {
        let mut headers = self.browser_headers();
        for (name, value) in &overrides {
            headers.insert(name.clone(), value.clone());
        }

        self.inner
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AcquireError::Http(format!("request to {} timed out", host_of(url)))
                } else {
                    AcquireError::Http(format!("request to {} failed: {e}", host_of(url)))
                }
            })
    }

    /// GET `url` and return the body as text, failing on a non-success status.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError::Http`] on transport failure, non-2xx status or
    /// an unreadable body.
    pub async fn get_text(&self, url: &str, overrides: HeaderMap) -> Result<String> {
        let response = self.get(url, overrides).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AcquireError::Http(format!(
                "{} returned status {status}",
                host_of(url)
            )));
        }
        response
            .text()
            .await
            .map_err(|e| AcquireError::Http(format!("{} body read failed: {e}", host_of(url))))
    }
}

/// Host part of `url` for log and error messages, without path or query.
pub(crate) fn host_of(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| "<invalid url>".to_owned())
}

/// A single-entry override map, for the common "just change Accept" case.
pub fn accept(value: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static(value));
    headers
}
