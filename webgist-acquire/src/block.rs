//! Block-page detection.
//!
//! A provider can answer with HTTP 200 and still not be answering: it may
//! serve a CAPTCHA, an "unusual traffic" interstitial or a "please enable
//! JavaScript" notice. Each adapter holds a [`BlockDetector`] so the
//! wording it matches can be swapped without touching the adapter or the
//! orchestrator.

use std::fmt;

/// Decides whether a raw response body is an anti-automation page.
pub trait BlockDetector: Send + Sync {
    /// Returns `true` if `body` is a block/challenge page rather than content.
    fn is_blocked(&self, body: &str) -> bool;
}

impl<F> BlockDetector for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_blocked(&self, body: &str) -> bool {
        self(body)
    }
}

/// Case-insensitive phrase matching against a fixed signature list.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PhraseSignatures(pub &'static [&'static str]);

impl PhraseSignatures {
    /// Returns the first signature found in `body`, if any.
    pub fn find(&self, body: &str) -> Option<&'static str> {
        let lowered = body.to_lowercase();
        self.0
            .iter()
            .copied()
            .find(|sig| lowered.contains(&sig.to_lowercase()))
    }
}

impl BlockDetector for PhraseSignatures {
    fn is_blocked(&self, body: &str) -> bool {
        self.find(body).is_some()
    }
}

impl fmt::Debug for PhraseSignatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhraseSignatures({} phrases)", self.0.len())
    }
}

/// DuckDuckGo HTML challenge page ("anomaly" modal) wording.
pub const DUCKDUCKGO_BLOCK_SIGNATURES: PhraseSignatures = PhraseSignatures(&[
    "anomaly-modal",
    "Unfortunately, bots use DuckDuckGo too",
    "Please complete the following challenge",
    "confirm this search was made by a human",
    "If this persists, please email us",
]);

/// DuckDuckGo instant-answer soft block: a textual redirect to the
/// non-JavaScript site instead of JSON.
pub const INSTANT_ANSWER_BLOCK_SIGNATURES: PhraseSignatures = PhraseSignatures(&[
    "redirected to the non-JavaScript site",
    "If this error persists",
]);

/// SearXNG rate-limit and bot-protection pages.
pub const SEARXNG_BLOCK_SIGNATURES: PhraseSignatures = PhraseSignatures(&[
    "Too Many Requests",
    "rate limit exceeded",
    "Please solve the captcha",
    "checking your browser",
]);

/// A detector that never reports a block.
pub fn never_blocked(_body: &str) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrase_match_is_case_insensitive() {
        let sigs = PhraseSignatures(&["Unusual Traffic"]);
        assert!(sigs.is_blocked("<p>we detected unusual traffic from your network</p>"));
        assert!(!sigs.is_blocked("<p>regular results</p>"));
    }

    #[test]
    fn find_reports_matched_signature() {
        let page = "<div class=\"anomaly-modal__title\">Unfortunately, bots use DuckDuckGo too.</div>";
        assert_eq!(DUCKDUCKGO_BLOCK_SIGNATURES.find(page), Some("anomaly-modal"));
    }

    #[test]
    fn instant_answer_notice_detected() {
        let body = "If this error persists, please let us know: you are being redirected to the non-JavaScript site.";
        assert!(INSTANT_ANSWER_BLOCK_SIGNATURES.is_blocked(body));
        assert!(!INSTANT_ANSWER_BLOCK_SIGNATURES.is_blocked(r#"{"AbstractURL":""}"#));
    }

    #[test]
    fn closures_are_detectors() {
        let detector = |body: &str| body.starts_with("CAPTCHA");
        assert!(detector.is_blocked("CAPTCHA required"));
        assert!(!detector.is_blocked("results"));
    }

    #[test]
    fn never_blocked_accepts_anything() {
        assert!(!never_blocked("anomaly-modal"));
        let boxed: Box<dyn BlockDetector> = Box::new(never_blocked);
        assert!(!boxed.is_blocked("Too Many Requests"));
    }

    #[test]
    fn signature_lists_are_not_empty() {
        assert!(!DUCKDUCKGO_BLOCK_SIGNATURES.0.is_empty());
        assert!(!INSTANT_ANSWER_BLOCK_SIGNATURES.0.is_empty());
        assert!(!SEARXNG_BLOCK_SIGNATURES.0.is_empty());
    }
}
