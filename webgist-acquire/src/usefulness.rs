//! Usefulness filter for acquired content.
//!
//! Acquisition keeps every page that fetched and extracted. Many of those
//! are error pages, cookie walls or JavaScript shells with a little text.
//! Callers apply [`UsefulnessPolicy`] before spending model tokens on them.

use serde::{Deserialize, Serialize};

use crate::types::AcquiredContent;

/// Phrases that mark a page as an error, placeholder or interstitial.
pub const DEFAULT_DENY_PHRASES: &[&str] = &[
    "page not found",
    "404 not found",
    "403 forbidden",
    "access denied",
    "enable javascript",
    "javascript is disabled",
    "please turn javascript on",
    "just a moment",
    "checking your browser",
    "are you a robot",
    "verify you are human",
    "this site can't be reached",
    "domain is for sale",
];

/// How much of the content is scanned for deny phrases. Error wording sits
/// near the top of a page; long articles may quote it further down.
const DENY_SCAN_CHARS: usize = 500;

/// Thresholds deciding whether acquired content is worth summarising.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsefulnessPolicy {
    /// Minimum trimmed content length, in characters.
    pub min_chars: usize,
    /// Case-insensitive phrases that disqualify a page when they appear in
    /// its title or opening text.
    pub deny_phrases: Vec<String>,
}

impl Default for UsefulnessPolicy {
    fn default() -> Self {
        Self {
            min_chars: 200,
            deny_phrases: DEFAULT_DENY_PHRASES
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
        }
    }
}

impl UsefulnessPolicy {
    /// Returns `true` if `content` is long enough and not an error page.
    pub fn is_useful(&self, content: &AcquiredContent) -> bool {
        let text = content.content.trim();
        if text.chars().count() < self.min_chars {
            return false;
        }
        self.denied_phrase(content).is_none()
    }

    /// The first deny phrase found in the title or opening text, if any.
    pub fn denied_phrase(&self, content: &AcquiredContent) -> Option<&str> {
        let opening: String = content.content.trim().chars().take(DENY_SCAN_CHARS).collect();
        let haystack = format!("{}\n{}", content.title, opening).to_lowercase();
        self.deny_phrases
            .iter()
            .map(String::as_str)
            .find(|phrase| haystack.contains(&phrase.to_lowercase()))
    }

    /// Keep only useful records, preserving order.
    pub fn filter(&self, contents: Vec<AcquiredContent>) -> Vec<AcquiredContent> {
        let before = contents.len();
        let kept: Vec<_> = contents.into_iter().filter(|c| self.is_useful(c)).collect();
        tracing::debug!(before, after = kept.len(), "usefulness filter applied");
        kept
    }
}

/// [`UsefulnessPolicy::is_useful`] with the default policy.
pub fn is_useful(content: &AcquiredContent) -> bool {
    UsefulnessPolicy::default().is_useful(content)
}
