//! Last-resort candidate URLs built from the query text alone.
//!
//! No network access. The guesses are plausible rather than verified; the
//! fetch stage drops whichever of them do not resolve.

/// Heuristic URL constructor used when every real provider has failed.
///
/// Produces, in order: an encyclopedia article guess, a naive `.com`
/// domain guess and a discussion-forum search link. Never returns an
/// empty list.
#[derive(Debug, Clone)]
pub struct EmergencyConstructor {
    max_results: usize,
}

impl EmergencyConstructor {
    /// Create a constructor returning at most `max_candidates` URLs.
    pub fn new(max_candidates: usize) -> Self {
        Self {
            max_results: max_candidates.max(1),
        }
    }

    /// Build candidate URLs for `query`.
    pub fn construct(&self, query: &str) -> Vec<String> {
        let tokens = tokenize(query);
        let mut urls = Vec::with_capacity(3);

        if let Some(first) = tokens.first() {
            urls.push(format!(
                "https://en.wikipedia.org/wiki/{}",
                capitalize(first)
            ));
            urls.push(format!("https://www.{first}.com"));
            urls.push(forum_search(&tokens.join(" ")));
        } else {
            urls.push(forum_search(query.trim()));
        }

        urls.truncate(self.max_results);
        tracing::debug!(count = urls.len(), "emergency candidates constructed");
        urls
    }
}

/// Lower-cased alphanumeric words longer than two characters.
fn tokenize(query: &str) -> Vec<String> {
    query
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .filter(|token| token.chars().count() > 2)
        .map(str::to_owned)
        .collect()
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn forum_search(terms: &str) -> String {
    format!(
        "https://www.reddit.com/search/?q={}",
        urlencoding::encode(terms)
    )
}
