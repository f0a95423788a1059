//! Input classification: navigable URL or search query.
//!
//! A heuristic, not a URL grammar. Input with no whitespace that looks
//! like `something.tld` is a URL; everything else is searched. Input that
//! names a scheme other than http(s) is never fetched. A query
//! made of one dotted abbreviation ("e.g.", "node.js") can land on the URL
//! side; stricter rules would reject legitimate bare domains, so that case
//! is accepted as a known misclassification.

use std::sync::LazyLock;

use regex::Regex;

/// Minimal domain shape: non-space run, a dot, two or more letters.
static DOMAIN_SHAPE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\S+\.[A-Za-z]{2,}").ok());

/// What the user typed, once classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A navigable URL, already normalised with a scheme.
    Url(String),
    /// Free text to hand to the search providers, trimmed.
    Query(String),
}

/// Classify raw user input as a URL or a search query.
///
/// # Examples
///
/// ```
/// use webgist_acquire::classify::{classify, Input};
///
/// assert_eq!(classify("example.com"), Input::Url("https://example.com".into()));
/// assert_eq!(classify("giraffe height facts"), Input::Query("giraffe height facts".into()));
/// ```
pub fn classify(input: &str) -> Input {
    let trimmed = input.trim();
    let fetchable = scheme_of(trimmed).is_none_or(is_http_scheme);
    if fetchable && looks_like_url(trimmed) {
        Input::Url(normalize_url(trimmed))
    } else {
        Input::Query(trimmed.to_owned())
    }
}

/// Returns `true` if `input` has no whitespace and has a domain shape.
pub fn looks_like_url(input: &str) -> bool {
    if input.is_empty() || input.chars().any(char::is_whitespace) {
        return false;
    }
    DOMAIN_SHAPE
        .as_ref()
        .is_some_and(|re| re.is_match(input))
}

/// Prefix `https://` unless the input already carries a scheme.
///
/// Idempotent: normalising an already-normalised URL returns it unchanged.
/// A non-http scheme is left as it is rather than buried under a prefix.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if scheme_of(trimmed).is_some() {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    }
}

/// The RFC 3986 scheme before `://`, if the input starts with one.
fn scheme_of(input: &str) -> Option<&str> {
    let (scheme, _) = input.split_once("://")?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}

fn is_http_scheme(scheme: &str) -> bool {
    scheme.eq_ignore_ascii_case("https") || scheme.eq_ignore_ascii_case("http")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_url_is_url() {
        assert_eq!(
            classify("https://example.com"),
            Input::Url("https://example.com".into())
        );
    }

    #[test]
    fn bare_domain_gets_https() {
        assert_eq!(
            classify("example.com"),
            Input::Url("https://example.com".into())
        );
        assert_eq!(
            classify("docs.rs/tokio/latest"),
            Input::Url("https://docs.rs/tokio/latest".into())
        );
    }

    #[test]
    fn http_scheme_is_kept() {
        assert_eq!(
            classify("http://example.org/page"),
            Input::Url("http://example.org/page".into())
        );
    }

    #[test]
    fn whitespace_means_query() {
        for input in [
            "giraffe height facts",
            "what is example.com",
            "example.com rocks",
            "https://example.com and more",
            "a\tb.com",
        ] {
            assert!(
                matches!(classify(input), Input::Query(_)),
                "{input:?} classified as URL"
            );
        }
    }

    #[test]
    fn single_word_without_tld_is_query() {
        assert_eq!(classify("giraffe"), Input::Query("giraffe".into()));
        assert_eq!(classify("v1.2"), Input::Query("v1.2".into()));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(
            classify("  example.com \n"),
            Input::Url("https://example.com".into())
        );
        assert_eq!(classify("  rust async  "), Input::Query("rust async".into()));
    }

    #[test]
    fn empty_input_is_empty_query() {
        assert_eq!(classify(""), Input::Query(String::new()));
        assert_eq!(classify("   "), Input::Query(String::new()));
    }

    #[test]
    fn dotted_abbreviation_is_known_misclassification() {
        assert!(matches!(classify("node.js"), Input::Url(_)));
    }

    #[test]
    fn normalisation_prefixes_exactly_once() {
        for input in ["example.com", "https://example.com", "HTTPS://Example.com", "http://a.io"] {
            let once = normalize_url(input);
            let twice = normalize_url(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
            let lower = once.to_ascii_lowercase();
            assert_eq!(lower.matches("://").count(), 1);
            assert!(lower.starts_with("https://") || lower.starts_with("http://"));
        }
    }

    #[test]
    fn foreign_scheme_is_not_prefixed() {
        assert_eq!(normalize_url("ftp://files.example.com"), "ftp://files.example.com");
        assert_eq!(normalize_url("mailto://ops.example.com"), "mailto://ops.example.com");
    }

    #[test]
    fn foreign_scheme_is_searched_not_fetched() {
        assert_eq!(
            classify("ftp://files.example.com"),
            Input::Query("ftp://files.example.com".into())
        );
    }

    #[test]
    fn scheme_lookalike_in_path_still_gets_prefix() {
        assert_eq!(
            classify("docs.rs/search?next=https://x.io"),
            Input::Url("https://docs.rs/search?next=https://x.io".into())
        );
    }

    #[test]
    fn bare_domain_normalises_to_single_https_prefix() {
        let url = normalize_url("example.com");
        assert_eq!(url, "https://example.com");
        assert_eq!(url.matches("https://").count(), 1);
    }
}
