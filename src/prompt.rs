//! Prompt assembly for summarisation and direct answers.
//!
//! Acquired pages are numbered so the model can refer to them, and the
//! combined text is held to a character budget derived from a token
//! budget. Each source gets an equal share; a short source does not lend
//! its unused share to the others.

use webgist_acquire::AcquiredContent;

/// Rough characters-per-token ratio for English prose.
pub const CHARS_PER_TOKEN: usize = 4;

/// System prompt shared by both answer paths.
pub const SYSTEM_PROMPT: &str = "You are a careful research assistant. \
Answer concisely and factually. When sources are provided, rely on them and \
cite them by number like [1]. If the sources do not answer the question, say so.";

const TRUNCATION_MARKER: &str = " …";

/// Build the user prompt asking for a summary grounded in `sources`.
pub fn sources_prompt(input: &str, sources: &[AcquiredContent], max_tokens: usize) -> String {
    let per_source = source_budget(sources.len(), max_tokens);

    let mut prompt = format!("Request: {}\n\nSources:\n", input.trim());
    for (i, source) in sources.iter().enumerate() {
        let text = truncate_chars(&collapse_whitespace(&source.content), per_source);
        let title = if source.title.trim().is_empty() {
            "(untitled)"
        } else {
            source.title.trim()
        };
        prompt.push_str(&format!(
            "\n[{}] {}\nURL: {}\n{}\n",
            i + 1,
            title,
            source.url,
            text
        ));
    }
    prompt.push_str(
        "\nSummarise what these sources say about the request. \
         Give a short summary and a list of key points.",
    );
    prompt
}

/// Build the user prompt for answering from model knowledge alone.
pub fn direct_prompt(input: &str) -> String {
    format!(
        "Request: {}\n\nNo web sources could be retrieved. Answer from your own \
         knowledge, and say plainly if you are unsure or the answer may be out of date. \
         Give a short summary and a list of key points.",
        input.trim()
    )
}

/// Character allowance per source for a token budget.
pub fn source_budget(source_count: usize, max_tokens: usize) -> usize {
    if source_count == 0 {
        return 0;
    }
    max_tokens.saturating_mul(CHARS_PER_TOKEN) / source_count
}

/// Replace every whitespace run with a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to at most `max_chars` characters, marking the cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str(TRUNCATION_MARKER);
    cut
}
