//! The answer flow: acquire, filter, summarise, or answer directly.

use serde::{Deserialize, Serialize};
use webgist_acquire::{AcquiredContent, Acquirer, UsefulnessPolicy};

use crate::error::Result;
use crate::llm::Summarizer;
use crate::prompt::{direct_prompt, sources_prompt, SYSTEM_PROMPT};

/// A source that contributed to an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Page title.
    pub title: String,
    /// Canonical page URL.
    pub url: String,
}

impl From<&AcquiredContent> for Source {
    fn from(content: &AcquiredContent) -> Self {
        Self {
            title: content.title.clone(),
            url: content.url.clone(),
        }
    }
}

/// The final answer handed to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Prose summary.
    pub summary: String,
    /// Key points, possibly empty.
    pub key_points: Vec<String>,
    /// Pages the summary was built from, in prompt order.
    pub sources: Vec<Source>,
    /// `true` if the answer is grounded in acquired content, `false` if the
    /// model answered from its own knowledge.
    pub grounded: bool,
}

/// Answer `input`.
///
/// Acquires content, keeps what `policy` judges useful and summarises it.
/// With nothing useful, asks the model directly instead.
///
/// # Errors
///
/// Returns [`crate::error::WebgistError::Llm`] if the model call fails.
/// Acquisition itself never fails.
pub async fn answer(
    input: &str,
    acquirer: &Acquirer,
    summarizer: &dyn Summarizer,
    policy: &UsefulnessPolicy,
    max_context_tokens: usize,
) -> Result<Answer> {
    let acquired = acquirer.acquire(input).await;
    let useful = policy.filter(acquired);

    if useful.is_empty() {
        tracing::info!(model = summarizer.model(), "no useful content, answering directly");
        let summary = summarizer
            .summarize(SYSTEM_PROMPT, &direct_prompt(input))
            .await?;
        return Ok(Answer {
            summary: summary.summary,
            key_points: summary.key_points,
            sources: Vec::new(),
            grounded: false,
        });
    }

    tracing::info!(
        model = summarizer.model(),
        sources = useful.len(),
        "summarising acquired content"
    );
    let prompt = sources_prompt(input, &useful, max_context_tokens);
    let summary = summarizer.summarize(SYSTEM_PROMPT, &prompt).await?;
    Ok(Answer {
        summary: summary.summary,
        key_points: summary.key_points,
        sources: useful.iter().map(Source::from).collect(),
        grounded: true,
    })
}
