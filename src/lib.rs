//! webgist: answer a question or summarise a page from live web content.
//!
//! The input is either a URL or a free-text query:
//! Input → acquisition (classify, search, fetch, extract) → usefulness
//! filter → prompt → language model → answer
//!
//! # Architecture
//!
//! - **Acquisition**: the [`webgist_acquire`] crate turns input into
//!   extracted pages and never fails; an empty result means "nothing found"
//! - **Usefulness filter**: drops error pages and near-empty extractions
//! - **Prompt**: numbered sources held to a token budget
//! - **LLM**: any OpenAI-compatible Chat Completions server, injected as a
//!   [`llm::Summarizer`]
//! - **Fallback**: with no useful sources the model answers directly and
//!   the answer is marked ungrounded

pub mod answer;
pub mod config;
pub mod error;
pub mod llm;
pub mod prompt;

pub use answer::{answer, Answer, Source};
pub use config::{LlmConfig, WebgistConfig};
pub use error::{Result, WebgistError};
pub use llm::{OpenAiCompatSummarizer, Summarizer, Summary};
