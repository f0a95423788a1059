//! # webgist-acquire
//!
//! Turns a URL or a free-text query into fetched, extracted web content.
//!
//! No API keys and no external services beyond the public endpoints being
//! scraped. The crate is the acquisition half of webgist; summarisation
//! lives in the caller.
//!
//! ## Design
//!
//! - Classifies input as a URL (fetched directly) or a search query
//! - Resolves queries through SearXNG mirrors, DuckDuckGo HTML, the
//!   DuckDuckGo instant-answer API and Wikipedia, in that order; the first
//!   provider with usable links wins
//! - Falls back to heuristic URLs built from the query when every provider fails
//! - Fetches all candidates concurrently; one failure never affects the others
//! - Browser-shaped request headers with a User-Agent rotated per request
//! - Returns an empty list rather than an error when nothing could be acquired
//!
//! ## Security
//!
//! - No cookies or sessions are kept between requests
//! - Queries are logged only at trace level
//! - No network listeners; this is a library, not a server

pub mod block;
pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod http;
pub mod orchestrator;
pub mod pipeline;
pub mod provider;
pub mod providers;
pub mod types;
pub mod usefulness;

pub use block::{BlockDetector, PhraseSignatures};
pub use classify::{classify, Input};
pub use config::AcquireConfig;
pub use error::{AcquireError, Result};
pub use orchestrator::Orchestrator;
pub use pipeline::{acquire, Acquirer};
pub use provider::ProviderAdapter;
pub use types::{AcquiredContent, ProviderKind};
pub use usefulness::UsefulnessPolicy;
