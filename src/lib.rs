//! Importance scoring and hierarchical summarization for company news.
//!
//! The pipeline consumes an already-deduplicated batch of articles about
//! one company and enriches it in place:
//!
//! 1. **Scoring** ([`importance`]) - each article gets a source
//!    reliability score, an LLM-rated market impact score (with a
//!    deterministic keyword fallback), and a batch-relative frequency
//!    score from textual similarity; the weighted composite becomes
//!    `final_score`.
//! 2. **Summarization** ([`summarize`]) - the batch is ranked by
//!    composite score and the top slice gets investor-oriented summaries,
//!    falling back to truncated descriptions when the model is down.
//! 3. **Digest** ([`digest`]) - the best summaries are synthesized into
//!    one cross-article briefing, with a templated fallback.
//!
//! External service failures never propagate: every call site degrades to
//! a local deterministic substitute, so a batch always completes.

pub mod config;
pub mod digest;
pub mod frequency;
pub mod impact;
pub mod importance;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod reliability;
pub mod render;
pub mod summarize;

pub use config::AppConfig;
pub use models::{Article, NewsAnalysis};
pub use pipeline::analyze_batch;
