use std::time::Duration;

use itertools::Itertools;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::llm::{throttled_complete, ChatRequest, LanguageModel};
use crate::models::Article;
use crate::prompts;

const DIGEST_MAX_TOKENS: u32 = 500;

pub const NO_NEWS_MESSAGE: &str = "No recent news found for this company.";
pub const NO_CONTENT_MESSAGE: &str = "No news content available to analyze.";
const FALLBACK_HEADER: &str = "Key news at a glance:";

/// Synthesize one cross-article digest from the top of an already
/// rank-sorted, summarized batch. Always returns a non-empty string:
/// degenerate input yields a fixed message without any service call, and
/// a failed or blank model response yields the templated fallback.
pub async fn synthesize_digest<L: LanguageModel + ?Sized>(
    model: &L,
    config: &AppConfig,
    batch: &[Article],
) -> String {
    if batch.is_empty() {
        return NO_NEWS_MESSAGE.to_string();
    }

    let top = &batch[..config.pipeline.digest_count.min(batch.len())];

    let mut items: Vec<String> = top
        .iter()
        .filter_map(|a| a.summary.as_deref())
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        debug!("No summaries present, synthesizing digest from titles");
        items = top
            .iter()
            .filter(|a| !a.title.is_empty() || !a.description.is_empty())
            .map(|a| format!("Title: {}\nDetails: {}", a.title, a.description))
            .collect();
    }
    if items.is_empty() {
        return NO_CONTENT_MESSAGE.to_string();
    }

    let numbered = items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .join("\n\n");

    let request = ChatRequest {
        system: prompts::DIGEST_SYSTEM.to_string(),
        user: prompts::user_digest(&numbered),
        max_tokens: DIGEST_MAX_TOKENS,
    };
    let delay = Duration::from_millis(config.pipeline.request_delay_ms);

    match throttled_complete(model, delay, &request).await {
        Ok(answer) if !answer.trim().is_empty() => answer.trim().to_string(),
        Ok(_) => {
            warn!("Digest call returned empty text, using templated fallback");
            fallback_digest(top, config.pipeline.digest_fallback_count)
        }
        Err(e) => {
            warn!("Digest call failed, using templated fallback - error={e}");
            fallback_digest(top, config.pipeline.digest_fallback_count)
        }
    }
}

fn fallback_digest(top: &[Article], count: usize) -> String {
    let lines = top
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, a)| {
            format!(
                "{}. {} (importance: {:.2}, source: {})",
                i + 1,
                a.title,
                a.final_score.unwrap_or(0.0),
                a.source
            )
        })
        .join("\n\n");
    format!("{FALLBACK_HEADER}\n\n{lines}")
}
