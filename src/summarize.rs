use std::cmp::Ordering;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::llm::{throttled_complete, ChatRequest, LanguageModel};
use crate::models::Article;
use crate::prompts;

const SUMMARY_MAX_TOKENS: u32 = 300;
const FALLBACK_DESCRIPTION_CHARS: usize = 200;

/// Sort the batch by `final_score` descending (stable, ties keep their
/// input order) and summarize the top slice, writing `summary` and the
/// 1-based `rank`. Articles beyond the slice are left untouched.
///
/// A failed summary call degrades to a truncated description (or the
/// bare title); the batch always completes.
pub async fn summarize_batch<L: LanguageModel + ?Sized>(
    model: &L,
    config: &AppConfig,
    batch: &mut [Article],
) {
    if batch.is_empty() {
        debug!("Summarization skipped - empty batch");
        return;
    }

    batch.sort_by(|a, b| {
        b.final_score
            .unwrap_or(0.0)
            .partial_cmp(&a.final_score.unwrap_or(0.0))
            .unwrap_or(Ordering::Equal)
    });

    let start = std::time::Instant::now();
    let top = config.pipeline.summary_count.min(batch.len());
    for idx in 0..top {
        let summary = match generate_summary(model, config, &batch[idx]).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(
                    "Summary call failed, using truncated fallback - title={:?}, error={}",
                    batch[idx].title, e
                );
                fallback_summary(&batch[idx])
            }
        };
        batch[idx].summary = Some(summary);
        batch[idx].rank = Some(idx + 1);
    }

    info!(
        "Summarization completed - summarized={}/{}, duration={:.2}s",
        top,
        batch.len(),
        start.elapsed().as_secs_f32()
    );
}

async fn generate_summary<L: LanguageModel + ?Sized>(
    model: &L,
    config: &AppConfig,
    article: &Article,
) -> anyhow::Result<String> {
    let request = ChatRequest {
        system: prompts::SUMMARIZER_SYSTEM.to_string(),
        user: prompts::user_summary(article, config.pipeline.excerpt_chars),
        max_tokens: SUMMARY_MAX_TOKENS,
    };
    let delay = Duration::from_millis(config.pipeline.request_delay_ms);
    let answer = throttled_complete(model, delay, &request).await?;
    Ok(answer.trim().to_string())
}

fn fallback_summary(article: &Article) -> String {
    if article.description.is_empty() {
        return article.title.clone();
    }
    let truncated: String = article
        .description
        .chars()
        .take(FALLBACK_DESCRIPTION_CHARS)
        .collect();
    format!("{truncated}...")
}
