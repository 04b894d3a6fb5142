use std::time::Duration;

use tracing::warn;

use crate::config::{AppConfig, KeywordTaxonomy};
use crate::llm::{throttled_complete, ChatRequest, LanguageModel};
use crate::models::Article;
use crate::prompts;

const IMPACT_MAX_TOKENS: u32 = 10;

/// Market-impact magnitude for one article, `[0, 1]`.
///
/// Primary path is one throttled LLM call that must answer with a bare
/// number. A failed call or an unparseable answer degrades to the
/// deterministic keyword score; this function never errors outward.
pub async fn impact_score<L: LanguageModel + ?Sized>(
    model: &L,
    config: &AppConfig,
    article: &Article,
) -> f32 {
    let request = ChatRequest {
        system: prompts::ANALYST_SYSTEM.to_string(),
        user: prompts::user_impact(article, &config.keywords, config.pipeline.excerpt_chars),
        max_tokens: IMPACT_MAX_TOKENS,
    };
    let delay = Duration::from_millis(config.pipeline.request_delay_ms);

    match throttled_complete(model, delay, &request).await {
        Ok(answer) => match answer.trim().parse::<f32>() {
            Ok(score) => score.clamp(0.0, 1.0),
            Err(_) => {
                warn!(
                    "Non-numeric impact response ({:?}), using keyword fallback - title={:?}",
                    answer.trim(),
                    article.title
                );
                keyword_impact_score(article, &config.keywords)
            }
        },
        Err(e) => {
            warn!(
                "Impact call failed, using keyword fallback - title={:?}, error={}",
                article.title, e
            );
            keyword_impact_score(article, &config.keywords)
        }
    }
}

/// Deterministic fallback: per-tier keyword presence over the article
/// text, weighted 3/2/1 and normalized by the best possible high-impact
/// score. An empty high-impact taxonomy makes normalization impossible,
/// so that resolves to 0.5.
pub fn keyword_impact_score(article: &Article, keywords: &KeywordTaxonomy) -> f32 {
    if keywords.high_impact.is_empty() {
        return 0.5;
    }

    let text = format!(
        "{} {} {}",
        article.title, article.description, article.content
    )
    .to_lowercase();
    let hits = |tier: &[String]| {
        tier.iter()
            .filter(|k| text.contains(&k.to_lowercase()))
            .count()
    };

    let weighted = 3 * hits(&keywords.high_impact)
        + 2 * hits(&keywords.medium_impact)
        + hits(&keywords.low_impact);
    let max_possible = 3 * keywords.high_impact.len();

    (weighted as f32 / max_possible as f32).min(1.0)
}
