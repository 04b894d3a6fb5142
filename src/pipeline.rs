use chrono::Local;
use tracing::info;

use crate::config::AppConfig;
use crate::digest::synthesize_digest;
use crate::importance::evaluate_importance;
use crate::llm::LanguageModel;
use crate::models::{Article, NewsAnalysis};
use crate::summarize::summarize_batch;

/// Run the full pipeline over one deduplicated batch: score every
/// article, rank and summarize the top slice, then synthesize the
/// cross-article digest. Per-article service failures degrade to local
/// fallbacks, so the returned analysis is always complete.
pub async fn analyze_batch<L: LanguageModel + ?Sized>(
    model: &L,
    config: &AppConfig,
    company: &str,
    mut batch: Vec<Article>,
) -> NewsAnalysis {
    let start = std::time::Instant::now();
    info!(
        "Analysis started - company={}, articles={}",
        company,
        batch.len()
    );

    evaluate_importance(model, config, &mut batch).await;
    summarize_batch(model, config, &mut batch).await;
    let overall_digest = synthesize_digest(model, config, &batch).await;

    info!(
        "Analysis completed - company={}, articles={}, duration={:.2}s",
        company,
        batch.len(),
        start.elapsed().as_secs_f32()
    );

    NewsAnalysis {
        company: company.to_string(),
        analyzed_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        total_articles: batch.len(),
        articles: batch,
        overall_digest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::NO_NEWS_MESSAGE;
    use crate::llm::testing::ScriptedModel;

    #[tokio::test]
    async fn empty_batch_completes_without_calls() {
        let mut cfg = AppConfig::default();
        cfg.pipeline.request_delay_ms = 0;
        let model = ScriptedModel::new(vec![]);

        let analysis = analyze_batch(&model, &cfg, "Nvidia", Vec::new()).await;

        assert_eq!(model.calls(), 0);
        assert_eq!(analysis.total_articles, 0);
        assert!(analysis.articles.is_empty());
        assert_eq!(analysis.overall_digest, NO_NEWS_MESSAGE);
    }
}
