use tracing::{debug, info};

use crate::config::AppConfig;
use crate::frequency::FrequencyModel;
use crate::impact::impact_score;
use crate::llm::LanguageModel;
use crate::models::Article;
use crate::reliability::reliability_score;

/// Score every article in the batch and write the four annotations in
/// place: reliability, impact, frequency, and their weighted composite.
///
/// Frequency vectors are built once, up front, so each article is scored
/// against the full batch text regardless of evaluation order. An empty
/// batch returns immediately without touching the model.
pub async fn evaluate_importance<L: LanguageModel + ?Sized>(
    model: &L,
    config: &AppConfig,
    batch: &mut [Article],
) {
    if batch.is_empty() {
        debug!("Importance evaluation skipped - empty batch");
        return;
    }

    let start = std::time::Instant::now();
    let frequency = FrequencyModel::build(
        batch,
        config.pipeline.max_vocabulary,
        config.pipeline.similarity_threshold,
    );

    let weights = config.weights;
    for idx in 0..batch.len() {
        let reliability = reliability_score(&batch[idx].source, &config.sources);
        let impact = impact_score(model, config, &batch[idx]).await;
        let freq = frequency.score(idx);
        let final_score = reliability * weights.reliability
            + impact * weights.impact
            + freq * weights.frequency;

        let article = &mut batch[idx];
        article.reliability_score = Some(reliability);
        article.impact_score = Some(impact);
        article.frequency_score = Some(freq);
        article.final_score = Some(final_score);

        debug!(
            "Scored article - title={:?}, reliability={:.2}, impact={:.2}, frequency={:.2}, final={:.3}",
            article.title, reliability, impact, freq, final_score
        );
    }

    info!(
        "Importance evaluation completed - articles={}, duration={:.2}s",
        batch.len(),
        start.elapsed().as_secs_f32()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedModel;
    use crate::llm::OfflineModel;
    use crate::models::article;

    fn fast_config() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.pipeline.request_delay_ms = 0;
        cfg
    }

    #[tokio::test]
    async fn empty_batch_makes_no_calls() {
        let model = ScriptedModel::new(vec![]);
        let mut batch: Vec<Article> = Vec::new();
        evaluate_importance(&model, &fast_config(), &mut batch).await;
        assert!(batch.is_empty());
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn final_score_is_the_weighted_sum() {
        let cfg = fast_config();
        let model = ScriptedModel::repeating("0.8");
        let mut batch = vec![
            article("Earnings beat", "Record revenue", "Reuters"),
            article("Weekend market recap", "Quiet trading", "somesite"),
        ];
        evaluate_importance(&model, &cfg, &mut batch).await;
        assert_eq!(model.calls(), batch.len());

        for a in &batch {
            let r = a.reliability_score.unwrap();
            let i = a.impact_score.unwrap();
            let f = a.frequency_score.unwrap();
            let expected =
                r * cfg.weights.reliability + i * cfg.weights.impact + f * cfg.weights.frequency;
            let got = a.final_score.unwrap();
            assert!((got - expected).abs() < 1e-6);
            assert!((0.0..=1.0).contains(&got));
        }

        assert_eq!(batch[0].reliability_score, Some(0.9));
        assert_eq!(batch[0].impact_score, Some(0.8));
        assert_eq!(batch[1].reliability_score, Some(0.5));
    }

    #[tokio::test]
    async fn scoring_survives_total_service_failure() {
        let cfg = fast_config();
        let mut batch = vec![
            article("Merger announced", "acquisition of rival", "Bloomberg"),
            article("CEO interview", "outlook statement", "a blog"),
        ];
        evaluate_importance(&OfflineModel, &cfg, &mut batch).await;
        for a in &batch {
            let got = a.final_score.unwrap();
            assert!((0.0..=1.0).contains(&got));
        }
    }
}
