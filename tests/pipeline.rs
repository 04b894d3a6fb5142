use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use stock_news_digest::config::AppConfig;
use stock_news_digest::llm::{ChatRequest, LanguageModel, OfflineModel};
use stock_news_digest::models::Article;
use stock_news_digest::pipeline::analyze_batch;

/// Replays a fixed sequence of model replies and counts calls.
struct ReplayModel {
    replies: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl ReplayModel {
    fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|s| s.to_string()).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModel for ReplayModel {
    async fn complete(&self, _request: &ChatRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("no reply scripted for this call"))
    }
}

fn fast_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.pipeline.request_delay_ms = 0;
    cfg
}

fn ingested(title: &str, description: &str, source: &str) -> Article {
    serde_json::from_value(serde_json::json!({
        "title": title,
        "description": description,
        "content": "",
        "url": format!("https://example.com/{}", title.replace(' ', "-")),
        "source": source,
        "published_at": "2025-01-02T09:00:00Z",
        "company": "Nvidia",
    }))
    .unwrap()
}

fn sample_batch() -> Vec<Article> {
    vec![
        // domestic trusted source, dense high-impact keywords
        ingested(
            "Merger agreement lifts quarterly earnings outlook",
            "Acquisition adds revenue, profit beats estimates after new product launch",
            "Hankyoreh",
        ),
        // unknown source, low-impact keywords only
        ingested(
            "Interview from the industry conference floor",
            "Opinion piece with a statement on participation, visit recap",
            "some aggregator",
        ),
        // near-duplicate of the first, unknown source
        ingested(
            "Merger agreement lifts quarterly earnings forecast",
            "Acquisition adds revenue, profit beats expectations after product launch",
            "randomsite",
        ),
    ]
}

#[tokio::test]
async fn offline_run_is_deterministic_and_complete() {
    let cfg = fast_config();
    let batch = sample_batch();

    let analysis = analyze_batch(&OfflineModel, &cfg, "Nvidia", batch).await;

    assert_eq!(analysis.total_articles, 3);
    assert_eq!(analysis.company, "Nvidia");

    // every article fully annotated, sorted descending, ranked 1..=3
    for (idx, article) in analysis.articles.iter().enumerate() {
        let score = article.final_score.expect("final score");
        assert!((0.0..=1.0).contains(&score));
        assert_eq!(article.rank, Some(idx + 1));
        assert!(article.summary.is_some());
        if idx > 0 {
            assert!(analysis.articles[idx - 1].final_score >= article.final_score);
        }
    }

    // with default 0.4/0.4/0.2 weights the domestic-trusted, high-impact
    // article wins
    let top = &analysis.articles[0];
    assert_eq!(top.source, "Hankyoreh");
    assert_eq!(top.reliability_score, Some(1.0));

    // the near-duplicates see each other, the interview piece sees nobody
    assert_eq!(top.frequency_score, Some(0.5));
    let interview = analysis
        .articles
        .iter()
        .find(|a| a.source == "some aggregator")
        .unwrap();
    assert_eq!(interview.frequency_score, Some(0.0));

    // offline digest is the templated fallback over the top three
    assert!(analysis.overall_digest.contains("(importance:"));
    assert!(analysis
        .overall_digest
        .contains("source: Hankyoreh"));

    // offline summaries are truncated descriptions
    assert!(top.summary.as_deref().unwrap().ends_with("...")
        || top.summary.as_deref() == Some(top.title.as_str()));
}

#[tokio::test]
async fn scripted_run_uses_model_output_everywhere() {
    let cfg = fast_config();
    let batch = sample_batch();

    // 3 impact scores, 3 summaries, 1 digest - in pipeline call order
    let model = ReplayModel::new(&[
        "0.9",
        "0.2",
        "0.8",
        "Summary one.",
        "Summary two.",
        "Summary three.",
        "Overall: strong quarter, one-off noise elsewhere.",
    ]);

    let analysis = analyze_batch(&model, &cfg, "Nvidia", batch).await;

    assert_eq!(model.calls(), 7);
    assert_eq!(
        analysis.overall_digest,
        "Overall: strong quarter, one-off noise elsewhere."
    );

    let top = &analysis.articles[0];
    assert_eq!(top.impact_score, Some(0.9));
    assert_eq!(top.rank, Some(1));
    assert_eq!(top.summary.as_deref(), Some("Summary one."));

    // weighted sum holds end to end
    let expected = 1.0 * cfg.weights.reliability
        + 0.9 * cfg.weights.impact
        + 0.5 * cfg.weights.frequency;
    assert!((top.final_score.unwrap() - expected).abs() < 1e-6);
}

#[tokio::test]
async fn rerun_on_enriched_batch_is_idempotent() {
    let cfg = fast_config();
    let first = analyze_batch(&OfflineModel, &cfg, "Nvidia", sample_batch()).await;
    let second = analyze_batch(&OfflineModel, &cfg, "Nvidia", first.articles.clone()).await;

    for (a, b) in first.articles.iter().zip(&second.articles) {
        assert_eq!(a.url, b.url);
        assert_eq!(a.final_score, b.final_score);
        assert_eq!(a.rank, b.rank);
    }
    assert_eq!(first.overall_digest, second.overall_digest);
}
