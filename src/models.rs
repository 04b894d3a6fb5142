use serde::{Deserialize, Serialize};

/// One news article about the target company.
///
/// Raw text fields are populated by the (external) ingestion step; the
/// scoring and summarization passes enrich the record in place. All score
/// annotations live in `[0, 1]`. `rank` and `summary` are written only for
/// articles inside the summarized top slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub company: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reliability_score: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_score: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_score: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_score: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
}

impl Article {
    /// Body text bounded to `max_chars` so prompts cannot grow with
    /// arbitrarily long scraped pages.
    pub fn excerpt(&self, max_chars: usize) -> String {
        self.content.chars().take(max_chars).collect()
    }
}

/// Result of one pipeline run over a batch: the enriched articles
/// (sorted by `final_score` descending) plus the cross-article digest.
#[derive(Debug, Clone, Serialize)]
pub struct NewsAnalysis {
    pub company: String,
    pub analyzed_at: String,
    pub total_articles: usize,
    pub articles: Vec<Article>,
    pub overall_digest: String,
}

#[cfg(test)]
pub(crate) fn article(title: &str, description: &str, source: &str) -> Article {
    Article {
        title: title.to_string(),
        description: description.to_string(),
        content: String::new(),
        url: format!("https://example.com/{}", title.replace(' ', "-")),
        source: source.to_string(),
        published_at: "2025-01-01T00:00:00Z".to_string(),
        company: "Nvidia".to_string(),
        reliability_score: None,
        impact_score: None,
        frequency_score: None,
        final_score: None,
        summary: None,
        rank: None,
    }
}
