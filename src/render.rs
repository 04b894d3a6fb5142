use crate::models::NewsAnalysis;

/// Plain-text report for the terminal: overall digest first, then the
/// ranked top stories with their scores.
pub fn render_report(analysis: &NewsAnalysis) -> String {
    let mut out = String::new();

    out.push_str(&"=".repeat(60));
    out.push_str(&format!("\nNews analysis: {}\n", analysis.company));
    out.push_str(&"=".repeat(60));
    out.push_str(&format!("\nAnalyzed at: {}\n", analysis.analyzed_at));
    out.push_str(&format!("Articles analyzed: {}\n", analysis.total_articles));

    out.push_str("\nOverall digest\n");
    out.push_str(&"-".repeat(40));
    out.push_str(&format!("\n{}\n", analysis.overall_digest.trim()));

    let ranked: Vec<_> = analysis
        .articles
        .iter()
        .filter(|a| a.rank.is_some())
        .collect();
    if !ranked.is_empty() {
        out.push_str(&format!("\nTop stories by importance ({})\n", ranked.len()));
        out.push_str(&"-".repeat(40));
        out.push('\n');

        for article in ranked {
            out.push_str(&format!(
                "\n{}. {}\n",
                article.rank.unwrap_or(0),
                article.title
            ));
            out.push_str(&format!(
                "   source: {} | importance: {:.2} | published: {}\n",
                article.source,
                article.final_score.unwrap_or(0.0),
                article.published_at
            ));
            if let Some(summary) = &article.summary {
                out.push_str(&format!("   summary: {summary}\n"));
            }
            if !article.url.is_empty() {
                out.push_str(&format!("   link: {}\n", article.url));
            }
        }
    }

    out
}
