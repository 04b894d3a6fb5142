use crate::config::KeywordTaxonomy;
use crate::models::Article;

pub const ANALYST_SYSTEM: &str = "You are a stock market analyst. You assess \
how strongly a news item is likely to move the company's share price and \
answer with nothing but a single number.";

pub const SUMMARIZER_SYSTEM: &str = "You are a stock market analyst. You \
summarize company news for investors, concisely and precisely.";

pub const DIGEST_SYSTEM: &str = "You are a stock market analyst. You combine \
multiple news summaries into one actionable overview for investors.";

pub fn user_impact(article: &Article, keywords: &KeywordTaxonomy, excerpt_chars: usize) -> String {
    format!(
        r#"Rate the impact of the following news item on the company's share price as a score between 0 and 1.

Keyword guidance (context only, not a formula):
High impact: {high}
Medium impact: {medium}
Low impact: {low}

Scoring rubric:
- 0.8-1.0: very high impact (earnings releases, M&A, new product launches, CEO changes)
- 0.6-0.8: high impact (investments, partnerships, regulatory approvals, disclosures)
- 0.4-0.6: medium impact (market trends, competitor news, customer contracts)
- 0.2-0.4: low impact (event participation, interviews, opinion pieces)
- 0.0-0.2: negligible impact (general industry news, personal activities)

News item:
Title: {title}

Description: {description}

Body: {body}

Answer with the score only, as a number (e.g. 0.75):"#,
        high = keywords.high_impact.join(", "),
        medium = keywords.medium_impact.join(", "),
        low = keywords.low_impact.join(", "),
        title = article.title,
        description = article.description,
        body = article.excerpt(excerpt_chars),
    )
}

pub fn user_summary(article: &Article, excerpt_chars: usize) -> String {
    format!(
        r#"The following is a news item about {company}.
Summarize the key points in 3-4 sentences from a stock investor's perspective.

Title: {title}

Description: {description}

Body: {body}

Cover in the summary:
1. The effect on the company's results or business
2. The key information that could move the share price
3. What investors should watch next"#,
        company = article.company,
        title = article.title,
        description = article.description,
        body = article.excerpt(excerpt_chars),
    )
}

pub fn user_digest(numbered_summaries: &str) -> String {
    format!(
        r#"The following are summaries of recent news about one company.
Combine them into an overall briefing covering what investors need to know.

{numbered_summaries}

Include:
1. The 2-3 most important news items
2. The company's overall situation
3. Implications from an investment perspective"#,
    )
}
