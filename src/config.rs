use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Top-level configuration, loaded from a TOML file.
///
/// Every section has full defaults so the binary can run without a config
/// file (API key then comes from `OPENAI_API_KEY`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Company the batch was gathered for; CLI `--company` overrides.
    pub target_company: String,
    pub api: ApiConfig,
    pub weights: Weights,
    pub sources: SourceTiers,
    pub keywords: KeywordTaxonomy,
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    /// A present-but-malformed file is a hard error, not a silent default.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Malformed configuration is the one error class that propagates to
    /// the caller; scoring has no meaningful fallback for it.
    pub fn validate(&self) -> Result<()> {
        let w = &self.weights;
        if w.reliability < 0.0 || w.impact < 0.0 || w.frequency < 0.0 {
            bail!("importance weights must be non-negative");
        }
        let sum = w.reliability + w.impact + w.frequency;
        if (sum - 1.0).abs() > 1e-3 {
            bail!("importance weights must sum to 1.0 (got {sum:.3})");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-5".to_string(),
            temperature: 0.3,
        }
    }
}

/// Relative contribution of each sub-score to the composite. Must sum
/// to 1.0 so the composite stays in `[0, 1]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub reliability: f32,
    pub impact: f32,
    pub frequency: f32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            reliability: 0.4,
            impact: 0.4,
            frequency: 0.2,
        }
    }
}

/// Trusted publisher tiers, matched case-insensitively as substrings of
/// the article's free-text source label.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceTiers {
    pub domestic: Vec<String>,
    pub international: Vec<String>,
}

impl Default for SourceTiers {
    fn default() -> Self {
        Self {
            domestic: to_strings(&[
                "Yonhap News",
                "News1",
                "Newsis",
                "Maeil Business",
                "Korea Economic Daily",
                "Chosun Ilbo",
                "JoongAng Ilbo",
                "Dong-A Ilbo",
                "Hankyoreh",
                "Kyunghyang Shinmun",
                "Edaily",
                "Asia Business Daily",
                "Herald Business",
                "Seoul Economic Daily",
                "Financial News",
            ]),
            international: to_strings(&[
                "Reuters",
                "Bloomberg",
                "Wall Street Journal",
                "Financial Times",
                "CNN Business",
                "BBC Business",
                "CNBC",
                "MarketWatch",
                "Yahoo Finance",
                "Forbes",
                "Business Insider",
                "The Guardian",
                "Associated Press",
                "Dow Jones",
                "New York Times Business",
            ]),
        }
    }
}

/// Three-tier keyword taxonomy. The LLM impact prompt embeds it as
/// guidance; the deterministic fallback scores against it directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordTaxonomy {
    pub high_impact: Vec<String>,
    pub medium_impact: Vec<String>,
    pub low_impact: Vec<String>,
}

impl Default for KeywordTaxonomy {
    fn default() -> Self {
        Self {
            high_impact: to_strings(&[
                "earnings",
                "revenue",
                "profit",
                "quarterly results",
                "annual results",
                "merger",
                "acquisition",
                "M&A",
                "partnership",
                "investment",
                "new product",
                "launch",
                "patent",
                "technology",
                "R&D",
                "regulation",
                "government",
                "policy",
                "approval",
                "license",
                "CEO",
                "executive",
                "leadership",
                "management change",
                "disclosure",
                "announcement",
                "press release",
                "conference call",
            ]),
            medium_impact: to_strings(&[
                "market",
                "competition",
                "competitor",
                "industry",
                "trend",
                "customer",
                "client",
                "contract",
                "order",
                "deal",
                "facility",
                "expansion",
                "construction",
                "manufacturing",
                "hiring",
                "recruitment",
                "workforce",
                "employee",
            ]),
            low_impact: to_strings(&[
                "event",
                "conference",
                "participation",
                "visit",
                "meeting",
                "interview",
                "statement",
                "opinion",
                "outlook",
                "forecast",
            ]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Delay before every LLM call, to stay inside provider rate limits.
    pub request_delay_ms: u64,
    /// How many top-ranked articles get an individual summary.
    pub summary_count: usize,
    /// How many summarized articles feed the cross-article digest.
    pub digest_count: usize,
    /// How many articles the templated digest fallback enumerates.
    pub digest_fallback_count: usize,
    /// Vocabulary cap for the frequency vectorizer.
    pub max_vocabulary: usize,
    /// Body excerpt cap (chars) for LLM prompts.
    pub excerpt_chars: usize,
    /// Cosine similarity above which two articles count as near-duplicates.
    pub similarity_threshold: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 1000,
            summary_count: 10,
            digest_count: 5,
            digest_fallback_count: 3,
            max_vocabulary: 100,
            excerpt_chars: 1000,
            similarity_threshold: 0.3,
        }
    }
}

fn to_strings(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_company: "Nvidia".to_string(),
            api: ApiConfig::default(),
            weights: Weights::default(),
            sources: SourceTiers::default(),
            keywords: KeywordTaxonomy::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        AppConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_weights_not_summing_to_one() {
        let mut cfg = AppConfig::default();
        cfg.weights.impact = 0.9;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_negative_weight() {
        let mut cfg = AppConfig::default();
        cfg.weights.reliability = -0.2;
        cfg.weights.impact = 1.0;
        cfg.weights.frequency = 0.2;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults_elsewhere() {
        let cfg: AppConfig = toml::from_str(
            r#"
            target_company = "Samsung Electronics"

            [weights]
            reliability = 0.5
            impact = 0.3
            frequency = 0.2
            "#,
        )
        .unwrap();
        assert_eq!(cfg.target_company, "Samsung Electronics");
        assert_eq!(cfg.weights.reliability, 0.5);
        assert_eq!(cfg.pipeline.summary_count, 10);
        assert!(!cfg.keywords.high_impact.is_empty());
        cfg.validate().unwrap();
    }
}
