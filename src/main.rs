use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use stock_news_digest::config::AppConfig;
use stock_news_digest::llm::{LanguageModel, OfflineModel, OpenAiChatModel};
use stock_news_digest::models::Article;
use stock_news_digest::pipeline::analyze_batch;
use stock_news_digest::render::render_report;

/// Stock news digest - rank a batch of company news by importance and
/// summarize the top stories
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Batch JSON file produced by the ingestion step (array of articles)
    #[arg(short, long)]
    input: PathBuf,

    /// Company the batch is about (overrides the configured default)
    #[arg(short = 'n', long)]
    company: Option<String>,

    /// Path to config file (default: "config.toml")
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Skip all language-model calls and use deterministic fallbacks
    #[arg(long)]
    offline: bool,

    /// Emit the full analysis as JSON instead of the text report
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load_or_default(&args.config)?;
    if config.api.api_key.is_empty() {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.api.api_key = key;
        }
    }

    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading batch file {}", args.input.display()))?;
    let mut batch: Vec<Article> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing batch file {}", args.input.display()))?;

    let company = args
        .company
        .unwrap_or_else(|| config.target_company.clone());
    for article in &mut batch {
        if article.company.is_empty() {
            article.company = company.clone();
        }
    }
    info!("Loaded batch - company={}, articles={}", company, batch.len());

    let model: Box<dyn LanguageModel> = if args.offline {
        info!("Offline mode - all summaries and impact scores use fallbacks");
        Box::new(OfflineModel)
    } else if config.api.api_key.is_empty() {
        warn!("No API key configured (set api.api_key or OPENAI_API_KEY), falling back to offline mode");
        Box::new(OfflineModel)
    } else {
        Box::new(OpenAiChatModel::from_config(&config.api)?)
    };

    let analysis = analyze_batch(model.as_ref(), &config, &company, batch).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        println!("{}", render_report(&analysis));
    }
    Ok(())
}
