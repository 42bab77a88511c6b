use anyhow::Context;
use clap::Parser;
use crypto_news::digest::render_text_digest;
use crypto_news::{AggregatorConfig, NewsPipeline};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Fetch the latest crypto headlines and print short summaries
#[derive(Debug, Parser)]
#[command(name = "crypto-news", version)]
struct Cli {
    /// TOML configuration file; built-in sources are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of articles to keep
    #[arg(short, long)]
    limit: Option<usize>,

    /// Maximum words per summary
    #[arg(short, long)]
    words: Option<usize>,

    /// Print the full run result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AggregatorConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AggregatorConfig::default(),
    };
    config.apply_env_overrides();
    if let Some(limit) = cli.limit {
        config.limit = limit;
    }
    if let Some(words) = cli.words {
        config.summary_word_limit = words;
    }
    config.validate()?;

    let pipeline = NewsPipeline::from_config(&config);
    info!(
        "Running crypto news aggregation over: {}",
        pipeline.source_names().join(", ")
    );
    let output = pipeline.run().await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render_text_digest(&output));
    }

    if output.all_sources_failed() {
        error!("No source could be reached");
        std::process::exit(1);
    }
    Ok(())
}
