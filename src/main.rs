//! # Article Lens
//!
//! Fetches a news article by URL, extracts its text and metadata, summarizes
//! it and scores its sentiment.
//!
//! ## Features
//!
//! - Article extraction from arbitrary news pages (title, authors, date, body)
//! - Abstractive summaries through an OpenAI-compatible chat model, with a
//!   heuristic extractive fallback
//! - Two lexicon sentiment classifiers: polarity/subjectivity and compound
//! - Keyword extraction
//! - A small web UI and JSON API, plus a one-shot CLI mode
//!
//! ## Usage
//!
//! ```sh
//! article_lens serve
//! article_lens analyze https://example.com/news/story
//! ```
//!
//! ## Architecture
//!
//! Each request runs one pipeline:
//! 1. **Validate**: check the URL format
//! 2. **Fetch**: download the page and extract the article
//! 3. **Summarize**: model summary, or sentence scoring
//! 4. **Score**: sentiment and keywords over the full text

use clap::Parser;
use std::error::Error;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod keywords;
mod models;
mod pipeline;
mod request_log;
mod scrapers;
mod sentiment;
mod server;
mod summarize;
mod utils;
mod validate;

use cli::{Cli, Command};
use pipeline::{AnalyzeOptions, Analyzer};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut settings = config::load_settings(args.config.as_deref()).await?;
    args.command.apply_overrides(&mut settings);

    match args.command {
        Command::Serve { .. } => {
            info!(version = env!("CARGO_PKG_VERSION"), "article_lens starting up");
            server::run_server(settings).await?;
        }
        Command::Analyze {
            url,
            summary_method,
            sentiment_method,
        } => {
            let start_time = std::time::Instant::now();
            let analyzer = Analyzer::new(settings)?;
            let options = AnalyzeOptions {
                summary: summary_method,
                sentiment: sentiment_method,
            };
            let report = analyzer.analyze_url(&url, options).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            info!(elapsed_ms = start_time.elapsed().as_millis() as u64, "Done");
        }
    }

    Ok(())
}
