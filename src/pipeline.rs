//! The single-request analysis pipeline.
//!
//! ```text
//! validate -> fetch -> extract -> summarize -> sentiment -> keywords
//! ```
//!
//! [`Analyzer`] owns the HTTP client and the summarizer; both are shared by
//! every request, so one analyzer serves the whole process.

use crate::config::{SentimentMethod, Settings, SummaryMethod};
use crate::keywords::{DEFAULT_KEYWORD_LIMIT, extract_keywords};
use crate::models::{AnalysisReport, Article};
use crate::scrapers::article::{FetchError, build_client, fetch_article};
use crate::sentiment;
use crate::summarize::{SummarizeError, Summarizer};
use crate::utils::{truncate_for_log, word_count};
use crate::validate::is_valid_url;
use clap::ValueEnum;
use reqwest::Client;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Please provide a URL")]
    MissingUrl,
    #[error("Invalid URL format. Please provide a valid http:// or https:// URL")]
    InvalidUrl,
    #[error("Unknown {field}: {value}")]
    UnknownMethod { field: &'static str, value: String },
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Could not extract sufficient article text from the URL")]
    InsufficientText,
    #[error(transparent)]
    Summarization(#[from] SummarizeError),
}

/// Per-request overrides; `None` falls back to the configured method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzeOptions {
    pub summary: Option<SummaryMethod>,
    pub sentiment: Option<SentimentMethod>,
}

impl AnalyzeOptions {
    /// Parse method names as submitted by a form. Blank values count as
    /// absent; names are matched case-insensitively.
    pub fn parse(summary: Option<&str>, sentiment: Option<&str>) -> Result<Self, AnalyzeError> {
        Ok(Self {
            summary: parse_method(summary, "summary_method")?,
            sentiment: parse_method(sentiment, "sentiment_method")?,
        })
    }
}

fn parse_method<M: ValueEnum>(
    raw: Option<&str>,
    field: &'static str,
) -> Result<Option<M>, AnalyzeError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => M::from_str(value, true)
            .map(Some)
            .map_err(|_| AnalyzeError::UnknownMethod {
                field,
                value: value.to_string(),
            }),
    }
}

/// Runs the analysis pipeline for one article at a time.
///
/// Holds what outlives a request: the configured [`Settings`], a pooled
/// HTTP client and the [`Summarizer`] with its lazily loaded model client.
/// Share one `Analyzer` (behind an `Arc`) across handlers.
///
/// # Example
///
/// ```ignore
/// let analyzer = Analyzer::new(Settings::default())?;
/// let report = analyzer
///     .analyze_url("https://example.com/story", AnalyzeOptions::default())
///     .await?;
/// println!("{}", report.summary);
/// ```
pub struct Analyzer {
    settings: Settings,
    http: Client,
    summarizer: Summarizer,
}

impl Analyzer {
    /// Build an analyzer from `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the HTTP client cannot be constructed. The
    /// language model is not touched here; it loads on first use.
    pub fn new(settings: Settings) -> Result<Self, FetchError> {
        let http = build_client(&settings.fetch)?;
        let summarizer = Summarizer::new(&settings.summary);
        Ok(Self {
            settings,
            http,
            summarizer,
        })
    }

    /// Validate `url`, download the article behind it and analyze it.
    ///
    /// # Arguments
    ///
    /// * `url` - Article URL; surrounding whitespace is ignored
    /// * `options` - Per-request method overrides
    ///
    /// # Errors
    ///
    /// * [`AnalyzeError::MissingUrl`] or [`AnalyzeError::InvalidUrl`] before any I/O
    /// * [`AnalyzeError::Fetch`] when the download fails or answers non-2xx
    /// * [`AnalyzeError::InsufficientText`] when the page has too little prose
    /// * [`AnalyzeError::Summarization`] when an explicit abstractive summary fails
    #[instrument(level = "info", skip(self, options), fields(url = %truncate_for_log(url.trim(), 200)))]
    pub async fn analyze_url(
        &self,
        url: &str,
        options: AnalyzeOptions,
    ) -> Result<AnalysisReport, AnalyzeError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AnalyzeError::MissingUrl);
        }
        if !is_valid_url(url) {
            return Err(AnalyzeError::InvalidUrl);
        }

        let article = fetch_article(&self.http, url).await.inspect_err(|e| {
            warn!(error = %e, "Article download failed");
        })?;
        self.analyze_article(article, options).await
    }

    /// Analyze an already extracted article.
    pub async fn analyze_article(
        &self,
        article: Article,
        options: AnalyzeOptions,
    ) -> Result<AnalysisReport, AnalyzeError> {
        let text = article.text.trim();
        if text.chars().count() < self.settings.fetch.min_article_chars {
            warn!(chars = text.chars().count(), "Article text too short to analyze");
            return Err(AnalyzeError::InsufficientText);
        }

        let summary_method = options.summary.unwrap_or(self.settings.summary.method);
        let sentiment_method = options.sentiment.unwrap_or(self.settings.sentiment.method);

        let summary = self.summarizer.summarize(text, summary_method).await?;
        let sentiment = sentiment::analyze(text, sentiment_method);
        let keywords = extract_keywords(text, DEFAULT_KEYWORD_LIMIT);

        let report = AnalysisReport {
            success: true,
            url: article.url,
            title: article.title,
            authors: article.authors,
            publish_date: article.publish_date.map(|d| d.to_rfc3339()),
            summary_length: word_count(&summary.text),
            summary: summary.text,
            summary_method: summary.kind,
            sentiment_method,
            sentiment,
            keywords,
            original_length: word_count(text),
        };
        info!(
            summary_method = ?report.summary_method,
            sentiment = ?report.sentiment.label(),
            original_length = report.original_length,
            summary_length = report.summary_length,
            "Analysis complete"
        );
        Ok(report)
    }
}
