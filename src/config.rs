//! Runtime settings for the analysis service.
//!
//! Settings come from an optional YAML file. Every field has a default, so
//! an empty file (or no file at all) yields a working configuration:
//!
//! ```yaml
//! bind: 0.0.0.0:5000
//! request_log: user_requests.log
//! fetch:
//!   timeout_secs: 20
//!   min_article_chars: 100
//! summary:
//!   method: auto
//!   min_length: 30
//!   max_length: 130
//!   template: news_summarizer
//! sentiment:
//!   method: polarity
//! ```
//!
//! The language model itself is configured through `awful_aj`'s own
//! `config.yaml`, located in its config directory unless
//! `summary.llm_config` points elsewhere.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument};

/// Errors raised while loading or validating [`Settings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which summarization strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMethod {
    /// Language model first, extractive fallback on failure.
    #[default]
    Auto,
    /// Language model only.
    Abstractive,
    /// Sentence scoring only.
    Extractive,
}

/// Which sentiment classifier to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SentimentMethod {
    /// Averaged polarity and subjectivity.
    #[default]
    Polarity,
    /// Normalized compound valence with pos/neu/neg proportions.
    Compound,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Address the HTTP server binds to.
    pub bind: String,
    /// Append-only request log.
    pub request_log: PathBuf,
    pub fetch: FetchSettings,
    pub summary: SummarySettings,
    pub sentiment: SentimentSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Articles whose trimmed text is shorter than this are rejected.
    pub min_article_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    pub method: SummaryMethod,
    /// Lower bound on summary length, in words.
    pub min_length: usize,
    /// Upper bound on summary length, in words.
    pub max_length: usize,
    /// Model input is cut to this many whitespace-separated words.
    pub max_input_words: usize,
    /// Sentences kept by the extractive summarizer.
    pub sentences: usize,
    /// Path to the `awful_aj` config.yaml. Defaults to its config dir.
    pub llm_config: Option<PathBuf>,
    /// Name of the `awful_aj` chat template.
    pub template: String,
    pub max_retries: usize,
    pub base_delay_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentSettings {
    pub method: SentimentMethod,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
            request_log: PathBuf::from("user_requests.log"),
            fetch: FetchSettings::default(),
            summary: SummarySettings::default(),
            sentiment: SentimentSettings::default(),
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/124.0 Safari/537.36"
                .to_string(),
            min_article_chars: 100,
        }
    }
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            method: SummaryMethod::Auto,
            min_length: 30,
            max_length: 130,
            max_input_words: 1024,
            sentences: 3,
            llm_config: None,
            template: "news_summarizer".to_string(),
            max_retries: 5,
            base_delay_ms: 1000,
        }
    }
}

impl Settings {
    /// Parse settings from YAML text and validate them.
    pub fn from_yaml(text: &str, origin: &str) -> Result<Self, ConfigError> {
        // serde_yaml turns an empty document into a unit, not a map
        let settings: Settings = if text.trim().is_empty() {
            Settings::default()
        } else {
            serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
                path: origin.to_string(),
                source,
            })?
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.summary;
        if s.min_length > s.max_length {
            return Err(ConfigError::Invalid(format!(
                "summary.min_length ({}) exceeds summary.max_length ({})",
                s.min_length, s.max_length
            )));
        }
        if s.max_input_words == 0 {
            return Err(ConfigError::Invalid(
                "summary.max_input_words must be positive".to_string(),
            ));
        }
        if s.sentences == 0 {
            return Err(ConfigError::Invalid(
                "summary.sentences must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load settings from `path`, or return defaults when no path is given.
#[instrument(level = "info")]
pub async fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let Some(path) = path else {
        info!("No config file given; using defaults");
        return Ok(Settings::default());
    };

    let origin = path.display().to_string();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: origin.clone(),
            source,
        })?;
    let settings = Settings::from_yaml(&text, &origin)?;
    info!(path = %origin, "Loaded settings");
    Ok(settings)
}
