//! Abstractive summarization through a chat language model.
//!
//! The model client (an `awful_aj` config plus chat template) is loaded on
//! the first request that needs it and kept for the life of the process.
//! A failed load is not cached, so fixing the config takes effect on the
//! next request without a restart.
//!
//! The retry loop holds `Box<dyn Error>` across awaits, which makes its
//! future `!Send`, so model calls run on a blocking thread that drives
//! them with the runtime handle.

use super::SummarizeError;
use crate::api::ask_with_backoff;
use crate::config::SummarySettings;
use crate::utils::{first_words, word_count};
use awful_aj::config::AwfulJadeConfig;
use awful_aj::template::ChatTemplate;
use awful_aj::{config, config_dir, template};
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{info, instrument};

struct ModelClient {
    config: AwfulJadeConfig,
    template: ChatTemplate,
}

struct Inner {
    settings: SummarySettings,
    client: OnceCell<ModelClient>,
}

/// Lazily initialized language-model summarizer. Cheap to clone.
#[derive(Clone)]
pub struct AbstractiveSummarizer {
    inner: Arc<Inner>,
}

impl AbstractiveSummarizer {
    pub fn new(settings: SummarySettings) -> Self {
        Self {
            inner: Arc::new(Inner {
                settings,
                client: OnceCell::new(),
            }),
        }
    }

    /// Whether the model client has been loaded yet.
    pub fn is_loaded(&self) -> bool {
        self.inner.client.get().is_some()
    }

    /// Summarize `text`, loading the model client first if needed.
    #[instrument(level = "info", skip_all, fields(words = word_count(text)))]
    pub async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        let settings = &self.inner.settings;
        let input = first_words(text, settings.max_input_words);
        let prompt = build_prompt(&input, settings.min_length, settings.max_length);

        if !self.is_loaded() {
            info!("Loading summarization model on first use");
        }
        let inner = Arc::clone(&self.inner);
        let handle = Handle::current();
        let reply = tokio::task::spawn_blocking(move || inner.ask_blocking(&handle, &prompt))
            .await
            .map_err(|e| SummarizeError::Model(format!("summarizer task failed: {e}")))??;

        let summary = reply.trim();
        if summary.is_empty() {
            return Err(SummarizeError::EmptyReply);
        }
        info!(summary_words = word_count(summary), "Abstractive summary ready");
        Ok(summary.to_string())
    }
}

impl Inner {
    fn ask_blocking(&self, handle: &Handle, prompt: &str) -> Result<String, SummarizeError> {
        let client = self.client.get_or_try_init(|| self.load_client(handle))?;
        let base_delay = Duration::from_millis(self.settings.base_delay_ms);
        handle
            .block_on(ask_with_backoff(
                &client.config,
                prompt,
                &client.template,
                self.settings.max_retries,
                base_delay,
            ))
            .map_err(|e| SummarizeError::Model(e.to_string()))
    }

    #[instrument(level = "info", skip_all, fields(template = %self.settings.template))]
    fn load_client(&self, handle: &Handle) -> Result<ModelClient, SummarizeError> {
        let config_path = match &self.settings.llm_config {
            Some(path) => path.clone(),
            None => default_config_path()?,
        };
        let config_path = config_path.to_str().ok_or_else(|| {
            SummarizeError::Load(format!(
                "not a valid config filename: {}",
                config_path.display()
            ))
        })?;

        let config = config::load_config(config_path)
            .map_err(|e| SummarizeError::Load(format!("{config_path}: {e:?}")))?;
        let template = handle
            .block_on(template::load_template(self.settings.template.as_str()))
            .map_err(|e| {
                SummarizeError::Load(format!("template {}: {e}", self.settings.template))
            })?;

        info!(config_path, "Loaded summarization model client");
        Ok(ModelClient { config, template })
    }
}

fn default_config_path() -> Result<PathBuf, SummarizeError> {
    let dir = config_dir().map_err(|e| SummarizeError::Load(e.to_string()))?;
    Ok(dir.join("config.yaml"))
}

/// The user message sent to the model.
pub fn build_prompt(article: &str, min_words: usize, max_words: usize) -> String {
    format!(
        "Summarize the following news article in {min_words} to {max_words} words. \
         Reply with the summary text only, without a heading or preamble.\n\n{article}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_carries_bounds_and_text() {
        let prompt = build_prompt("The council met.", 30, 130);
        assert!(prompt.starts_with("Summarize the following news article in 30 to 130 words."));
        assert!(prompt.ends_with("\n\nThe council met."));
    }

    #[test]
    fn test_new_summarizer_is_not_loaded() {
        let summarizer = AbstractiveSummarizer::new(SummarySettings::default());
        assert!(!summarizer.is_loaded());
        let clone = summarizer.clone();
        assert!(Arc::ptr_eq(&summarizer.inner, &clone.inner));
    }

    fn unreachable_model(dir: &tempfile::TempDir) -> SummarySettings {
        SummarySettings {
            llm_config: Some(dir.path().join("missing-config.yaml")),
            ..SummarySettings::default()
        }
    }

    #[tokio::test]
    async fn test_failed_load_is_an_error_and_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let summarizer = AbstractiveSummarizer::new(unreachable_model(&dir));

        for _ in 0..2 {
            let err = summarizer.summarize("The council met on Monday.").await.unwrap_err();
            assert!(matches!(err, SummarizeError::Load(_)), "unexpected error: {err}");
            assert!(!summarizer.is_loaded());
        }
    }
}
