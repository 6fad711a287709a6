//! Summarization strategies.
//!
//! | Method | Behaviour |
//! |--------|-----------|
//! | `abstractive` | Language model only; failures are errors |
//! | `extractive` | Heuristic sentence scoring; never fails |
//! | `auto` | Language model, falling back to extractive on any failure |
//!
//! The returned [`Summary`] records which strategy actually produced the
//! text, so callers can tell a fallback apart from a model summary.

pub mod abstractive;
pub mod extractive;

use crate::config::{SummaryMethod, SummarySettings};
use abstractive::AbstractiveSummarizer;
use serde::Serialize;
use std::future::Future;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Errors from the abstractive strategy.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("failed to load summarization model: {0}")]
    Load(String),
    #[error("summarization failed: {0}")]
    Model(String),
    #[error("summarization model returned an empty reply")]
    EmptyReply,
}

/// The strategy that produced a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryKind {
    Abstractive,
    Extractive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub text: String,
    pub kind: SummaryKind,
}

/// Dispatches between the abstractive and extractive strategies.
#[derive(Clone)]
pub struct Summarizer {
    sentences: usize,
    model: AbstractiveSummarizer,
}

impl Summarizer {
    pub fn new(settings: &SummarySettings) -> Self {
        Self {
            sentences: settings.sentences,
            model: AbstractiveSummarizer::new(settings.clone()),
        }
    }

    #[instrument(level = "info", skip_all, fields(method = ?method))]
    pub async fn summarize(&self, text: &str, method: SummaryMethod) -> Result<Summary, SummarizeError> {
        let model = &self.model;
        summarize_with(text, method, self.sentences, |input| async move {
            model.summarize(&input).await
        })
        .await
    }
}

/// Run `method` over `text`, using `abstractive` as the model strategy.
pub async fn summarize_with<F, Fut>(
    text: &str,
    method: SummaryMethod,
    sentences: usize,
    abstractive: F,
) -> Result<Summary, SummarizeError>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<String, SummarizeError>>,
{
    let extract = || Summary {
        text: extractive::summarize(text, sentences),
        kind: SummaryKind::Extractive,
    };

    match method {
        SummaryMethod::Extractive => Ok(extract()),
        SummaryMethod::Abstractive => Ok(Summary {
            text: abstractive(text.to_string()).await?,
            kind: SummaryKind::Abstractive,
        }),
        SummaryMethod::Auto => match abstractive(text.to_string()).await {
            Ok(summary) => Ok(Summary {
                text: summary,
                kind: SummaryKind::Abstractive,
            }),
            Err(e) => {
                warn!(error = %e, "Abstractive summary unavailable; falling back to extractive");
                let summary = extract();
                info!(sentences, "Extractive fallback summary ready");
                Ok(summary)
            }
        },
    }
}
