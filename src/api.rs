//! Language model calls with exponential backoff.
//!
//! Abstractive summaries are produced by an OpenAI-compatible chat endpoint
//! reached through `awful_aj`. The call is wrapped in a retry decorator so
//! that rate limits and transient network failures do not immediately fall
//! through to the extractive summarizer.
//!
//! # Architecture
//!
//! - [`AskAsync`]: core trait defining a single async model call
//! - [`AskFnWrapper`]: adapts `awful_aj::api::ask` to [`AskAsync`]
//! - [`RetryAsk`]: decorator adding retries to any [`AskAsync`]
//!
//! # Retry Strategy
//!
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..=250ms)
//! ```
//!
//! `max_delay` is fixed at 30 seconds.

use awful_aj::api::ask;
use awful_aj::{config::AwfulJadeConfig, template::ChatTemplate};
use rand::{Rng, rng};
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

/// Trait for a single async model call.
pub trait AskAsync {
    /// The type of response returned by the model.
    type Response;

    /// Send `text` to the model and return its reply.
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>>;
}

/// Adds exponential backoff with jitter to any [`AskAsync`] implementation.
pub struct RetryAsk<T> {
    inner: T,
    /// Retries after the first failed attempt.
    max_retries: usize,
    /// Delay before the first retry; doubles with each attempt.
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    /// Delay before retry number `attempt` (1-based), without jitter.
    fn backoff(&self, attempt: usize) -> StdDuration {
        let shift = (attempt.saturating_sub(1)).min(31) as u32;
        self.base_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay)
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync + fmt::Debug,
{
    type Response = T::Response;

    #[instrument(level = "info", skip_all, fields(max_retries = self.max_retries))]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let started = Instant::now();
        let mut attempt = 0usize;

        loop {
            attempt += 1;
            let err = match self.inner.ask(text).await {
                Ok(resp) => {
                    if attempt > 1 {
                        info!(attempt, "Model call recovered");
                    }
                    return Ok(resp);
                }
                Err(e) => e,
            };

            let elapsed_ms = started.elapsed().as_millis() as u64;
            if attempt > self.max_retries {
                error!(attempt, elapsed_ms, error = %err, "Model call failed; no retries left");
                return Err(err);
            }

            let jitter = StdDuration::from_millis(rng().random_range(0..=250));
            let delay = self.backoff(attempt) + jitter;
            warn!(attempt, elapsed_ms, ?delay, error = %err, "Model call failed; retrying");
            sleep(delay).await;
        }
    }
}

/// Adapts `awful_aj::api::ask` to [`AskAsync`].
#[derive(Debug)]
pub struct AskFnWrapper<'a> {
    /// Endpoint, model and sampling settings.
    pub config: &'a AwfulJadeConfig,
    /// System prompt and conversation scaffolding.
    pub template: &'a ChatTemplate,
}

impl AskAsync for AskFnWrapper<'_> {
    type Response = String;

    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let started = Instant::now();
        let reply = ask(self.config, text.to_string(), self.template, None, None).await?;
        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            reply_chars = reply.len(),
            "Model replied"
        );
        Ok(reply)
    }
}

/// Send `prompt` to the model, retrying with exponential backoff.
///
/// Gives up after `max_retries` retries and returns the last error.
pub async fn ask_with_backoff(
    config: &AwfulJadeConfig,
    prompt: &str,
    template: &ChatTemplate,
    max_retries: usize,
    base_delay: StdDuration,
) -> Result<String, Box<dyn Error>> {
    RetryAsk::new(AskFnWrapper { config, template }, max_retries, base_delay)
        .ask(prompt)
        .await
}
