//! Lexicon-based sentiment classification.
//!
//! Two classifiers are available, selected by [`SentimentMethod`]:
//!
//! - [`polarity`]: averaged polarity (-1..1) and subjectivity (0..1)
//! - [`compound`]: rule-adjusted valence normalized to a compound score,
//!   plus the share of positive, neutral and negative tokens
//!
//! Both score the full article text and map their headline number to a
//! [`SentimentLabel`] with a small neutral band around zero.

pub mod compound;
pub mod polarity;

use crate::config::SentimentMethod;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

/// Scores from one of the classifiers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SentimentReport {
    Polarity {
        sentiment: SentimentLabel,
        polarity: f64,
        subjectivity: f64,
    },
    Compound {
        sentiment: SentimentLabel,
        compound: f64,
        pos: f64,
        neu: f64,
        neg: f64,
    },
}

impl SentimentReport {
    pub fn label(&self) -> SentimentLabel {
        match self {
            SentimentReport::Polarity { sentiment, .. } | SentimentReport::Compound { sentiment, .. } => {
                *sentiment
            }
        }
    }
}

/// Score `text` with the chosen classifier.
#[instrument(level = "debug", skip(text), fields(chars = text.len()))]
pub fn analyze(text: &str, method: SentimentMethod) -> SentimentReport {
    let report = match method {
        SentimentMethod::Polarity => {
            let scores = polarity::score(text);
            SentimentReport::Polarity {
                sentiment: polarity::label(scores.polarity),
                polarity: scores.polarity,
                subjectivity: scores.subjectivity,
            }
        }
        SentimentMethod::Compound => {
            let scores = compound::score(text);
            SentimentReport::Compound {
                sentiment: compound::label(scores.compound),
                compound: scores.compound,
                pos: scores.pos,
                neu: scores.neu,
                neg: scores.neg,
            }
        }
    };
    debug!(?report, "Scored sentiment");
    report
}

/// Parse a tab-separated lexicon: a word followed by one or more numbers.
/// Blank lines and `#` comments are skipped, as are malformed rows.
fn parse_lexicon<const N: usize>(raw: &str) -> HashMap<String, [f64; N]> {
    let mut out = HashMap::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split('\t');
        let Some(word) = fields.next() else { continue };
        let Ok(values) = fields.map(|f| f.trim().parse::<f64>()).collect::<Result<Vec<_>, _>>() else {
            continue;
        };
        if let Ok(values) = <[f64; N]>::try_from(values) {
            out.insert(word.to_lowercase(), values);
        }
    }
    out
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
