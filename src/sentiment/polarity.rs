//! Polarity and subjectivity averaged over lexicon hits.
//!
//! Each lexicon word carries a polarity (-1..1) and a subjectivity (0..1).
//! Walking the text left to right:
//!
//! - an intensifier ("very", "slightly") scales the next hit
//! - a negation ("not", "never", "isn't") flips the next hit at half strength
//! - modifiers expire at sentence punctuation or after a few plain words
//!
//! The text's scores are the means over all hits; text with no hits scores
//! zero on both.

use super::{SentimentLabel, parse_lexicon};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static LEXICON: Lazy<HashMap<String, [f64; 2]>> =
    Lazy::new(|| parse_lexicon(include_str!("../../data/polarity_lexicon.tsv")));

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z]+(?:'[a-z]+)?|[.!?;]").expect("token pattern is valid"));

const INTENSIFIERS: [(&str, f64); 14] = [
    ("very", 1.3),
    ("extremely", 1.5),
    ("really", 1.2),
    ("highly", 1.3),
    ("incredibly", 1.5),
    ("truly", 1.2),
    ("deeply", 1.3),
    ("quite", 1.1),
    ("too", 1.2),
    ("most", 1.3),
    ("slightly", 0.5),
    ("somewhat", 0.7),
    ("fairly", 0.8),
    ("rather", 0.9),
];

const NEGATIONS: [&str; 7] = ["not", "no", "never", "neither", "nor", "without", "cannot"];

/// Plain words a pending modifier survives before it lapses.
const MODIFIER_REACH: usize = 3;

/// Multiplier applied to a negated hit's polarity.
const NEGATION_FACTOR: f64 = -0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarityScores {
    pub polarity: f64,
    pub subjectivity: f64,
}

pub fn score(text: &str) -> PolarityScores {
    let lowered = text.to_lowercase().replace('\u{2019}', "'");
    let mut hits: Vec<(f64, f64)> = Vec::new();

    let mut intensity: Option<f64> = None;
    let mut negated = false;
    let mut gap = 0usize;

    for token in TOKEN.find_iter(&lowered).map(|m| m.as_str()) {
        if matches!(token, "." | "!" | "?" | ";") {
            intensity = None;
            negated = false;
            continue;
        }
        if is_negation(token) {
            negated = true;
            gap = 0;
            continue;
        }
        if let Some(factor) = intensifier(token) {
            intensity = Some(intensity.unwrap_or(1.0) * factor);
            gap = 0;
            continue;
        }

        match LEXICON.get(token) {
            Some(&[polarity, subjectivity]) => {
                let factor = intensity.unwrap_or(1.0);
                let mut polarity = (polarity * factor).clamp(-1.0, 1.0);
                if negated {
                    polarity *= NEGATION_FACTOR;
                }
                hits.push((polarity, (subjectivity * factor).clamp(0.0, 1.0)));
                intensity = None;
                negated = false;
            }
            None => {
                gap += 1;
                if gap > MODIFIER_REACH {
                    intensity = None;
                    negated = false;
                }
            }
        }
    }

    if hits.is_empty() {
        return PolarityScores {
            polarity: 0.0,
            subjectivity: 0.0,
        };
    }
    let n = hits.len() as f64;
    PolarityScores {
        polarity: hits.iter().map(|(p, _)| p).sum::<f64>() / n,
        subjectivity: hits.iter().map(|(_, s)| s).sum::<f64>() / n,
    }
}

/// Positive above 0.1, negative below -0.1, neutral in between.
pub fn label(polarity: f64) -> SentimentLabel {
    if polarity > 0.1 {
        SentimentLabel::Positive
    } else if polarity < -0.1 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

fn is_negation(token: &str) -> bool {
    NEGATIONS.contains(&token) || token.ends_with("n't")
}

fn intensifier(token: &str) -> Option<f64> {
    INTENSIFIERS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|&(_, factor)| factor)
}
