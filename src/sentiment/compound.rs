//! Compound valence scoring with rule-based adjustments.
//!
//! Every token gets a valence from the lexicon (-4..4, zero when absent),
//! adjusted by:
//!
//! - booster words within three tokens before it ("very", "barely"),
//!   dampened with distance
//! - ALL-CAPS emphasis, when the text mixes caps and non-caps tokens
//! - negations within three tokens before it
//! - a contrastive "but": the clause before it counts half, after it 1.5x
//! - exclamation marks and repeated question marks, added to the total
//!
//! The summed valence is squashed into a compound score in [-1, 1] with
//! `x / sqrt(x^2 + 15)`. The pos/neu/neg proportions describe how much of
//! the text leans each way.
//!
//! Lookback and the "but" rule never cross sentence boundaries.

use super::{SentimentLabel, parse_lexicon, round_to};
use once_cell::sync::Lazy;
use std::collections::HashMap;

static LEXICON: Lazy<HashMap<String, [f64; 1]>> =
    Lazy::new(|| parse_lexicon(include_str!("../../data/valence_lexicon.tsv")));

const B_INCR: f64 = 0.293;
const B_DECR: f64 = -0.293;
/// Added to a word's valence when it is shouted.
const C_INCR: f64 = 0.733;
/// Multiplier applied for each negation in the lookback window.
const N_SCALAR: f64 = -0.74;
/// Normalization constant approximating the maximum expected sum.
const ALPHA: f64 = 15.0;

const BOOSTERS: [(&str, f64); 44] = [
    ("absolutely", B_INCR),
    ("amazingly", B_INCR),
    ("completely", B_INCR),
    ("considerably", B_INCR),
    ("decidedly", B_INCR),
    ("deeply", B_INCR),
    ("enormously", B_INCR),
    ("entirely", B_INCR),
    ("especially", B_INCR),
    ("exceptionally", B_INCR),
    ("extremely", B_INCR),
    ("greatly", B_INCR),
    ("highly", B_INCR),
    ("hugely", B_INCR),
    ("incredibly", B_INCR),
    ("intensely", B_INCR),
    ("more", B_INCR),
    ("most", B_INCR),
    ("particularly", B_INCR),
    ("purely", B_INCR),
    ("quite", B_INCR),
    ("really", B_INCR),
    ("remarkably", B_INCR),
    ("so", B_INCR),
    ("substantially", B_INCR),
    ("thoroughly", B_INCR),
    ("totally", B_INCR),
    ("tremendously", B_INCR),
    ("unbelievably", B_INCR),
    ("utterly", B_INCR),
    ("very", B_INCR),
    ("almost", B_DECR),
    ("barely", B_DECR),
    ("hardly", B_DECR),
    ("kinda", B_DECR),
    ("less", B_DECR),
    ("little", B_DECR),
    ("marginally", B_DECR),
    ("occasionally", B_DECR),
    ("partly", B_DECR),
    ("scarcely", B_DECR),
    ("slightly", B_DECR),
    ("somewhat", B_DECR),
    ("sorta", B_DECR),
];

const NEGATIONS: [&str; 22] = [
    "not", "no", "never", "none", "nope", "nor", "neither", "nothing", "nowhere", "without",
    "cannot", "aint", "arent", "cant", "couldnt", "didnt", "doesnt", "dont", "isnt", "wasnt",
    "wont", "rarely",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompoundScores {
    /// Normalized total valence, rounded to 4 places.
    pub compound: f64,
    /// Share of positive weight, rounded to 3 places.
    pub pos: f64,
    pub neu: f64,
    pub neg: f64,
}

struct Token<'a> {
    raw: &'a str,
    lower: String,
    sentence: usize,
}

pub fn score(text: &str) -> CompoundScores {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return CompoundScores {
            compound: 0.0,
            pos: 0.0,
            neu: 0.0,
            neg: 0.0,
        };
    }

    let shouted = tokens.iter().filter(|t| is_shouting(t.raw)).count();
    let cap_diff = shouted > 0 && shouted < tokens.len();

    let mut sentiments: Vec<f64> = (0..tokens.len())
        .map(|i| token_valence(&tokens, i, cap_diff))
        .collect();
    apply_but_rule(&tokens, &mut sentiments);

    let punct = punctuation_emphasis(text);
    let mut sum: f64 = sentiments.iter().sum();
    if sum > 0.0 {
        sum += punct;
    } else if sum < 0.0 {
        sum -= punct;
    }
    let compound = normalize(sum);

    let mut pos_sum: f64 = sentiments.iter().filter(|s| **s > 0.0).map(|s| s + 1.0).sum();
    let mut neg_sum: f64 = sentiments.iter().filter(|s| **s < 0.0).map(|s| s - 1.0).sum();
    let neu_count = sentiments.iter().filter(|s| **s == 0.0).count() as f64;

    if pos_sum > neg_sum.abs() {
        pos_sum += punct;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= punct;
    }

    let total = pos_sum + neg_sum.abs() + neu_count;
    CompoundScores {
        compound: round_to(compound, 4),
        pos: round_to((pos_sum / total).abs(), 3),
        neu: round_to((neu_count / total).abs(), 3),
        neg: round_to((neg_sum / total).abs(), 3),
    }
}

/// Positive at or above 0.05, negative at or below -0.05.
pub fn label(compound: f64) -> SentimentLabel {
    if compound >= 0.05 {
        SentimentLabel::Positive
    } else if compound <= -0.05 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut sentence = 0;
    for piece in text.split_whitespace() {
        let raw = piece.trim_matches(|c: char| !c.is_alphanumeric());
        if !raw.is_empty() {
            tokens.push(Token {
                raw,
                lower: raw.to_lowercase().replace('\u{2019}', "'"),
                sentence,
            });
        }
        let closed = piece.trim_end_matches(['"', '\'', ')', '\u{201d}', '\u{2019}']);
        if closed.ends_with(['.', '!', '?']) {
            sentence += 1;
        }
    }
    tokens
}

fn token_valence(tokens: &[Token<'_>], i: usize, cap_diff: bool) -> f64 {
    let token = &tokens[i];
    if booster(&token.lower).is_some() {
        return 0.0;
    }
    if token.lower == "kind" && tokens.get(i + 1).is_some_and(|next| next.lower == "of") {
        return 0.0;
    }
    let Some(&[base]) = LEXICON.get(token.lower.as_str()) else {
        return 0.0;
    };

    let mut valence = base;
    if cap_diff && is_shouting(token.raw) {
        valence += C_INCR.copysign(valence);
    }

    for distance in 1..=3 {
        let Some(prev) = i.checked_sub(distance).map(|j| &tokens[j]) else {
            break;
        };
        if prev.sentence != token.sentence {
            break;
        }
        if LEXICON.contains_key(prev.lower.as_str()) {
            continue;
        }
        let mut scalar = booster_scalar(prev, valence, cap_diff);
        if distance == 2 {
            scalar *= 0.95;
        } else if distance == 3 {
            scalar *= 0.9;
        }
        valence += scalar;
        if is_negation(&prev.lower) {
            valence *= N_SCALAR;
        }
    }
    valence
}

fn booster_scalar(word: &Token<'_>, valence: f64, cap_diff: bool) -> f64 {
    let Some(mut scalar) = booster(&word.lower) else {
        return 0.0;
    };
    if valence < 0.0 {
        scalar = -scalar;
    }
    if cap_diff && is_shouting(word.raw) {
        scalar += C_INCR.copysign(valence);
    }
    scalar
}

fn apply_but_rule(tokens: &[Token<'_>], sentiments: &mut [f64]) {
    let mut start = 0;
    while start < tokens.len() {
        let sentence = tokens[start].sentence;
        let end = tokens[start..]
            .iter()
            .position(|t| t.sentence != sentence)
            .map_or(tokens.len(), |offset| start + offset);

        if let Some(offset) = tokens[start..end].iter().position(|t| t.lower == "but") {
            let but = start + offset;
            for s in &mut sentiments[start..but] {
                *s *= 0.5;
            }
            for s in &mut sentiments[but + 1..end] {
                *s *= 1.5;
            }
        }
        start = end;
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(4) as f64;
    let questions = text.matches('?').count();
    let question_amp = match questions {
        0 | 1 => 0.0,
        2..=3 => questions as f64 * 0.18,
        _ => 0.96,
    };
    exclamations * 0.292 + question_amp
}

fn normalize(sum: f64) -> f64 {
    (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn booster(word: &str) -> Option<f64> {
    BOOSTERS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|&(_, scalar)| scalar)
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.contains("n't")
}

fn is_shouting(word: &str) -> bool {
    word.chars().any(char::is_alphabetic)
        && word
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_positive_word() {
        let s = score("The service was good.");
        assert_eq!(s.compound, 0.4404);
        assert_eq!(s.pos, 0.492);
        assert_eq!(s.neu, 0.508);
        assert_eq!(s.neg, 0.0);
    }

    #[test]
    fn test_negation() {
        let s = score("The service was not good.");
        assert_eq!(s.compound, -0.3412);
        assert_eq!(label(s.compound), SentimentLabel::Negative);
    }

    #[test]
    fn test_negation_with_typographic_apostrophe() {
        let curly = score("The food wasn\u{2019}t good.");
        assert_eq!(curly.compound, -0.3412);
        assert_eq!(curly, score("The food wasn't good."));
    }

    #[test]
    fn test_booster() {
        assert_eq!(score("The service was very good.").compound, 0.4927);
    }

    #[test]
    fn test_caps_emphasis() {
        assert_eq!(score("The service was GOOD.").compound, 0.5622);
    }

    #[test]
    fn test_exclamation() {
        assert_eq!(score("The service was good!").compound, 0.4926);
    }

    #[test]
    fn test_but_shifts_weight_to_second_clause() {
        let s = score("The food was good, but the service was horrible.");
        assert!(s.compound < -0.05);
        assert_eq!(label(s.compound), SentimentLabel::Negative);
    }

    #[test]
    fn test_negation_does_not_cross_sentences() {
        let s = score("They did not. Good.");
        assert!(s.compound > 0.0);
    }

    #[test]
    fn test_kind_of_is_not_positive() {
        let s = score("It was kind of late.");
        assert_eq!(s.compound, 0.0);
        assert_eq!(s.neu, 1.0);
    }

    #[test]
    fn test_empty_text() {
        let s = score("   ");
        assert_eq!(s.compound, 0.0);
        assert_eq!(label(s.compound), SentimentLabel::Neutral);
    }

    #[test]
    fn test_proportions_sum_to_one() {
        let s = score("Rescue teams found survivors, but the flood killed dozens and destroyed homes.");
        assert!((s.pos + s.neu + s.neg - 1.0).abs() < 0.01);
        assert!(s.neg > s.pos);
    }

    #[test]
    fn test_label_thresholds() {
        assert_eq!(label(0.05), SentimentLabel::Positive);
        assert_eq!(label(0.0499), SentimentLabel::Neutral);
        assert_eq!(label(-0.05), SentimentLabel::Negative);
    }
}
