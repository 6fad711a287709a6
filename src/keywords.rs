//! Frequency-based keyword extraction.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Number of keywords returned with each report.
pub const DEFAULT_KEYWORD_LIMIT: usize = 10;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z]{4,}\b").expect("word pattern is valid"));

// Every entry of four or more letters from the service's keyword stop list.
// Its shorter entries ("the", "and", "for", "his", ...) never match `WORD`.
const STOP_WORDS: [&str; 19] = [
    "with", "from", "were", "been", "have", "does", "will", "would", "could", "should", "might",
    "this", "that", "these", "those", "they", "them", "their", "your",
];

/// Return up to `limit` of the most frequent non-stop-words of at least four
/// letters. Ties keep the order in which the words first appear.
pub fn extract_keywords(text: &str, limit: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

    for (position, m) in WORD.find_iter(&lowered).enumerate() {
        let word = m.as_str();
        if STOP_WORDS.contains(&word) {
            continue;
        }
        counts.entry(word).or_insert((0, position)).0 += 1;
    }

    counts
        .into_iter()
        .sorted_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_b.cmp(count_a).then(first_a.cmp(first_b))
        })
        .take(limit)
        .map(|(word, _)| word.to_string())
        .collect()
}
