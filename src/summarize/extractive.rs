//! Extractive summarization by heuristic sentence scoring.
//!
//! No model is involved: sentences are scored on position, length and the
//! presence of reporting verbs, and the best few are stitched back together
//! in their original order.
//!
//! | Signal | Points |
//! |--------|--------|
//! | First sentence | 3 |
//! | Last sentence | 1 |
//! | 10 to 25 words | 2 |
//! | Each of `said`, `announced`, `reported`, `according`, `will`, `new` | 1 |
//!
//! Cue words match as substrings of the lowercased sentence, so `renewed`
//! counts for `new`.

use itertools::Itertools;

/// Words whose presence suggests a sentence carries news.
pub const CUE_WORDS: [&str; 6] = ["said", "announced", "reported", "according", "will", "new"];

/// Abbreviations that end in a period without ending a sentence.
const ABBREVIATIONS: [&str; 33] = [
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "ft", "gen", "gov", "sen", "rep",
    "lt", "col", "sgt", "capt", "cmdr", "adm", "inc", "ltd", "co", "corp", "vs", "etc", "jan",
    "feb", "aug", "sept", "oct", "nov", "dec",
];

const CLOSERS: [char; 6] = ['"', '\'', ')', ']', '\u{201d}', '\u{2019}'];
const OPENERS: [char; 5] = ['"', '\'', '(', '\u{201c}', '\u{2018}'];

/// Summarize `text` by keeping its `num_sentences` highest-scoring sentences.
///
/// Text that already has `num_sentences` sentences or fewer is returned
/// unchanged. Among equal scores the later sentence wins.
pub fn summarize(text: &str, num_sentences: usize) -> String {
    let sentences = split_sentences(text);
    if sentences.len() <= num_sentences {
        return text.to_string();
    }

    let last = sentences.len() - 1;
    sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| (score_sentence(sentence, i, last), i, *sentence))
        .sorted_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)))
        .take(num_sentences)
        .sorted_by_key(|&(_, i, _)| i)
        .map(|(_, _, sentence)| sentence)
        .join(" ")
}

fn score_sentence(sentence: &str, index: usize, last: usize) -> usize {
    let mut score = 0;

    if index == 0 {
        score += 3;
    } else if index == last {
        score += 1;
    }

    if (10..=25).contains(&sentence_words(sentence)) {
        score += 2;
    }

    let lowered = sentence.to_lowercase();
    score + CUE_WORDS.iter().filter(|cue| lowered.contains(*cue)).count()
}

/// Words in a sentence, ignoring tokens that are pure punctuation.
fn sentence_words(sentence: &str) -> usize {
    sentence
        .split_whitespace()
        .filter(|token| token.chars().any(char::is_alphanumeric))
        .count()
}

/// Split prose into sentences.
///
/// A sentence ends at `.`, `!` or `?` (plus any trailing quotes or
/// brackets) when followed by whitespace and then a capital letter, digit
/// or opening quote. Periods after common abbreviations, initials and
/// dotted forms like `U.S.` do not end a sentence. Line breaks always do,
/// so unpunctuated headlines stay separate from the body.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];

        if c == '\n' {
            push_trimmed(&mut sentences, &text[start..pos]);
            start = pos + c.len_utf8();
            i += 1;
            continue;
        }

        if matches!(c, '.' | '!' | '?') {
            let mut j = i + 1;
            while j < chars.len()
                && (matches!(chars[j].1, '.' | '!' | '?') || CLOSERS.contains(&chars[j].1))
            {
                j += 1;
            }
            let end = chars.get(j).map_or(text.len(), |&(p, _)| p);
            let followed_by_space = chars.get(j).is_none_or(|&(_, ch)| ch.is_whitespace());
            let starts_new = chars[j..]
                .iter()
                .map(|&(_, ch)| ch)
                .find(|ch| !ch.is_whitespace())
                .is_none_or(|ch| ch.is_uppercase() || ch.is_ascii_digit() || OPENERS.contains(&ch));

            if followed_by_space && starts_new && !(c == '.' && is_abbreviation(&text[start..pos])) {
                push_trimmed(&mut sentences, &text[start..end]);
                start = end;
            }
            i = j;
            continue;
        }

        i += 1;
    }

    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

fn push_trimmed<'a>(out: &mut Vec<&'a str>, s: &'a str) {
    let s = s.trim();
    if !s.is_empty() {
        out.push(s);
    }
}

/// Whether the last word of `before` (the text preceding a period) is an
/// abbreviation, an initial, or a dotted form.
fn is_abbreviation(before: &str) -> bool {
    let word = before
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(|c| OPENERS.contains(&c));
    if word.is_empty() {
        return false;
    }
    if word.chars().count() == 1 && word.chars().all(char::is_alphabetic) {
        return true;
    }
    if word.contains('.') {
        return true;
    }
    ABBREVIATIONS.contains(&word.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORY: &str = "The mayor announced a new housing plan on Monday. \
        It rained. \
        Officials said the plan will fund two thousand homes across the city over five years. \
        Critics were unimpressed. \
        Construction starts next spring.";

    #[test]
    fn test_split_sentences_handles_abbreviations_and_quotes() {
        let text = "Mr. Smith went to Washington. He met Dr. Jones at 3.30 p.m. on Friday! \
                    Was it useful? \"Yes,\" he said.";
        assert_eq!(
            split_sentences(text),
            vec![
                "Mr. Smith went to Washington.",
                "He met Dr. Jones at 3.30 p.m. on Friday!",
                "Was it useful?",
                "\"Yes,\" he said.",
            ]
        );
    }

    #[test]
    fn test_split_sentences_on_line_breaks() {
        let text = "Headline without period\n\nBody sentence one. Body two.";
        assert_eq!(
            split_sentences(text),
            vec!["Headline without period", "Body sentence one.", "Body two."]
        );
    }

    #[test]
    fn test_split_sentences_keeps_dotted_forms() {
        let text = "Talks with the U.S. Treasury resumed. They ended at noon.";
        assert_eq!(
            split_sentences(text),
            vec!["Talks with the U.S. Treasury resumed.", "They ended at noon."]
        );
    }

    #[test]
    fn test_score_sentence() {
        let first = "The mayor announced a new housing plan on Monday.";
        assert_eq!(score_sentence(first, 0, 4), 5);
        let middle = "Officials said the plan will fund two thousand homes across the city over five years.";
        assert_eq!(score_sentence(middle, 2, 4), 4);
        assert_eq!(score_sentence("Construction starts next spring.", 4, 4), 1);
        assert_eq!(score_sentence("It rained.", 1, 4), 0);
    }

    #[test]
    fn test_summarize_picks_top_sentences_in_original_order() {
        let summary = summarize(STORY, 3);
        assert_eq!(
            summary,
            "The mayor announced a new housing plan on Monday. \
             Officials said the plan will fund two thousand homes across the city over five years. \
             Construction starts next spring."
        );
    }

    #[test]
    fn test_summarize_short_text_is_unchanged() {
        let text = "One sentence here.  Another one there.";
        assert_eq!(summarize(text, 3), text);
    }

    #[test]
    fn test_ties_prefer_later_sentences() {
        let text = "Alpha opens. Bravo follows. Charlie follows. Delta follows. Echo closes.";
        // scores: 3, 0, 0, 0, 1
        assert_eq!(summarize(text, 3), "Alpha opens. Delta follows. Echo closes.");
    }
}
