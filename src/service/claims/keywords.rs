//! Keyword extraction from free-text claims

use std::collections::BTreeSet;

/// Shortest token kept as a keyword, in characters
const MIN_KEYWORD_CHARS: usize = 4;

/// Punctuation stripped from both ends of a token
const TRIM_CHARS: &[char] = &['.', ',', '!', '?', ';', ':'];

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "should", "could", "may", "might", "must", "can", "to",
    "for", "of", "in", "on", "at", "by", "with", "from", "up", "about", "into", "through",
    "during", "before", "after", "above", "below", "between", "under", "again", "further", "then",
    "once", "here", "there", "when", "where", "why", "how", "all", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "you", "your", "need", "needs",
];

fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Extract search keywords from a claim
///
/// Tokens are split on whitespace, lowercased and stripped of boundary
/// punctuation. Stop words and tokens of three characters or fewer are
/// dropped. Keywords are stored lowercased, so `Squats` and `squats` collapse
/// into one term.
pub fn extract_keywords(claim: &str) -> BTreeSet<String> {
    claim
        .split_whitespace()
        .map(|word| word.to_lowercase())
        .map(|word| word.trim_matches(TRIM_CHARS).to_string())
        .filter(|word| word.chars().count() >= MIN_KEYWORD_CHARS && !is_stop_word(word))
        .collect()
}
