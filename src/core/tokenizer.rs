// File: src/core/tokenizer.rs
use regex::Regex;
use std::sync::LazyLock;

use crate::core::types::TermCounts;

/// Tokens are any run between non-word characters.
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").unwrap());
static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").unwrap());

/// Tokens this long (in characters) or longer are dropped.
pub const MAX_TERM_CHARS: usize = 50;

/// NLTK English stop words.
pub const STOP_WORDS: &[&str] = &[
    "ourselves", "hers", "between", "yourself", "but", "again", "there", "about", "once",
    "during", "out", "very", "having", "with", "they", "own", "an", "be", "some", "for", "do",
    "its", "yours", "such", "into", "of", "most", "itself", "other", "off", "is", "s", "am",
    "or", "who", "as", "from", "him", "each", "the", "themselves", "until", "below", "are",
    "we", "these", "your", "his", "through", "don", "nor", "me", "were", "her", "more",
    "himself", "this", "down", "should", "our", "their", "while", "above", "both", "up", "to",
    "ours", "had", "she", "all", "no", "when", "at", "any", "before", "them", "same", "and",
    "been", "have", "in", "will", "on", "does", "yourselves", "then", "that", "because",
    "what", "over", "why", "so", "can", "did", "not", "now", "under", "he", "you", "herself",
    "has", "just", "where", "too", "only", "myself", "which", "those", "i", "after", "few",
    "whom", "t", "being", "if", "theirs", "my", "against", "a", "by", "doing", "it", "how",
    "further", "was", "here", "than",
];

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Deletes ASCII punctuation (it is not a separator, so "don't" becomes "dont")
/// and lower-cases what remains.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect::<String>()
        .to_lowercase()
}

/// Normalized tokens before filtering. May contain empty strings from
/// leading or trailing separators.
pub fn split_tokens(normalized: &str) -> impl Iterator<Item = &str> {
    NON_WORD.split(normalized)
}

/// Whether a raw token survives into the term counts.
pub fn keep_token(token: &str) -> bool {
    !token.is_empty()
        && !is_stop_word(token)
        && !DIGIT.is_match(token)
        && token.chars().count() < MAX_TERM_CHARS
}

/// Turns raw document text into per-term occurrence counts.
/// Pure; both training and scoring go through here.
pub fn term_counts(text: &str) -> TermCounts {
    let normalized = normalize(text);
    let mut counts = TermCounts::new();
    for token in split_tokens(&normalized).filter(|t| keep_token(t)) {
        *counts.entry(token.to_string()).or_insert(0) += 1;
    }
    counts
}
