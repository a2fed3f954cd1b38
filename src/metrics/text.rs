use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ARTICLES: Regex = Regex::new(r"\b(a|an|the)\b").unwrap();
}

/// Answer normalization used for F1 and exact match: lowercase, drop punctuation and the
/// articles "a", "an" and "the", then collapse whitespace
pub fn normalize_answer(text: &str) -> String {
    let lower: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();

    ARTICLES
        .replace_all(&lower, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase alphanumeric tokens, treating every other character as a separator
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Count every contiguous run of `n` tokens
pub fn ngrams(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();

    if n == 0 {
        return counts;
    }

    for gram in tokens.windows(n) {
        *counts.entry(gram).or_insert(0) += 1;
    }

    counts
}

/// The number of n-grams two count tables share, each clipped to its count in `reference`
pub fn overlap(candidate: &HashMap<&[String], usize>, reference: &HashMap<&[String], usize>) -> usize {
    candidate
        .iter()
        .map(|(gram, count)| (*count).min(reference.get(gram).copied().unwrap_or(0)))
        .sum()
}

/// Harmonic mean of precision and recall, 0 when either is 0
pub fn f_measure(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}
