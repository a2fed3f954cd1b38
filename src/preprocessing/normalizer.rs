use lazy_static::lazy_static;
use regex::Regex;

use super::{stemmer, stopwords};

lazy_static! {
    static ref URLS: Regex = Regex::new(r"http\S+|www\S+|https\S+").unwrap();
    static ref MENTIONS: Regex = Regex::new(r"@\w+|#").unwrap();
    static ref NON_ALPHANUMERIC: Regex = Regex::new(r"[^A-Za-z0-9 ]+").unwrap();
}

/// Fused words the Treebank word tokenizer splits in two
static CONTRACTIONS: &[(&str, &str)] = &[
    ("can", "not"),
    ("gim", "me"),
    ("gon", "na"),
    ("got", "ta"),
    ("lem", "me"),
    ("wan", "na"),
];

/// Normalize raw text into a space-separated string of stemmed, non-stopword tokens.
///
/// The transformation is lossy and irreversible: URLs, mentions, punctuation and stopwords are
/// discarded, and the remaining words are reduced to their Porter stems.
pub fn normalize(text: &str) -> String {
    let text = URLS.replace_all(text, "");
    let text = MENTIONS.replace_all(&text, "");
    let text = NON_ALPHANUMERIC.replace_all(&text, "");

    text.split_whitespace()
        .flat_map(split_contraction)
        .filter(|word| !stopwords::is_stopword(word))
        .map(stemmer::stem)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split `cannot`, `gonna` and the like into their two words, keeping the original casing
fn split_contraction(word: &str) -> Vec<&str> {
    for (head, tail) in CONTRACTIONS {
        if word.len() != head.len() + tail.len() {
            continue;
        }

        if let (Some(first), Some(second)) = (word.get(..head.len()), word.get(head.len()..)) {
            if first.eq_ignore_ascii_case(head) && second.eq_ignore_ascii_case(tail) {
                return vec![first, second];
            }
        }
    }

    vec![word]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_stopwords_and_stems() {
        assert_eq!(
            normalize("What is the capital of France? It is Paris."),
            "capit franc pari"
        );
    }

    #[test]
    fn test_strips_urls_and_mentions() {
        assert_eq!(
            normalize("Read https://example.com/a?b=c and www.rust-lang.org, @ferris #rustlang"),
            "read rustlang"
        );
    }

    #[test]
    fn test_punctuation_inside_words() {
        // Apostrophes are removed before stopword filtering, so contractions survive as one token
        assert_eq!(normalize("Don't stop-believing"), "dont stopbeliev");
    }

    #[test]
    fn test_splits_contractions() {
        assert_eq!(
            normalize("I cannot believe you're gonna wanna go"),
            "believ your gon na wan na go"
        );
        assert_eq!(normalize("Gimme a CANNOT"), "gim");
        assert_eq!(normalize("canopy gonnas"), "canopi gonna");
    }

    #[test]
    fn test_output_alphabet() {
        let inputs = [
            "Is it possible to learn Rust in 30 days?!",
            "Ünïcödé characters — and emoji 🎉 are dropped",
            "Tabs\tand\nnewlines   collapse",
            "See http://a.b/c (and) https://d.e/f?g=h",
        ];

        for input in inputs {
            let output = normalize(input);

            assert!(!output.contains("http"), "{output}");
            assert!(!output.contains("  "), "{output}");
            assert!(!output.starts_with(' ') && !output.ends_with(' '), "{output}");
            assert!(
                output.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '),
                "{output}"
            );
            assert!(
                output.split(' ').all(|token| !stopwords::is_stopword(token)),
                "{output}"
            );
        }
    }
}
