//! Shared fixtures for the question answering tests

use std::str::FromStr;

use serde_json::json;
use tokenizers::Tokenizer;

use super::Item;

/// The word-level vocabulary of the test tokenizer, in id order
pub static VOCAB: &[&str] = &[
    "[PAD]", "[UNK]", "[CLS]", "[SEP]", "capit", "of", "franc", "is", "pari", "rust", "fast",
    "berlin",
];

static SPECIAL_TOKENS: &[&str] = &["[PAD]", "[UNK]", "[CLS]", "[SEP]"];

/// A whitespace word-level tokenizer that wraps inputs in `[CLS] ... [SEP]`
pub fn tokenizer() -> Tokenizer {
    build(VOCAB, SPECIAL_TOKENS, bert_processing(), "[UNK]")
}

/// Like [`tokenizer`], but its unknown token is missing from the vocabulary, so encoding an
/// out-of-vocabulary word fails
pub fn strict_tokenizer() -> Tokenizer {
    build(VOCAB, SPECIAL_TOKENS, bert_processing(), "[MISSING]")
}

/// A whitespace word-level tokenizer with the given vocabulary, special tokens and no
/// post-processing
pub fn plain_tokenizer(vocab: &[&str], special: &[&str]) -> Tokenizer {
    let unk_token = if vocab.contains(&"[UNK]") { "[UNK]" } else { vocab[0] };

    build(vocab, special, serde_json::Value::Null, unk_token)
}

fn bert_processing() -> serde_json::Value {
    json!({"type": "BertProcessing", "sep": ["[SEP]", 3], "cls": ["[CLS]", 2]})
}

fn build(
    vocab: &[&str],
    special: &[&str],
    post_processor: serde_json::Value,
    unk_token: &str,
) -> Tokenizer {
    let ids: serde_json::Map<_, _> = vocab
        .iter()
        .enumerate()
        .map(|(id, token)| (token.to_string(), json!(id)))
        .collect();

    let added_tokens: Vec<_> = special
        .iter()
        .map(|token| {
            json!({
                "id": vocab.iter().position(|t| t == token),
                "content": token,
                "single_word": false,
                "lstrip": false,
                "rstrip": false,
                "normalized": false,
                "special": true,
            })
        })
        .collect();

    let definition = json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": added_tokens,
        "normalizer": null,
        "pre_tokenizer": {"type": "Whitespace"},
        "post_processor": post_processor,
        "decoder": null,
        "model": {"type": "WordLevel", "vocab": ids, "unk_token": unk_token},
    });

    Tokenizer::from_str(&definition.to_string()).expect("valid test tokenizer")
}

/// A minimal question answering item
#[derive(Clone, Debug)]
pub struct TestItem {
    question: String,
    answer: String,
    answer_start: Option<usize>,
}

impl TestItem {
    pub fn new(question: &str, answer: &str) -> Self {
        Self {
            question: question.to_string(),
            answer: answer.to_string(),
            answer_start: None,
        }
    }

    pub fn with_answer_start(mut self, answer_start: usize) -> Self {
        self.answer_start = Some(answer_start);
        self
    }
}

impl Item for TestItem {
    fn question(&self) -> &str {
        &self.question
    }

    fn answer(&self) -> &str {
        &self.answer
    }

    fn answer_start(&self) -> Option<usize> {
        self.answer_start
    }
}
