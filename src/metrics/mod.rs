//! Text-overlap metrics comparing predicted answers with reference answers

/// Corpus BLEU
pub mod bleu;

/// SQuAD-style F1 and exact match
pub mod f1;

/// ROUGE-1, ROUGE-2 and ROUGE-L
pub mod rouge;

/// Shared text handling
pub mod text;

use serde::{Deserialize, Serialize};

pub use rouge::Rouge;

/// Aggregate scores over a set of predictions
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    /// Mean token-overlap F1
    pub f1: f64,

    /// Fraction of exact matches
    pub exact_match: f64,

    /// Corpus BLEU-4
    pub bleu: f64,

    /// Mean ROUGE F-measures
    pub rouge: Rouge,
}

/// Score predictions against references, pairing them by position
pub fn compute<S: AsRef<str>>(predictions: &[S], references: &[S]) -> Scores {
    Scores {
        f1: f1::mean_f1(predictions, references),
        exact_match: f1::mean_exact_match(predictions, references),
        bleu: bleu::corpus_bleu(predictions, references),
        rouge: rouge::mean_rouge(predictions, references),
    }
}
