use std::collections::HashMap;

use super::text::{f_measure, normalize_answer};

/// Token-overlap F1 between a predicted answer and the reference answer, after answer
/// normalization. When either side normalizes to nothing, the score is 1 if both do and 0
/// otherwise.
pub fn f1_score(prediction: &str, reference: &str) -> f64 {
    let prediction = normalize_answer(prediction);
    let reference = normalize_answer(reference);

    let predicted: Vec<&str> = prediction.split_whitespace().collect();
    let expected: Vec<&str> = reference.split_whitespace().collect();

    if predicted.is_empty() || expected.is_empty() {
        return (predicted == expected) as u8 as f64;
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in &expected {
        *counts.entry(token).or_insert(0) += 1;
    }

    let mut common = 0;
    for token in &predicted {
        if let Some(count) = counts.get_mut(token) {
            if *count > 0 {
                *count -= 1;
                common += 1;
            }
        }
    }

    if common == 0 {
        return 0.0;
    }

    f_measure(
        common as f64 / predicted.len() as f64,
        common as f64 / expected.len() as f64,
    )
}

/// True when the prediction equals the reference after answer normalization
pub fn exact_match(prediction: &str, reference: &str) -> bool {
    normalize_answer(prediction) == normalize_answer(reference)
}

/// Mean F1 over prediction/reference pairs
pub fn mean_f1<S: AsRef<str>>(predictions: &[S], references: &[S]) -> f64 {
    mean(predictions, references, f1_score)
}

/// Fraction of predictions that exactly match their reference
pub fn mean_exact_match<S: AsRef<str>>(predictions: &[S], references: &[S]) -> f64 {
    mean(predictions, references, |p, r| exact_match(p, r) as u8 as f64)
}

fn mean<S: AsRef<str>>(predictions: &[S], references: &[S], score: impl Fn(&str, &str) -> f64) -> f64 {
    let n = predictions.len().min(references.len());

    if n == 0 {
        return 0.0;
    }

    let total: f64 = predictions
        .iter()
        .zip(references)
        .map(|(p, r)| score(p.as_ref(), r.as_ref()))
        .sum();

    total / n as f64
}
