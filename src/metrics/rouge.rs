use serde::{Deserialize, Serialize};

use super::text::{f_measure, ngrams, overlap, tokenize};

/// ROUGE F-measures
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rouge {
    /// Unigram overlap
    pub rouge1: f64,

    /// Bigram overlap
    pub rouge2: f64,

    /// Longest common subsequence
    #[serde(rename = "rougeL")]
    pub rouge_l: f64,
}

/// Score a single prediction against its reference
pub fn score(prediction: &str, reference: &str) -> Rouge {
    let prediction = tokenize(prediction);
    let reference = tokenize(reference);

    Rouge {
        rouge1: rouge_n(&prediction, &reference, 1),
        rouge2: rouge_n(&prediction, &reference, 2),
        rouge_l: rouge_l(&prediction, &reference),
    }
}

/// Mean of the per-pair scores
pub fn mean_rouge<S: AsRef<str>>(predictions: &[S], references: &[S]) -> Rouge {
    let n = predictions.len().min(references.len());

    if n == 0 {
        return Rouge::default();
    }

    let total = predictions
        .iter()
        .zip(references)
        .map(|(p, r)| score(p.as_ref(), r.as_ref()))
        .fold(Rouge::default(), |acc, s| Rouge {
            rouge1: acc.rouge1 + s.rouge1,
            rouge2: acc.rouge2 + s.rouge2,
            rouge_l: acc.rouge_l + s.rouge_l,
        });

    Rouge {
        rouge1: total.rouge1 / n as f64,
        rouge2: total.rouge2 / n as f64,
        rouge_l: total.rouge_l / n as f64,
    }
}

fn rouge_n(prediction: &[String], reference: &[String], n: usize) -> f64 {
    let predicted = ngrams(prediction, n);
    let expected = ngrams(reference, n);

    let predicted_total: usize = predicted.values().sum();
    let expected_total: usize = expected.values().sum();

    if predicted_total == 0 || expected_total == 0 {
        return 0.0;
    }

    let matched = overlap(&predicted, &expected) as f64;

    f_measure(
        matched / predicted_total as f64,
        matched / expected_total as f64,
    )
}

fn rouge_l(prediction: &[String], reference: &[String]) -> f64 {
    if prediction.is_empty() || reference.is_empty() {
        return 0.0;
    }

    let lcs = lcs_length(prediction, reference) as f64;

    f_measure(lcs / prediction.len() as f64, lcs / reference.len() as f64)
}

/// Length of the longest common subsequence, one table row at a time
fn lcs_length(a: &[String], b: &[String]) -> usize {
    let mut previous = vec![0; b.len() + 1];
    let mut current = vec![0; b.len() + 1];

    for x in a {
        for (j, y) in b.iter().enumerate() {
            current[j + 1] = if x == y {
                previous[j] + 1
            } else {
                current[j].max(previous[j + 1])
            };
        }

        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}
