use super::text::{ngrams, overlap, tokenize};

/// The longest n-gram order BLEU considers
pub const MAX_ORDER: usize = 4;

/// Corpus-level BLEU-4 with one reference per prediction.
///
/// Clipped n-gram matches and candidate n-gram totals are summed over the whole corpus before the
/// modified precisions are combined with a geometric mean. Any order without a match makes the
/// score 0. The brevity penalty compares total prediction and reference lengths.
pub fn corpus_bleu<S: AsRef<str>>(predictions: &[S], references: &[S]) -> f64 {
    let mut matches = [0usize; MAX_ORDER];
    let mut possible = [0usize; MAX_ORDER];
    let mut prediction_length = 0;
    let mut reference_length = 0;

    for (prediction, reference) in predictions.iter().zip(references) {
        let prediction = tokenize(prediction.as_ref());
        let reference = tokenize(reference.as_ref());

        prediction_length += prediction.len();
        reference_length += reference.len();

        for order in 1..=MAX_ORDER {
            let candidate = ngrams(&prediction, order);

            matches[order - 1] += overlap(&candidate, &ngrams(&reference, order));
            possible[order - 1] += prediction.len().saturating_sub(order - 1);
        }
    }

    if prediction_length == 0 || reference_length == 0 {
        return 0.0;
    }

    let mut log_precision = 0.0;
    for (matched, possible) in matches.iter().zip(possible) {
        if *matched == 0 || possible == 0 {
            return 0.0;
        }

        log_precision += (*matched as f64 / possible as f64).ln();
    }

    let ratio = prediction_length as f64 / reference_length as f64;
    let brevity_penalty = if ratio > 1.0 {
        1.0
    } else {
        (1.0 - 1.0 / ratio).exp()
    };

    brevity_penalty * (log_precision / MAX_ORDER as f64).exp()
}
