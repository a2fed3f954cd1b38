use std::sync::Arc;

use burn::{
    data::dataloader::DataLoader,
    tensor::backend::Backend,
    train::ValidStep,
};
use serde::{Deserialize, Serialize};
use tokenizers::Tokenizer;

use crate::{
    metrics::{self, Scores},
    utils::tensors,
};

use super::{batcher::Train, span::Span, Output};

/// Scores for a fine-tuned model on the held-out split
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Evaluation {
    /// The number of evaluated examples
    pub samples: usize,

    /// The metric values
    #[serde(flatten)]
    pub scores: Scores,
}

impl Evaluation {
    /// Write the evaluation to `evaluation.json` in the artifact directory
    pub fn save_to(&self, artifact_dir: &str) -> anyhow::Result<()> {
        let path = format!("{artifact_dir}/evaluation.json");

        std::fs::write(&path, serde_json::to_string_pretty(self)?)
            .map_err(|e| anyhow!("Unable to write {}: {}", path, e))
    }
}

/// Run the validation step over every batch, decode the predicted spans and score them against
/// the reference answers
pub fn evaluate<B, M>(
    model: &M,
    dataloader: Arc<dyn DataLoader<Train<B>>>,
    tokenizer: &Tokenizer,
) -> anyhow::Result<Evaluation>
where
    B: Backend,
    M: ValidStep<Train<B>, Output<B>>,
{
    let mut predictions = Vec::new();
    let mut references = Vec::new();

    for batch in dataloader.iter() {
        let tokens = tensors::rows(batch.input.tokens.clone());
        let answers = batch.answers.clone();

        let output = model.step(batch);

        predictions.extend(decode_spans(tokenizer, &tokens, &output.predicted_spans())?);
        references.extend(answers);
    }

    for (prediction, reference) in predictions.iter().zip(&references).take(5) {
        log::debug!("predicted {prediction:?}, expected {reference:?}");
    }

    let evaluation = Evaluation {
        samples: predictions.len(),
        scores: metrics::compute(&predictions, &references),
    };

    log::info!(
        "Evaluated {} examples: f1 {:.4}, exact match {:.4}, bleu {:.4}, rouge1 {:.4}, rouge2 {:.4}, rougeL {:.4}",
        evaluation.samples,
        evaluation.scores.f1,
        evaluation.scores.exact_match,
        evaluation.scores.bleu,
        evaluation.scores.rouge.rouge1,
        evaluation.scores.rouge.rouge2,
        evaluation.scores.rouge.rouge_l,
    );

    Ok(evaluation)
}

/// Decode each inclusive token span back to text, skipping special tokens. Spans ending before
/// they start decode to the empty string.
pub fn decode_spans(
    tokenizer: &Tokenizer,
    tokens: &[Vec<i64>],
    spans: &[Span],
) -> anyhow::Result<Vec<String>> {
    tokens
        .iter()
        .zip(spans)
        .map(|(row, span)| {
            if span.end < span.start || span.start >= row.len() {
                return Ok(String::new());
            }

            let end = span.end.min(row.len() - 1);
            let ids: Vec<u32> = row[span.start..=end].iter().map(|id| *id as u32).collect();

            tokenizer
                .decode(&ids, true)
                .map_err(|e| anyhow!("Unable to decode predicted span: {}", e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use burn::{
        backend::{ndarray::NdArrayDevice, NdArray},
        data::{dataloader::DataLoaderBuilder, dataset::InMemDataset},
        tensor::{Data, Shape, Tensor},
    };
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::pipelines::question_answering::{
        batcher::Batcher,
        span::LabelStrategy,
        testing::{self, TestItem},
        Config,
    };

    type TestBackend = NdArray<f32>;

    /// Predicts exactly the labeled span
    struct Oracle;

    fn one_hot(positions: &[i64], seq_length: usize) -> Tensor<TestBackend, 2> {
        let values = positions
            .iter()
            .flat_map(|p| (0..seq_length).map(move |i| if i as i64 == *p { 1.0f32 } else { 0.0 }))
            .collect();

        Tensor::from_data(
            Data::new(values, Shape::new([positions.len(), seq_length])),
            &NdArrayDevice::Cpu,
        )
    }

    impl ValidStep<Train<TestBackend>, Output<TestBackend>> for Oracle {
        fn step(&self, item: Train<TestBackend>) -> Output<TestBackend> {
            let [_, seq_length] = item.input.tokens.dims();
            let starts = item.start_positions.clone().into_data().convert::<i64>().value;
            let ends = item.end_positions.clone().into_data().convert::<i64>().value;

            Output::new(
                Tensor::from_floats([0.0], &NdArrayDevice::Cpu),
                one_hot(&starts, seq_length),
                one_hot(&ends, seq_length),
                item.start_positions,
                item.end_positions,
            )
        }
    }

    #[test]
    fn test_decode_spans() -> anyhow::Result<()> {
        let tokenizer = testing::tokenizer();
        let tokens = vec![vec![2, 4, 5, 6, 7, 8, 3, 0]; 4];
        let spans = [
            Span::new(5, 5),
            Span::new(1, 3),
            Span::new(5, 2),
            Span::new(0, 0),
        ];

        assert_eq!(
            decode_spans(&tokenizer, &tokens, &spans)?,
            vec!["pari", "capit of franc", "", ""]
        );

        Ok(())
    }

    #[test]
    fn test_evaluate_with_oracle() -> anyhow::Result<()> {
        let config = Config {
            pad_token_id: 0,
            max_position_embeddings: 512,
            hidden_size: 8,
            max_seq_len: Some(8),
            hidden_dropout_prob: 0.1,
            vocab_size: testing::VOCAB.len(),
        };
        let batcher = Batcher::<TestBackend>::new(
            testing::tokenizer(),
            config,
            LabelStrategy::Tokens,
            NdArrayDevice::Cpu,
        );

        let dataloader = DataLoaderBuilder::new(batcher)
            .batch_size(2)
            .build(InMemDataset::new(vec![
                TestItem::new("capit of franc is pari", "pari"),
                TestItem::new("rust fast", "fast"),
                TestItem::new("rust fast", "berlin"),
            ]));

        let evaluation = evaluate(&Oracle, dataloader, &testing::tokenizer())?;

        assert_eq!(evaluation.samples, 3);
        assert!((evaluation.scores.f1 - 2.0 / 3.0).abs() < 1e-9);
        assert!((evaluation.scores.exact_match - 2.0 / 3.0).abs() < 1e-9);

        Ok(())
    }
}
