use burn::{
    tensor::{backend::Backend, Int, Tensor},
    train::metric::{AccuracyInput, Adaptor, LossInput},
};
use derive_new::new;

use crate::utils::tensors;

use super::span::Span;

/// Span prediction output adapted for multiple metrics.
#[derive(new)]
pub struct Output<B: Backend> {
    /// The loss, averaged over the start and end predictions.
    pub loss: Tensor<B, 1>,

    /// Start position logits: [batch_size, seq_length]
    pub start_logits: Tensor<B, 2>,

    /// End position logits: [batch_size, seq_length]
    pub end_logits: Tensor<B, 2>,

    /// The start position targets.
    pub start_positions: Tensor<B, 1, Int>,

    /// The end position targets.
    pub end_positions: Tensor<B, 1, Int>,
}

impl<B: Backend> Output<B> {
    /// The arg-max start and end position for each example
    pub fn predicted_spans(&self) -> Vec<Span> {
        predicted_spans(self.start_logits.clone(), self.end_logits.clone())
    }
}

/// Reduce start and end logits to one span per example
pub fn predicted_spans<B: Backend>(start_logits: Tensor<B, 2>, end_logits: Tensor<B, 2>) -> Vec<Span> {
    let starts = tensors::argmax_positions(start_logits);
    let ends = tensors::argmax_positions(end_logits);

    starts
        .into_iter()
        .zip(ends)
        .map(|(start, end)| Span::new(start, end))
        .collect()
}

/// Accuracy counts start and end predictions as separate examples
impl<B: Backend> Adaptor<AccuracyInput<B>> for Output<B> {
    fn adapt(&self) -> AccuracyInput<B> {
        AccuracyInput::new(
            Tensor::cat(vec![self.start_logits.clone(), self.end_logits.clone()], 0),
            Tensor::cat(
                vec![self.start_positions.clone(), self.end_positions.clone()],
                0,
            ),
        )
    }
}

impl<B: Backend> Adaptor<LossInput<B>> for Output<B> {
    fn adapt(&self) -> LossInput<B> {
        LossInput::new(self.loss.clone())
    }
}
