use std::{cmp::Ordering, path::PathBuf};

use bert_burn::{
    data::BertInferenceBatch,
    model::{BertModel, BertModelOutput},
};
use burn::{
    module::{Module, Param},
    nn::{loss::CrossEntropyLossConfig, Linear, LinearConfig, LinearRecord},
    tensor::{
        backend::{AutodiffBackend, Backend},
        Distribution, Int, Tensor,
    },
};
use derive_new::new;

use crate::pipelines::question_answering::{self, batcher, Output};

use super::Config;

/// Standard deviation of the normal distribution new embedding rows are drawn from
const INITIALIZER_RANGE: f64 = 0.02;

/// BERT for extractive Question Answering
#[derive(Module, Debug, new)]
pub struct Model<B: Backend> {
    /// The base BERT model
    pub model: BertModel<B>,

    /// Linear layer projecting each hidden state to a start and an end logit
    pub qa_outputs: Linear<B>,
}

/// Define model behavior
impl<B: Backend> Model<B> {
    /// Defines forward pass for training
    pub fn forward(
        &self,
        input: BertInferenceBatch<B>,
        start_positions: Tensor<B, 1, Int>,
        end_positions: Tensor<B, 1, Int>,
    ) -> Output<B> {
        let device = &self.model.devices()[0];

        let start_positions = start_positions.to_device(device);
        let end_positions = end_positions.to_device(device);

        let (start_logits, end_logits) = self.infer(input);

        let loss_fn = CrossEntropyLossConfig::new().init(device);

        let start_loss = loss_fn.forward(start_logits.clone(), start_positions.clone());
        let end_loss = loss_fn.forward(end_logits.clone(), end_positions.clone());

        Output {
            loss: (start_loss + end_loss).div_scalar(2.0),
            start_logits,
            end_logits,
            start_positions,
            end_positions,
        }
    }

    /// Defines forward pass for inference, returning start and end logits
    pub fn infer(&self, input: BertInferenceBatch<B>) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let [batch_size, seq_length] = input.tokens.dims();

        let BertModelOutput { hidden_states, .. } = self.model.forward(input);

        let logits = self.qa_outputs.forward(hidden_states);

        let start_logits = logits
            .clone()
            .slice([0..batch_size, 0..seq_length, 0..1])
            .reshape([batch_size, seq_length]);

        let end_logits = logits
            .slice([0..batch_size, 0..seq_length, 1..2])
            .reshape([batch_size, seq_length]);

        (start_logits, end_logits)
    }

    /// Resize the word embedding table to `vocab_size` rows. Existing rows are kept, extra rows
    /// are randomly initialized.
    pub fn resize_token_embeddings(self, vocab_size: usize) -> Self {
        let mut record = self.clone().into_record();
        let embeddings = &mut record.model.embeddings.word_embeddings;

        let weight = embeddings.weight.val();
        let [current, hidden_size] = weight.dims();

        let weight = match vocab_size.cmp(&current) {
            Ordering::Equal => return self,
            Ordering::Less => weight.slice([0..vocab_size, 0..hidden_size]),
            Ordering::Greater => {
                let extra = Tensor::random(
                    [vocab_size - current, hidden_size],
                    Distribution::Normal(0.0, INITIALIZER_RANGE),
                    &weight.device(),
                );

                Tensor::cat(vec![weight, extra], 0)
            }
        };

        log::info!("Resized token embeddings from {current} to {vocab_size} rows");

        embeddings.weight = Param::from(weight);

        self.load_record(record)
    }
}

impl<B: AutodiffBackend> question_answering::Model<B> for Model<B> {
    /// The model configuration
    type Config = Config;

    /// Perform a forward pass
    fn forward(&self, item: batcher::Train<B>) -> Output<B> {
        self.forward(
            BertInferenceBatch {
                tokens: item.input.tokens,
                mask_pad: item.input.mask_pad,
            },
            item.start_positions,
            item.end_positions,
        )
    }

    /// Defines forward pass for inference
    fn infer(&self, input: batcher::Infer<B>) -> (Tensor<B, 2>, Tensor<B, 2>) {
        self.infer(BertInferenceBatch {
            tokens: input.tokens,
            mask_pad: input.mask_pad,
        })
    }

    /// Load a model from a file
    fn load_from_safetensors(
        device: &B::Device,
        model_file: PathBuf,
        config: Self::Config,
    ) -> anyhow::Result<Self> {
        if !model_file.exists() {
            return Err(anyhow!(
                "Model weights not found at {}",
                model_file.display()
            ));
        }

        // Initialize the span head
        let qa_outputs = LinearConfig::new(config.hidden_size, 2).init(device);

        let record = ModelRecord {
            model: BertModel::from_safetensors(model_file, device, config.get_bert_config()),
            qa_outputs: LinearRecord {
                weight: qa_outputs.weight,
                bias: qa_outputs.bias,
            },
        };

        let model = config.init(device).load_record(record);

        Ok(model)
    }

    fn resize_token_embeddings(self, vocab_size: usize) -> Self {
        self.resize_token_embeddings(vocab_size)
    }
}

#[cfg(test)]
mod tests {
    use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::utils::tensors;

    type TestBackend = NdArray<f32>;

    fn config() -> Config {
        Config::new(2, 1, 1e-12, 8, 16, 12, 16, 2, 0.0, "bert".to_string(), 0)
    }

    fn batch<B: Backend>(device: &B::Device) -> BertInferenceBatch<B> {
        BertInferenceBatch {
            tokens: tensors::pad_to::<B>(0, vec![vec![2, 4, 5, 3], vec![2, 9, 3]], 6, device),
            mask_pad: tensors::padding_mask::<B>(&[4, 3], 6, device),
        }
    }

    #[test]
    fn test_infer_shapes() {
        let device = NdArrayDevice::Cpu;
        let model = config().init::<TestBackend>(&device);

        let (start_logits, end_logits) = model.infer(batch(&device));

        assert_eq!(start_logits.dims(), [2, 6]);
        assert_eq!(end_logits.dims(), [2, 6]);
    }

    #[test]
    fn test_forward_loss() {
        let device = NdArrayDevice::Cpu;
        let model = config().init::<Autodiff<TestBackend>>(&device);

        let output = model.forward(
            batch(&device),
            tensors::positions(&[1, 0], &device),
            tensors::positions(&[2, 0], &device),
        );

        assert_eq!(output.loss.dims(), [1]);
        assert_eq!(output.start_logits.dims(), [2, 6]);
        assert!(output.loss.into_scalar() > 0.0);
    }

    #[test]
    fn test_resize_token_embeddings() {
        let device = NdArrayDevice::Cpu;
        let model = config().init::<TestBackend>(&device);

        let before = model.clone().into_record().model.embeddings.word_embeddings.weight.val();

        let grown = model.clone().resize_token_embeddings(14);
        let after = grown.into_record().model.embeddings.word_embeddings.weight.val();

        assert_eq!(after.dims(), [14, 8]);
        assert_eq!(
            after.slice([0..12, 0..8]).into_data().value,
            before.into_data().value
        );

        let shrunk = model.resize_token_embeddings(10);
        let after = shrunk.into_record().model.embeddings.word_embeddings.weight.val();

        assert_eq!(after.dims(), [10, 8]);
    }
}
