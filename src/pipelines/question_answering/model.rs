use std::{fmt::Display, path::PathBuf};

use burn::{
    module::AutodiffModule,
    tensor::{backend::AutodiffBackend, Tensor},
    train::TrainStep,
};

use super::{
    batcher::{Infer, Train},
    Config, Output,
};

/// A trait for models that can be used for Question Answering
pub trait Model<B>: AutodiffModule<B> + TrainStep<Train<B>, Output<B>> + Display
where
    B: AutodiffBackend,
{
    /// The model configuration
    type Config: ModelConfig;

    /// Perform a forward pass
    fn forward(&self, item: Train<B>) -> Output<B>;

    /// Defines forward pass for inference, returning start and end logits: [batch_size, seq_length]
    fn infer(&self, input: Infer<B>) -> (Tensor<B, 2>, Tensor<B, 2>);

    /// Load a model from a file
    fn load_from_safetensors(
        device: &B::Device,
        model_file: PathBuf,
        config: Self::Config,
    ) -> anyhow::Result<Self>;

    /// Grow or shrink the word embedding table to `vocab_size` rows, keeping existing rows
    fn resize_token_embeddings(self, vocab_size: usize) -> Self;
}

/// A trait for configs that can be used for Question Answering models
pub trait ModelConfig: burn::config::Config + Clone {
    /// Initialize the model
    fn init<B: AutodiffBackend>(&self, device: &B::Device) -> impl Model<B>;

    /// Load a pretrained model configuration
    fn load_pretrained(
        config_file: PathBuf,
        hidden_dropout_prob: f64,
        max_seq_length: usize,
    ) -> impl std::future::Future<Output = anyhow::Result<Self>> + Send;

    /// Return the Config needed for the question answering pipeline
    fn get_config(&self) -> Config;

    /// Use a different padding token, e.g. after aliasing it to the end-of-sequence token
    fn set_pad_token_id(&mut self, pad_token_id: usize);

    /// Record a resized word embedding table
    fn set_vocab_size(&mut self, vocab_size: usize);
}
