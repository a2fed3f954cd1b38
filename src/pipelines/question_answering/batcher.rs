use std::fmt::Debug;

use burn::{
    data::dataloader,
    tensor::{backend::Backend, Bool, Int, Tensor},
};
use derive_new::new;
use tokenizers::{Encoding, Tokenizer, TruncationParams};

use crate::utils::tensors;

use super::{
    span::{self, LabelStrategy, Span},
    Config, Item,
};

/// An inference batch for question answering
#[derive(Debug, Clone, new)]
pub struct Infer<B: Backend> {
    /// Tokenized text as 2D tensor: [batch_size, max_seq_length]
    pub tokens: Tensor<B, 2, Int>,

    /// Padding mask for the tokenized text containing booleans for padding locations
    pub mask_pad: Tensor<B, 2, Bool>,
}

/// A training batch for question answering
#[derive(Clone, Debug, new)]
pub struct Train<B: Backend> {
    /// Model input
    pub input: Infer<B>,

    /// Answer start positions for the batch: [batch_size]
    pub start_positions: Tensor<B, 1, Int>,

    /// Answer end positions for the batch: [batch_size]
    pub end_positions: Tensor<B, 1, Int>,

    /// Reference answer text for each item, used when scoring decoded predictions
    pub answers: Vec<String>,
}

/// Struct for batching question answering items
#[derive(Clone)]
pub struct Batcher<B: Backend> {
    /// Tokenizer for converting text to token IDs
    pub tokenizer: Tokenizer,

    /// Fixed sequence length every example is truncated or padded to
    pub max_seq_length: usize,

    /// ID of the padding token
    pub pad_token_id: usize,

    /// How answer spans are turned into position targets
    pub strategy: LabelStrategy,

    /// Device on which to perform computation (e.g., CPU or CUDA device)
    pub device: B::Device,
}

impl<B: Backend> Batcher<B> {
    /// Creates a new batcher
    pub fn new(
        tokenizer: Tokenizer,
        config: Config,
        strategy: LabelStrategy,
        device: B::Device,
    ) -> Self {
        let max_seq_length = config.max_seq_len.unwrap_or(config.max_position_embeddings);

        // Let the tokenizer truncate so the closing special token is kept on long inputs
        let mut tokenizer = tokenizer;
        if let Err(e) = tokenizer.with_truncation(Some(TruncationParams {
            max_length: max_seq_length,
            ..Default::default()
        })) {
            log::warn!("Unable to truncate to {max_seq_length} tokens, cutting ids instead: {e}");
        }

        Self {
            tokenizer,
            max_seq_length,
            pad_token_id: config.pad_token_id,
            strategy,
            device,
        }
    }

    fn encode(&self, input: &str) -> Encoding {
        self.tokenizer
            .encode_char_offsets(input, true)
            .unwrap_or_else(|e| {
                log::error!("Unable to encode {input:?}, using an empty row: {e}");

                Encoding::default()
            })
    }

    /// Pad token ids to the fixed sequence length
    fn pad(&self, token_ids_list: Vec<Vec<usize>>) -> Infer<B> {
        let lengths: Vec<_> = token_ids_list
            .iter()
            .map(|ids| ids.len().min(self.max_seq_length))
            .collect();

        let tokens = tensors::pad_to::<B>(
            self.pad_token_id,
            token_ids_list,
            self.max_seq_length,
            &self.device,
        );
        let mask_pad = tensors::padding_mask::<B>(&lengths, self.max_seq_length, &self.device);

        Infer { tokens, mask_pad }
    }

    /// Derive the start/end targets for an item
    pub fn label<I: Item>(&self, item: &I, encoding: &Encoding) -> Span {
        match self.strategy {
            LabelStrategy::Characters => {
                span::find_answer_span(item.question(), item.answer(), self.max_seq_length)
            }
            LabelStrategy::Tokens => {
                span::locate_answer(item.question(), item.answer(), item.answer_start())
                    .map(|answer| {
                        span::token_span(
                            encoding.get_offsets(),
                            encoding.get_special_tokens_mask(),
                            answer,
                            self.max_seq_length,
                        )
                    })
                    .unwrap_or(Span::NONE)
            }
        }
    }
}

fn token_ids(encoding: &Encoding) -> Vec<usize> {
    encoding.get_ids().iter().map(|t| *t as usize).collect()
}

/// Implement Batcher trait for Batcher struct for inference
impl<B: Backend> dataloader::batcher::Batcher<String, Infer<B>> for Batcher<B> {
    /// Collects a vector of questions into an inference batch
    fn batch(&self, items: Vec<String>) -> Infer<B> {
        let token_ids_list = items
            .iter()
            .map(|input| token_ids(&self.encode(input)))
            .collect();

        self.pad(token_ids_list)
    }
}

/// Implement Batcher trait for Batcher struct for training
impl<B: Backend, I: Item> dataloader::batcher::Batcher<I, Train<B>> for Batcher<B> {
    /// Collects a vector of question answering items into a training batch
    fn batch(&self, items: Vec<I>) -> Train<B> {
        let batch_size = items.len();

        let mut token_ids_list = Vec::with_capacity(batch_size);
        let mut start_positions = Vec::with_capacity(batch_size);
        let mut end_positions = Vec::with_capacity(batch_size);
        let mut answers = Vec::with_capacity(batch_size);

        for item in &items {
            let encoding = self.encode(item.question());
            let Span { start, end } = self.label(item, &encoding);

            token_ids_list.push(token_ids(&encoding));
            start_positions.push(start);
            end_positions.push(end);
            answers.push(item.answer().to_string());
        }

        Train {
            input: self.pad(token_ids_list),
            start_positions: tensors::positions::<B>(&start_positions, &self.device),
            end_positions: tensors::positions::<B>(&end_positions, &self.device),
            answers,
        }
    }
}
