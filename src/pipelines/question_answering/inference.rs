use std::sync::Arc;

use burn::{
    config::Config as _,
    data::dataloader::batcher::Batcher as BatcherTrait,
    module::Module,
    record::{CompactRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};
use serde::Serialize;

use crate::{preprocessing, utils::tensors};

use super::{
    batcher::Infer,
    evaluation::decode_spans,
    output::predicted_spans,
    span::{LabelStrategy, Span},
    tokenizer, Batcher, Model, ModelConfig, Training, PIPELINE,
};

/// An answer extracted from a question
#[derive(Clone, Debug, Serialize)]
pub struct Prediction {
    /// The question as the model read it
    pub question: String,

    /// The decoded answer text, empty when no answer was found
    pub answer: String,

    /// The predicted token span
    pub span: Span,
}

/// Define inference function
pub fn infer<B: AutodiffBackend, M: Model<B> + 'static>(
    device: B::Device,      // Device on which to perform computation (e.g., CPU or CUDA device)
    data_dir: &str,         // The location of the top-level data directory
    model_name: &str,       // The name of the model (e.g., "bert-base-uncased")
    questions: Vec<String>, // Questions to answer
) -> anyhow::Result<Vec<Prediction>> {
    let artifact_dir = format!("{}/{}/{}", data_dir, PIPELINE, model_name);

    // Load experiment configuration
    let model_config = M::Config::load(format!("{artifact_dir}/config.json").as_str())
        .map_err(|e| anyhow!("Unable to load config file: {}", e))?;

    let training = Training::load(format!("{artifact_dir}/training.json").as_str())
        .map_err(|e| anyhow!("Unable to load training config file: {}", e))?;

    // Initialize the tokenizer saved alongside the model
    let tokenizer = tokenizer::load(format!("{artifact_dir}/tokenizer.json"))?;

    // Initialize batcher for batching samples
    let batcher = Arc::new(Batcher::<B>::new(
        tokenizer.clone(),
        model_config.get_config(),
        LabelStrategy::default(),
        device.clone(),
    ));

    // Load pre-trained model weights
    let record = CompactRecorder::new()
        .load(format!("{artifact_dir}/model").into(), &device)
        .map_err(|e| anyhow!("Unable to load trained model weights: {}", e))?;

    // Create model using loaded weights
    let model = model_config.init::<B>(&device).load_record(record);

    // Questions are read the same way the model was trained on them
    let questions: Vec<String> = if training.normalize {
        questions.iter().map(|q| preprocessing::normalize(q)).collect()
    } else {
        questions
    };

    if questions.is_empty() {
        return Ok(Vec::new());
    }

    let batch: Infer<B> = batcher.batch(questions.clone());
    let tokens = tensors::rows(batch.tokens.clone());

    let (start_logits, end_logits) = model.infer(batch);
    let spans = predicted_spans(start_logits, end_logits);

    let answers = decode_spans(&tokenizer, &tokens, &spans)?;

    Ok(questions
        .into_iter()
        .zip(answers)
        .zip(spans)
        .map(|((question, answer), span)| Prediction {
            question,
            answer,
            span,
        })
        .collect())
}
