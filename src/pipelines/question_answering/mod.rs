/// Batcher
pub mod batcher;

/// Pipeline and training configuration
pub mod config;

/// Runs the fine-tuning loop over several models
pub mod driver;

/// Scoring predicted spans on the held-out split
pub mod evaluation;

/// Question Answering Inference
pub mod inference;

/// Question Answering Items
pub mod item;

/// Question Answering Models
pub mod model;

/// Model output
pub mod output;

/// Answer span labeling
pub mod span;

/// Tokenizer loading and padding setup
pub mod tokenizer;

/// Question Answering Training
pub mod training;

#[cfg(test)]
mod testing;

pub use batcher::Batcher;
pub use config::{Config, Training, PIPELINE};
pub use driver::run;
pub use evaluation::Evaluation;
pub use inference::infer;
pub use item::Item;
pub use model::{Model, ModelConfig};
pub use output::Output;
pub use training::train;
