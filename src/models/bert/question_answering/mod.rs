/// BERT for Question Answering Configuration
pub mod config;

/// BERT for Question Answering
pub mod model;

/// Training routine
pub mod train;

pub use config::Config;
pub use model::{Model, ModelRecord};
