/// Model Variants
/// --------------

/// The base model type
pub static MODEL_TYPE: &str = "bert";

/// bert-base-uncased
pub static BASE_UNCASED: &str = "bert-base-uncased";

/// bert-base-cased
pub static BASE_CASED: &str = "bert-base-cased";

/// roberta-base
pub static ROBERTA_BASE: &str = "roberta-base";

/// All available BERT models
pub static ALL_MODELS: &[&str; 3] = &[BASE_UNCASED, BASE_CASED, ROBERTA_BASE];

/// Question Answering
/// ------------------

/// Available models to use with Bert for Question Answering, fine-tuned in this order by default
pub static QUESTION_ANSWERING_MODELS: &[&str; 3] = ALL_MODELS;

/// The default model to use for inference
pub static DEFAULT_QUESTION_ANSWERING_MODEL: &str = BASE_UNCASED;
