use std::path::Path;

use burn::{config::Config as _, LearningRate};

use super::span::LabelStrategy;

/// The unique string token that identifies this pipeline, also used for the artifact directory
pub static PIPELINE: &str = "question-answering";

/// Models fine-tuned when none are selected explicitly
pub use crate::cli::models::bert::QUESTION_ANSWERING_MODELS as DEFAULT_MODELS;

/// The common model configuration properties needed for the pipeline
#[derive(Clone, Debug)]
pub struct Config {
    /// The padding token ID
    pub pad_token_id: usize,

    /// The max position embeddings
    pub max_position_embeddings: usize,

    /// The size of the hidden state
    pub hidden_size: usize,

    /// An optional max sequence length, if different from max position embeddings
    pub max_seq_len: Option<usize>,

    /// The hidden dropout probability
    pub hidden_dropout_prob: f64,

    /// The number of rows in the word embedding table
    pub vocab_size: usize,
}

/// Define configuration struct for the experiment
#[derive(burn::config::Config)]
pub struct Training {
    /// Every example is truncated or padded to this many tokens
    #[config(default = 128)]
    pub max_seq_length: usize,

    /// Batch size
    #[config(default = 2)]
    pub batch_size: usize,

    /// Batch size used for evaluation
    #[config(default = 2)]
    pub eval_batch_size: usize,

    /// Number of epochs
    #[config(default = 1)]
    pub num_epochs: usize,

    /// Adam epsilon
    #[config(default = 1e-8)]
    pub adam_epsilon: f32,

    /// Initial learning rate
    #[config(default = 5e-5)]
    pub learning_rate: LearningRate,

    /// Dropout rate
    #[config(default = 0.1)]
    pub hidden_dropout_prob: f64,

    /// The location of the top-level data directory
    #[config(default = "\"data\".to_string()")]
    pub data_dir: String,

    /// The Dataset to use (e.g., "quora")
    #[config(default = "\"quora\".to_string()")]
    pub dataset_name: String,

    /// Seed for the train/test split and for data loader shuffling
    #[config(default = 42)]
    pub seed: u64,

    /// The fraction of records held out for evaluation
    #[config(default = 0.2)]
    pub test_size: f64,

    /// Training progress is logged every this many iterations
    #[config(default = 100)]
    pub logging_steps: usize,

    /// Data loader worker threads, defaulting to the available parallelism
    pub num_workers: Option<usize>,

    /// Whether questions and answers go through the text normalizer before labeling
    #[config(default = true)]
    pub normalize: bool,

    /// How answer spans become position targets
    #[config(default = "LabelStrategy::Tokens")]
    pub label_strategy: LabelStrategy,

    /// The pretrained models to fine-tune, one after another
    #[config(default = "DEFAULT_MODELS.iter().map(|m| m.to_string()).collect()")]
    pub model_names: Vec<String>,
}

impl Training {
    /// Load a training configuration from a YAML or JSON file. Keys missing from the file keep
    /// their default values.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Unable to read config file {}: {}", path.display(), e))?;

        let overrides: serde_json::Value = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)
                .map_err(|e| anyhow!("Unable to parse YAML config {}: {}", path.display(), e))?,
            _ => serde_json::from_str(&contents)
                .map_err(|e| anyhow!("Unable to parse JSON config {}: {}", path.display(), e))?,
        };

        let mut merged = serde_json::to_value(Training::new())?;

        match (merged.as_object_mut(), overrides) {
            (Some(defaults), serde_json::Value::Object(overrides)) => defaults.extend(overrides),
            (_, serde_json::Value::Null) => {}
            _ => {
                return Err(anyhow!(
                    "Config file {} must contain a mapping of settings",
                    path.display()
                ))
            }
        }

        serde_json::from_value(merged)
            .map_err(|e| anyhow!("Invalid config file {}: {}", path.display(), e))
    }

    /// The directory the artifacts for a model are written to
    pub fn artifact_dir(&self, model_name: &str) -> String {
        format!("{}/{}/{}", self.data_dir, PIPELINE, model_name)
    }

    /// Save the training configuration next to the model artifacts
    pub fn save_to(&self, artifact_dir: &str) -> anyhow::Result<()> {
        self.save(format!("{artifact_dir}/training.json"))
            .map_err(|e| anyhow!("Unable to save training config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cli::{models::Model, pipelines::Pipeline};

    #[test]
    fn test_defaults() {
        let config = Training::new();

        assert_eq!(config.max_seq_length, 128);
        assert_eq!(config.batch_size, 2);
        assert_eq!(config.eval_batch_size, 2);
        assert_eq!(config.num_epochs, 1);
        assert_eq!(config.seed, 42);
        assert_eq!(config.logging_steps, 100);
        assert_eq!(config.label_strategy, LabelStrategy::Tokens);
        assert_eq!(
            config.model_names,
            vec!["bert-base-uncased", "bert-base-cased", "roberta-base"]
        );
        assert!(config.normalize);
    }

    #[test]
    fn test_default_models_are_supported() -> anyhow::Result<()> {
        for name in DEFAULT_MODELS {
            let model = Model::try_from(*name)?;

            assert!(model.is_supported(&Pipeline::QuestionAnswering), "{name}");
        }

        Ok(())
    }

    #[test]
    fn test_partial_yaml_file() -> anyhow::Result<()> {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
        writeln!(file, "num_epochs: 3")?;
        writeln!(file, "label_strategy: characters")?;
        writeln!(file, "model_names: [bert-base-cased]")?;

        let config = Training::from_file(file.path())?;

        assert_eq!(config.num_epochs, 3);
        assert_eq!(config.label_strategy, LabelStrategy::Characters);
        assert_eq!(config.model_names, vec!["bert-base-cased"]);
        assert_eq!(config.batch_size, 2);
        assert_eq!(config.data_dir, "data");

        Ok(())
    }

    #[test]
    fn test_json_file() -> anyhow::Result<()> {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile()?;
        write!(file, r#"{{"batch_size": 8, "normalize": false}}"#)?;

        let config = Training::from_file(file.path())?;

        assert_eq!(config.batch_size, 8);
        assert!(!config.normalize);

        Ok(())
    }

    #[test]
    fn test_invalid_file() -> anyhow::Result<()> {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
        writeln!(file, "- just\n- a list")?;

        assert!(Training::from_file(file.path()).is_err());

        Ok(())
    }

    #[test]
    fn test_artifact_dir() {
        let config = Training::new().with_data_dir("/tmp/data".to_string());

        assert_eq!(
            config.artifact_dir("roberta-base"),
            "/tmp/data/question-answering/roberta-base"
        );
    }
}
