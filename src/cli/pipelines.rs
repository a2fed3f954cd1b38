use std::fmt::Display;

use crate::pipelines::question_answering;

use super::models::{bert, Model};

/// Available Pipelines
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Pipeline {
    /// Extractive Question Answering
    QuestionAnswering,
}

impl Pipeline {
    /// Get the default model variant for the given pipeline
    pub fn default_model(&self) -> Model {
        match self {
            Pipeline::QuestionAnswering => {
                Model::Bert(bert::DEFAULT_QUESTION_ANSWERING_MODEL.to_string())
            }
        }
    }

    /// Get every model the pipeline fine-tunes when none are selected
    pub fn default_models(&self) -> Vec<Model> {
        match self {
            Pipeline::QuestionAnswering => bert::QUESTION_ANSWERING_MODELS
                .iter()
                .map(|name| Model::Bert(name.to_string()))
                .collect(),
        }
    }
}

impl TryFrom<&str> for Pipeline {
    type Error = PipelineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value == question_answering::PIPELINE {
            Ok(Pipeline::QuestionAnswering)
        } else {
            Err(PipelineError::Unknown(value.to_string()))
        }
    }
}

impl Display for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Pipeline::QuestionAnswering => question_answering::PIPELINE,
        };

        write!(f, "{}", name)
    }
}

/// Pipeline Error
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// No pipeline found for the given string
    #[error("no pipeline found for {0}")]
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_and_display() -> anyhow::Result<()> {
        let pipeline = Pipeline::try_from("question-answering")?;

        assert_eq!(pipeline, Pipeline::QuestionAnswering);
        assert_eq!(pipeline.to_string(), "question-answering");
        assert!(Pipeline::try_from("text-classification").is_err());

        Ok(())
    }

    #[test]
    fn test_default_models() {
        let names: Vec<_> = Pipeline::QuestionAnswering
            .default_models()
            .iter()
            .map(Model::to_string)
            .collect();

        assert_eq!(
            names,
            question_answering::config::DEFAULT_MODELS.to_vec()
        );
        assert_eq!(
            Pipeline::QuestionAnswering.default_model().to_string(),
            "bert-base-uncased"
        );
    }
}
