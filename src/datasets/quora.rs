use std::path::{Path, PathBuf};

use async_trait::async_trait;
use burn::data::dataset::{self, Dataset as _, InMemDataset};
use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::{
    pipelines::question_answering,
    preprocessing,
    utils::{files::read_file, hugging_face::download_hf_dataset_file},
};

use super::{split::train_test_split, LoadableDataset};

/// The name of the Quora dataset
pub static DATASET: &str = "quora";

/// The Hugging Face Hub repository the dataset is downloaded from
pub static HF_REPO: &str = "toughdata/quora-question-answer-dataset";

/// The data file within the repository, one JSON object per line
pub static FILENAME: &str = "Quora-QuAD.jsonl";

/// Define a struct for Quora question answering items
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, new)]
pub struct Item {
    /// The question, which the answer is searched for within
    pub question: String,

    /// The reference answer
    pub answer: String,

    /// The character offset of the answer inside the question, when annotated
    #[new(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_start: Option<usize>,
}

impl Item {
    /// Run the question and answer through the text normalizer. Annotated offsets refer to the
    /// raw text, so they are dropped.
    pub fn normalized(self) -> Self {
        Self {
            question: preprocessing::normalize(&self.question),
            answer: preprocessing::normalize(&self.answer),
            answer_start: None,
        }
    }
}

impl question_answering::Item for Item {
    fn question(&self) -> &str {
        &self.question
    }

    fn answer(&self) -> &str {
        &self.answer
    }

    fn answer_start(&self) -> Option<usize> {
        self.answer_start
    }
}

/// Struct for the Quora dataset
pub struct Dataset {
    /// Underlying In-Memory dataset
    dataset: InMemDataset<Item>,
}

/// Implement the Dataset trait for the Quora dataset
impl dataset::Dataset<Item> for Dataset {
    /// Returns a specific item from the dataset
    fn get(&self, index: usize) -> Option<Item> {
        self.dataset.get(index)
    }

    /// Returns the length of the dataset
    fn len(&self) -> usize {
        self.dataset.len()
    }
}

#[async_trait]
impl LoadableDataset<Item> for Dataset {
    /// Load the dataset from `{data_dir}/datasets/quora/`, downloading it from the Hugging Face
    /// Hub when there is no local copy
    async fn load(data_dir: &str) -> anyhow::Result<Self> {
        let local = Self::local_path(data_dir);

        let path = if local.exists() {
            local
        } else {
            log::info!("Downloading {} from {}", FILENAME, HF_REPO);

            download_hf_dataset_file(HF_REPO, FILENAME).await?
        };

        Self::from_file(path).await
    }
}

// Implement methods for constructing the Quora dataset
impl Dataset {
    /// Build a dataset from in-memory items
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            dataset: InMemDataset::new(items),
        }
    }

    /// Where a local copy of the dataset is looked for
    pub fn local_path(data_dir: &str) -> PathBuf {
        PathBuf::from(format!("{}/datasets/{}/{}", data_dir, DATASET, FILENAME))
    }

    /// Load from a CSV file with `question` and `answer` columns, or from JSON lines otherwise
    pub async fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        if path.extension().and_then(|e| e.to_str()) == Some("csv") {
            let reader = csv::ReaderBuilder::new();

            let dataset = InMemDataset::from_csv(path, &reader)
                .map_err(|e| anyhow!("Unable to read {}: {}", path.display(), e))?;

            return Ok(Self { dataset });
        }

        let lines = read_file(path)
            .await
            .map_err(|e| anyhow!("Unable to read {}: {}", path.display(), e))?;

        let items = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str(line).map_err(|e| {
                    anyhow!("Malformed record on line {} of {}: {}", i + 1, path.display(), e)
                })
            })
            .collect::<anyhow::Result<Vec<Item>>>()?;

        log::info!("Loaded {} records from {}", items.len(), path.display());

        Ok(Self::new(items))
    }

    /// All items, in order
    pub fn items(&self) -> Vec<Item> {
        self.dataset.iter().collect()
    }

    /// Normalize every question and answer
    pub fn normalize(self) -> Self {
        Self::new(self.items().into_iter().map(Item::normalized).collect())
    }

    /// Partition into `(train, test)` with a seeded shuffle
    pub fn split(self, test_size: f64, seed: u64) -> (Self, Self) {
        let (train, test) = train_test_split(self.items(), test_size, seed);

        (Self::new(train), Self::new(test))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    fn jsonl(lines: &[&str]) -> anyhow::Result<tempfile::NamedTempFile> {
        let mut file = tempfile::Builder::new().suffix(".jsonl").tempfile()?;
        for line in lines {
            writeln!(file, "{line}")?;
        }

        Ok(file)
    }

    #[tokio::test]
    async fn test_from_jsonl() -> anyhow::Result<()> {
        let file = jsonl(&[
            r#"{"question": "What is the capital of France?", "answer": "Paris"}"#,
            "",
            r#"{"question": "Is Rust fast?", "answer": "Yes", "answer_start": 3}"#,
        ])?;

        let dataset = Dataset::from_file(file.path()).await?;

        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.get(0),
            Some(Item::new(
                "What is the capital of France?".to_string(),
                "Paris".to_string()
            ))
        );
        assert_eq!(dataset.get(1).and_then(|item| item.answer_start), Some(3));

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_line_reports_line_number() -> anyhow::Result<()> {
        let file = jsonl(&[r#"{"question": "a", "answer": "b"}"#, r#"{"question": "c"}"#])?;

        let error = Dataset::from_file(file.path())
            .await
            .err()
            .map(|e| e.to_string())
            .unwrap_or_default();

        assert!(error.contains("line 2"), "{error}");

        Ok(())
    }

    #[tokio::test]
    async fn test_from_csv() -> anyhow::Result<()> {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile()?;
        writeln!(file, "question,answer")?;
        writeln!(file, "\"Where is Paris?\",France")?;

        let dataset = Dataset::from_file(file.path()).await?;

        assert_eq!(
            dataset.items(),
            vec![Item::new("Where is Paris?".to_string(), "France".to_string())]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_load_prefers_local_copy() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let data_dir = dir.path().to_string_lossy().to_string();
        let path = Dataset::local_path(&data_dir);

        std::fs::create_dir_all(path.parent().unwrap())?;
        std::fs::write(&path, "{\"question\": \"q\", \"answer\": \"a\"}\n")?;

        let dataset = Dataset::load(&data_dir).await?;

        assert_eq!(dataset.len(), 1);

        Ok(())
    }

    #[test]
    fn test_normalize() {
        let dataset = Dataset::new(vec![Item::new(
            "What is the capital of France? It is Paris.".to_string(),
            "Paris".to_string(),
        )])
        .normalize();

        assert_eq!(
            dataset.items(),
            vec![Item::new("capit franc pari".to_string(), "pari".to_string())]
        );
    }

    #[test]
    fn test_split() {
        let items = (0..10)
            .map(|i| Item::new(format!("question {i}"), format!("answer {i}")))
            .collect();

        let (train, test) = Dataset::new(items).split(0.2, 42);

        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);
    }
}
