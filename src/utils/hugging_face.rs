use std::path::PathBuf;

use hf_hub::api::tokio::Api;

/// Files fetched from the Hugging Face Hub for a pretrained model
#[derive(Debug, Clone)]
pub struct PretrainedFiles {
    /// The model configuration (`config.json`)
    pub config: PathBuf,

    /// The model weights (`model.safetensors`)
    pub weights: PathBuf,

    /// The fast tokenizer definition (`tokenizer.json`)
    pub tokenizer: PathBuf,
}

/// Download model config, weights and tokenizer from Hugging Face Hub
/// If a file exists in cache, it will not be downloaded again
// NOTE: Modified from the built-in function to work within an already-async context
pub async fn download_hf_model(model_name: &str) -> anyhow::Result<PretrainedFiles> {
    let api = Api::new()?;
    let repo = api.model(model_name.to_string());

    let weights = repo.get("model.safetensors").await.map_err(|e| {
        anyhow!(
            "Failed to download: {} weights with name: model.safetensors from HuggingFace Hub: {}",
            model_name,
            e
        )
    })?;

    let config = repo.get("config.json").await.map_err(|e| {
        anyhow!(
            "Failed to download: {} config with name: config.json from HuggingFace Hub: {}",
            model_name,
            e
        )
    })?;

    let tokenizer = repo.get("tokenizer.json").await.map_err(|e| {
        anyhow!(
            "Failed to download: {} tokenizer with name: tokenizer.json from HuggingFace Hub: {}",
            model_name,
            e
        )
    })?;

    Ok(PretrainedFiles {
        config,
        weights,
        tokenizer,
    })
}

/// Download a single file from a dataset repository on the Hugging Face Hub
pub async fn download_hf_dataset_file(repo_id: &str, filename: &str) -> anyhow::Result<PathBuf> {
    let api = Api::new()?;
    let repo = api.dataset(repo_id.to_string());

    repo.get(filename).await.map_err(|e| {
        anyhow!(
            "Failed to download: {} from the {} dataset on HuggingFace Hub: {}",
            filename,
            repo_id,
            e
        )
    })
}
