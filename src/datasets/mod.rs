use async_trait::async_trait;

/// The Quora question answering dataset
pub mod quora;

/// Seeded train/test splitting
pub mod split;

/// A dataset which can be loaded
#[async_trait]
pub trait LoadableDataset<I>: burn::data::dataset::Dataset<I> {
    /// Load the dataset
    async fn load(data_dir: &str) -> anyhow::Result<Self>
    where
        Self: std::marker::Sized;
}
