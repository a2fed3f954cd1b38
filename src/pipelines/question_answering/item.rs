use std::fmt::Debug;

/// A trait for items that can be used for extractive question answering
pub trait Item: Send + Sync + Clone + Debug {
    /// Returns the text the model reads, which the answer is located within
    fn question(&self) -> &str;

    /// Returns the reference answer text
    fn answer(&self) -> &str;

    /// Returns the annotated character offset of the answer, when the dataset provides one
    fn answer_start(&self) -> Option<usize> {
        None
    }
}
