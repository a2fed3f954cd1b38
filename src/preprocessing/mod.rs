/// Text normalization for questions and answers
pub mod normalizer;

/// The Porter stemmer
pub mod stemmer;

/// English stopwords
pub mod stopwords;

pub use normalizer::normalize;
