/// Extractive Question Answering
pub mod question_answering;
