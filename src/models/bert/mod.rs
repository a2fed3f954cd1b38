/// BERT for extractive Question Answering
pub mod question_answering;
