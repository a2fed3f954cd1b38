use std::path::Path;

use tokenizers::{AddedToken, Tokenizer};

/// Padding tokens used by the supported model families
static PAD_TOKENS: &[&str] = &["[PAD]", "<pad>"];

/// End-of-sequence tokens a missing padding token is aliased to
static EOS_TOKENS: &[&str] = &["</s>", "[SEP]", "<|endoftext|>"];

/// The token added when a tokenizer has neither a padding nor an end-of-sequence token
static FALLBACK_PAD_TOKEN: &str = "[PAD]";

/// The padding token chosen for a tokenizer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PadToken {
    /// The padding token id
    pub id: usize,

    /// When the padding token had to be aliased or added, the vocabulary size the model's word
    /// embeddings must be resized to
    pub resize_to: Option<usize>,
}

/// Load a tokenizer from a `tokenizer.json` file
pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Tokenizer> {
    let path = path.as_ref();

    Tokenizer::from_file(path)
        .map_err(|e| anyhow!("Unable to load tokenizer from {}: {}", path.display(), e))
}

/// Find the tokenizer's padding token. Without one, the end-of-sequence token doubles as the
/// padding token, and the model's embeddings must be resized to the tokenizer's vocabulary.
pub fn ensure_pad_token(tokenizer: &mut Tokenizer) -> PadToken {
    if let Some(id) = PAD_TOKENS.iter().find_map(|t| tokenizer.token_to_id(t)) {
        return PadToken {
            id: id as usize,
            resize_to: None,
        };
    }

    let id = match EOS_TOKENS.iter().find_map(|t| tokenizer.token_to_id(t)) {
        Some(id) => {
            log::warn!("No padding token found, using the end-of-sequence token (id {id})");

            id
        }
        None => {
            log::warn!("No padding or end-of-sequence token found, adding {FALLBACK_PAD_TOKEN}");

            tokenizer.add_special_tokens(&[AddedToken::from(FALLBACK_PAD_TOKEN, true)]);

            tokenizer
                .token_to_id(FALLBACK_PAD_TOKEN)
                .unwrap_or(tokenizer.get_vocab_size(true) as u32 - 1)
        }
    };

    PadToken {
        id: id as usize,
        resize_to: Some(tokenizer.get_vocab_size(true)),
    }
}
