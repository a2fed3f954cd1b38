use serde::{Deserialize, Serialize};

/// A start/end label pair. Character spans are half-open (`end` is exclusive), token spans are
/// inclusive of both ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// The start offset
    pub start: usize,

    /// The end offset
    pub end: usize,
}

impl Span {
    /// The label used when no answer can be located, pointing both ends at position 0
    pub const NONE: Span = Span { start: 0, end: 0 };

    /// Create a new span
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// How training targets are derived from a question and its answer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelStrategy {
    /// Map the answer's character span onto the tokens that cover it
    #[default]
    Tokens,

    /// Use the character offsets of a verbatim substring match directly as position targets
    Characters,
}

impl TryFrom<&str> for LabelStrategy {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "tokens" => Ok(LabelStrategy::Tokens),
            "characters" => Ok(LabelStrategy::Characters),
            _ => Err(anyhow!("unknown label strategy: {}", value)),
        }
    }
}

/// Find an answer inside a question by exact substring search and return character offsets.
///
/// When the answer occurs at character offset `s`, the span is `(s, s + chars(answer))`,
/// otherwise `(0, 0)`. Each end is then clamped on its own: a start at or past `window` becomes
/// 0, and an end at or past `window` becomes 0. A match that starts inside the window but ends
/// outside it therefore keeps its start while its end drops to 0, leaving `start > end`.
pub fn find_answer_span(question: &str, answer: &str, window: usize) -> Span {
    let Span { start, end } = locate_answer(question, answer, None).unwrap_or(Span::NONE);

    Span {
        start: if start < window { start } else { 0 },
        end: if end < window { end } else { 0 },
    }
}

/// Locate the character span of an answer in a question.
///
/// An annotated `answer_start` is trusted when the answer text actually appears there; otherwise
/// the first verbatim occurrence is used.
pub fn locate_answer(question: &str, answer: &str, answer_start: Option<usize>) -> Option<Span> {
    let answer_len = answer.chars().count();

    if let Some(start) = answer_start {
        let annotated: String = question.chars().skip(start).take(answer_len).collect();

        if annotated == answer {
            return Some(Span::new(start, start + answer_len));
        }
    }

    let byte_start = question.find(answer)?;
    let start = question[..byte_start].chars().count();

    Some(Span::new(start, start + answer_len))
}

/// Map a character span onto the inclusive range of tokens covering it.
///
/// `offsets` are the per-token character offsets produced by the tokenizer and `special_mask`
/// flags special tokens, which never receive labels. Only the first `window` tokens are
/// considered. Empty spans, spans covered by no tokens, and spans cut off by the window are
/// labeled [`Span::NONE`].
pub fn token_span(
    offsets: &[(usize, usize)],
    special_mask: &[u32],
    span: Span,
    window: usize,
) -> Span {
    if span.end <= span.start {
        return Span::NONE;
    }

    let covering: Vec<usize> = offsets
        .iter()
        .enumerate()
        .take(window)
        .filter(|(i, _)| special_mask.get(*i).copied().unwrap_or(0) == 0)
        .filter(|(_, (start, end))| *start < span.end && *end > span.start)
        .map(|(i, _)| i)
        .collect();

    let (Some(&first), Some(&last)) = (covering.first(), covering.last()) else {
        return Span::NONE;
    };

    // The answer continues past the last token that fits in the window
    if offsets[last].1 < span.end {
        return Span::NONE;
    }

    Span::new(first, last)
}
