use super::error::TtsServiceError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Azure accepts SSML documents well above this, but long requests time out
pub const DEFAULT_MAX_CHUNK_LENGTH: usize = 4000;

/// A terminator immediately followed by whitespace. The cut goes right after the terminator.
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s").unwrap());

/// One bounded slice of the source text, the unit sent to the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextChunk {
    pub index: usize,
    pub content: String,
    /// Length in characters, not bytes
    pub length: usize,
}

impl TextChunk {
    fn new(index: usize, content: &str) -> Self {
        Self {
            index,
            content: content.to_string(),
            length: content.chars().count(),
        }
    }
}

/// Split text into chunks of at most `max_length` characters
///
/// Each cut prefers the last sentence boundary inside the limit, then the last
/// whitespace, and only cuts mid-word when the window holds neither.
///
/// # Errors
/// Returns `Invalid` when the text is blank or `max_length` is zero
pub fn segment(text: &str, max_length: usize) -> Result<Vec<TextChunk>, TtsServiceError> {
    if max_length == 0 {
        return Err(TtsServiceError::Invalid(
            "Chunk length must be greater than zero".to_string(),
        ));
    }

    let mut remaining = text.trim();
    if remaining.is_empty() {
        return Err(TtsServiceError::Invalid("Text cannot be empty".to_string()));
    }

    let mut chunks = Vec::new();

    while !remaining.is_empty() {
        // Byte offset just past `max_length` characters; None means the rest fits
        let Some((limit, _)) = remaining.char_indices().nth(max_length) else {
            chunks.push(TextChunk::new(chunks.len(), remaining));
            break;
        };

        let cut = find_cut(remaining, limit);
        let (head, tail) = remaining.split_at(cut);

        chunks.push(TextChunk::new(chunks.len(), head.trim_end()));
        remaining = tail.trim_start();
    }

    Ok(chunks)
}

/// Pick the byte offset to cut `text` at, given `limit` is the offset of the
/// first character past the allowed window
fn find_cut(text: &str, limit: usize) -> usize {
    // Look one character past the window so a terminator sitting on the
    // last allowed position can still see the whitespace after it
    let next_len = text[limit..].chars().next().map_or(0, char::len_utf8);
    let lookahead = &text[..limit + next_len];

    if let Some(m) = SENTENCE_END.find_iter(lookahead).last() {
        // Terminators are ASCII, so the cut sits one byte after the match start
        return m.start() + 1;
    }

    // The remainder is trimmed, so whitespace never sits at offset 0
    if let Some((offset, _)) = lookahead
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
    {
        return offset;
    }

    limit
}
