//! Word-budget chunking.
//!
//! Text is split on whitespace and cut into contiguous windows of at most `max_words` words.
//! Windows are rejoined with single spaces, so the original line breaks are not preserved, but
//! the word sequence is: concatenating the words of every chunk yields the input words in order.

use super::types::{ChunkRequest, ChunkingError};

/// Split `full_text` into ordered chunk requests carrying `custom_instruction`.
///
/// Returns an empty vector for empty or whitespace-only text.
pub fn chunk(
    full_text: &str,
    custom_instruction: &str,
    max_words: usize,
) -> Result<Vec<ChunkRequest>, ChunkingError> {
    if max_words == 0 {
        return Err(ChunkingError::InvalidChunkSize);
    }

    let words: Vec<&str> = full_text.split_whitespace().collect();
    Ok(words
        .chunks(max_words)
        .map(|window| ChunkRequest {
            custom_instruction: custom_instruction.to_string(),
            text_chunk: window.join(" "),
        })
        .collect())
}

/// Number of whitespace-separated words in `text`.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
