//! Core data types and error definitions for the summarization pipeline.

use crate::completion::CompletionError;
use std::fmt;
use thiserror::Error;

/// One model-sized excerpt of a document plus the caller's instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRequest {
    /// Caller-supplied instruction, passed through unmodified.
    pub custom_instruction: String,
    /// Space-joined words of this chunk.
    pub text_chunk: String,
}

/// Summary of one chunk, in chunk order.
pub type PartialSummary = String;

/// Errors produced while splitting text into chunks.
#[derive(Debug, Error)]
pub enum ChunkingError {
    /// A zero word budget can never make progress.
    #[error("max words per chunk must be greater than zero")]
    InvalidChunkSize,
}

/// Pipeline step that issued a failing completion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStage {
    /// Summary of the chunk at this zero-based index.
    Chunk(usize),
    /// Synthesis of all partial summaries.
    Merge,
}

impl fmt::Display for CompletionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chunk(index) => write!(f, "chunk {}", index + 1),
            Self::Merge => f.write_str("merge"),
        }
    }
}

/// Errors emitted by the summarization pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The document source produced no description text.
    #[error("Failed to retrieve full text for document {document_number}{}", reason_suffix(.reason))]
    NoContentAvailable {
        /// Normalized document number that was requested.
        document_number: String,
        /// Retrieval failure behind the empty text, when there was one.
        reason: Option<String>,
    },
    /// Chunking step rejected its parameters.
    #[error("Failed to chunk document: {0}")]
    Chunking(#[from] ChunkingError),
    /// Non-empty text produced no chunks.
    #[error("Chunking produced no segments from {words} words")]
    ChunkingFailure {
        /// Word count of the text that was chunked.
        words: usize,
    },
    /// A completion call failed; the request is aborted.
    #[error("Summarization failed at {stage}: {source}")]
    Completion {
        /// Which call failed.
        stage: CompletionStage,
        /// Underlying client error.
        #[source]
        source: CompletionError,
    },
    /// The merge step was handed no partial summaries.
    #[error("No partial summaries to merge")]
    NothingToMerge,
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|reason| format!(": {reason}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_content_message_includes_reason_when_present() {
        let bare = PipelineError::NoContentAvailable {
            document_number: "9878232".into(),
            reason: None,
        };
        assert_eq!(
            bare.to_string(),
            "Failed to retrieve full text for document 9878232"
        );

        let detailed = PipelineError::NoContentAvailable {
            document_number: "9878232".into(),
            reason: Some("HTTP request failed: timed out".into()),
        };
        assert!(detailed.to_string().ends_with(": HTTP request failed: timed out"));
    }

    #[test]
    fn completion_stage_is_one_based_in_messages() {
        let error = PipelineError::Completion {
            stage: CompletionStage::Chunk(1),
            source: CompletionError::GenerationFailed("boom".into()),
        };
        assert_eq!(
            error.to_string(),
            "Summarization failed at chunk 2: Completion failed: boom"
        );
    }
}
