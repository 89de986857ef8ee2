//! Summarization pipeline: chunking, per-chunk summaries, and the final merge.

pub mod chunking;
pub mod merge;
pub mod prompts;
mod service;
pub mod summarize;
pub mod types;

pub use chunking::chunk;
pub use merge::merge;
pub use service::{PipelineSettings, SummarizeApi, SummaryPipeline};
pub use summarize::summarize_chunks;
pub use types::{ChunkRequest, ChunkingError, CompletionStage, PartialSummary, PipelineError};
