//! Pipeline service coordinating resolution, retrieval, chunking, and summarization.

use crate::{
    completion::CompletionClient,
    config::{Config, DEFAULT_MAX_WORDS_PER_CHUNK},
    document::{DocumentIdentifier, DocumentSource, fetch, resolve},
    pipeline::{
        chunking::{chunk, count_words},
        merge::merge,
        summarize::summarize_chunks,
        types::PipelineError,
    },
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::Instrument;

/// Tunables for one pipeline instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Maximum number of words in each chunk.
    pub max_words_per_chunk: usize,
    /// Maximum number of chunk completions in flight.
    pub summary_concurrency: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_words_per_chunk: DEFAULT_MAX_WORDS_PER_CHUNK,
            summary_concurrency: 1,
        }
    }
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            max_words_per_chunk: config.max_words_per_chunk,
            summary_concurrency: config.summary_concurrency,
        }
    }
}

/// Runs the full fetch-and-summarize flow for one document per call.
///
/// The pipeline holds only shared collaborator handles; every call owns its own chunk list and
/// partial summaries, so one instance can serve concurrent requests behind an `Arc`.
pub struct SummaryPipeline {
    source: Arc<dyn DocumentSource>,
    completion: Arc<dyn CompletionClient>,
    settings: PipelineSettings,
}

/// Abstraction over the pipeline used by the HTTP surface.
#[async_trait]
pub trait SummarizeApi: Send + Sync {
    /// Resolve, fetch, and summarize a document.
    async fn fetch_and_summarize(
        &self,
        document_number: &str,
        custom_instruction: &str,
    ) -> Result<String, PipelineError>;
}

impl SummaryPipeline {
    /// Build a pipeline from injected collaborators.
    pub fn new(
        source: Arc<dyn DocumentSource>,
        completion: Arc<dyn CompletionClient>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            source,
            completion,
            settings,
        }
    }

    /// Resolve, fetch, and summarize a document.
    pub async fn fetch_and_summarize(
        &self,
        document_number: &str,
        custom_instruction: &str,
    ) -> Result<String, PipelineError> {
        let identifier = resolve(document_number);
        let span = tracing::info_span!(
            "summarize_document",
            request_id = %uuid::Uuid::new_v4(),
            document_number = identifier.normalized(),
            kind = %identifier.kind(),
        );
        self.run_document(&identifier, custom_instruction)
            .instrument(span)
            .await
    }

    async fn run_document(
        &self,
        identifier: &DocumentIdentifier,
        custom_instruction: &str,
    ) -> Result<String, PipelineError> {
        tracing::info!("Fetching document text");
        let document = fetch(self.source.as_ref(), identifier).await;
        if !document.has_content() {
            tracing::warn!(
                reason = document.retrieval_error.as_deref().unwrap_or("no description"),
                "No text available for document"
            );
            return Err(PipelineError::NoContentAvailable {
                document_number: identifier.normalized().to_string(),
                reason: document.retrieval_error,
            });
        }

        self.summarize_text(&document.full_text, custom_instruction)
            .await
    }

    /// Chunk, summarize, and merge `full_text`.
    pub async fn summarize_text(
        &self,
        full_text: &str,
        custom_instruction: &str,
    ) -> Result<String, PipelineError> {
        let words = count_words(full_text);
        let chunks = chunk(
            full_text,
            custom_instruction,
            self.settings.max_words_per_chunk,
        )?;
        if chunks.is_empty() {
            return Err(PipelineError::ChunkingFailure { words });
        }
        tracing::info!(
            words,
            chunks = chunks.len(),
            max_words_per_chunk = self.settings.max_words_per_chunk,
            concurrency = self.settings.summary_concurrency,
            "Summarizing document chunks"
        );

        let partials = summarize_chunks(
            self.completion.as_ref(),
            &chunks,
            self.settings.summary_concurrency,
        )
        .await?;
        debug_assert_eq!(partials.len(), chunks.len());

        let summary = merge(self.completion.as_ref(), partials).await?;
        tracing::info!(chars = summary.len(), "Summary ready");
        Ok(summary)
    }
}

#[async_trait]
impl SummarizeApi for SummaryPipeline {
    async fn fetch_and_summarize(
        &self,
        document_number: &str,
        custom_instruction: &str,
    ) -> Result<String, PipelineError> {
        SummaryPipeline::fetch_and_summarize(self, document_number, custom_instruction).await
    }
}
