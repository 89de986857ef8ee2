#![deny(missing_docs)]

//! Core library for the Patsum patent summarization service.

/// HTTP routing and REST handlers.
pub mod api;
/// Single-turn LLM completion clients.
pub mod completion;
/// Environment-driven configuration management.
pub mod config;
/// Document number resolution and description retrieval.
pub mod document;
/// Structured logging and tracing setup.
pub mod logging;
/// Chunking, per-chunk summaries, and merge orchestration.
pub mod pipeline;

use std::sync::Arc;

/// Build the pipeline with the collaborators selected by `config`.
pub fn build_pipeline(config: &config::Config) -> anyhow::Result<pipeline::SummaryPipeline> {
    let source = document::UsptoDocumentSource::from_config(config)?;
    let completion = completion::build_completion_client(config)?;
    Ok(pipeline::SummaryPipeline::new(
        Arc::new(source),
        completion,
        pipeline::PipelineSettings::from(config),
    ))
}
