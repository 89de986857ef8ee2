//! Merge step: collapse partial summaries into the final summary.

use super::prompts::{MERGE_SYSTEM_PROMPT, SUMMARY_SEPARATOR};
use super::types::{CompletionStage, PartialSummary, PipelineError};
use crate::completion::CompletionClient;

/// Combine partial summaries into one.
///
/// A single partial is returned unchanged without calling the model; two or more are joined
/// with blank lines and synthesized by exactly one completion.
pub async fn merge(
    client: &dyn CompletionClient,
    mut partials: Vec<PartialSummary>,
) -> Result<String, PipelineError> {
    match partials.len() {
        0 => Err(PipelineError::NothingToMerge),
        1 => Ok(partials.remove(0)),
        count => {
            tracing::debug!(partials = count, "Merging partial summaries");
            let combined = partials.join(SUMMARY_SEPARATOR);
            let output = client
                .complete(MERGE_SYSTEM_PROMPT, &combined)
                .await
                .map_err(|source| {
                    tracing::error!(partials = count, error = %source, "Summary merge failed");
                    PipelineError::Completion {
                        stage: CompletionStage::Merge,
                        source,
                    }
                })?;
            Ok(output.into_text())
        }
    }
}
