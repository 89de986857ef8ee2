//! Chunk summarization: one completion per chunk, results in chunk order.

use super::prompts::chunk_system_prompt;
use super::types::{ChunkRequest, CompletionStage, PartialSummary, PipelineError};
use crate::completion::CompletionClient;
use futures_util::{StreamExt, TryStreamExt, stream};

/// Summarize every chunk, preserving order.
///
/// At most `concurrency` calls are in flight (`1` runs them strictly one after another). The
/// first failing call aborts the stage; nothing is retried or skipped.
pub async fn summarize_chunks(
    client: &dyn CompletionClient,
    chunks: &[ChunkRequest],
    concurrency: usize,
) -> Result<Vec<PartialSummary>, PipelineError> {
    let total = chunks.len();
    let calls: Vec<_> = chunks
        .iter()
        .enumerate()
        .map(|(index, request)| summarize_chunk(client, index, total, request))
        .collect();
    stream::iter(calls)
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

async fn summarize_chunk(
    client: &dyn CompletionClient,
    index: usize,
    total: usize,
    request: &ChunkRequest,
) -> Result<PartialSummary, PipelineError> {
    tracing::debug!(
        chunk = index + 1,
        total,
        chars = request.text_chunk.len(),
        "Summarizing chunk"
    );
    let system_prompt = chunk_system_prompt(&request.custom_instruction);
    let output = client
        .complete(&system_prompt, &request.text_chunk)
        .await
        .map_err(|source| {
            tracing::error!(chunk = index + 1, total, error = %source, "Chunk summary failed");
            PipelineError::Completion {
                stage: CompletionStage::Chunk(index),
                source,
            }
        })?;
    Ok(output.into_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{CompletionError, CompletionOutput};
    use crate::pipeline::prompts::CHUNK_SYSTEM_PROMPT;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Echoes the user content back, optionally delaying earlier chunks so they finish last.
    #[derive(Default)]
    struct EchoClient {
        calls: Mutex<Vec<(String, String)>>,
        reverse_latency: bool,
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl CompletionClient for EchoClient {
        async fn complete(
            &self,
            system_prompt: &str,
            user_content: &str,
        ) -> Result<CompletionOutput, CompletionError> {
            self.calls
                .lock()
                .expect("calls lock")
                .push((system_prompt.to_string(), user_content.to_string()));
            if self.reverse_latency {
                let index: u64 = user_content
                    .trim_start_matches('c')
                    .parse()
                    .unwrap_or_default();
                tokio::time::sleep(Duration::from_millis(50u64.saturating_sub(index * 10))).await;
            }
            if self.fail_on == Some(user_content) {
                return Err(CompletionError::GenerationFailed("refused".into()));
            }
            Ok(CompletionOutput::Text(format!("  summary of {user_content}\n")))
        }
    }

    fn requests(texts: &[&str], instruction: &str) -> Vec<ChunkRequest> {
        texts
            .iter()
            .map(|text| ChunkRequest {
                custom_instruction: instruction.to_string(),
                text_chunk: (*text).to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn no_chunks_means_no_calls() {
        let client = EchoClient::default();
        let summaries = summarize_chunks(&client, &[], 1).await.expect("summaries");
        assert!(summaries.is_empty());
        assert!(client.calls.lock().expect("calls lock").is_empty());
    }

    #[tokio::test]
    async fn one_call_per_chunk_in_order() {
        let client = EchoClient::default();
        let chunks = requests(&["c0", "c1", "c2"], "");
        let summaries = summarize_chunks(&client, &chunks, 1).await.expect("summaries");

        assert_eq!(
            summaries,
            vec!["summary of c0", "summary of c1", "summary of c2"]
        );
        let calls = client.calls.lock().expect("calls lock");
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|(system, _)| system == CHUNK_SYSTEM_PROMPT));
        assert_eq!(calls[1].1, "c1");
    }

    #[tokio::test]
    async fn concurrent_calls_keep_chunk_order() {
        let client = EchoClient {
            reverse_latency: true,
            ..Default::default()
        };
        let chunks = requests(&["c0", "c1", "c2", "c3", "c4"], "");
        let summaries = summarize_chunks(&client, &chunks, 5).await.expect("summaries");

        let expected: Vec<String> = (0..5).map(|i| format!("summary of c{i}")).collect();
        assert_eq!(summaries, expected);
    }

    #[tokio::test]
    async fn custom_instruction_prefixes_system_prompt() {
        let client = EchoClient::default();
        let chunks = requests(&["c0"], "Summarize this simply.");
        summarize_chunks(&client, &chunks, 1).await.expect("summaries");

        let calls = client.calls.lock().expect("calls lock");
        assert!(calls[0].0.starts_with("INSTRUCTION:\nSummarize this simply.\n\n"));
        assert!(calls[0].0.ends_with(CHUNK_SYSTEM_PROMPT));
    }

    #[tokio::test]
    async fn failing_chunk_aborts_without_retry() {
        let client = EchoClient {
            fail_on: Some("c1"),
            ..Default::default()
        };
        let chunks = requests(&["c0", "c1", "c2"], "");
        let error = summarize_chunks(&client, &chunks, 1)
            .await
            .expect_err("second chunk fails");

        assert!(matches!(
            error,
            PipelineError::Completion {
                stage: CompletionStage::Chunk(1),
                ..
            }
        ));
        let calls = client.calls.lock().expect("calls lock");
        assert_eq!(calls.len(), 2, "sequential run stops at the failure");
    }
}
