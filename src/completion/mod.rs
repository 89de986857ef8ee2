//! Single-turn LLM completion collaborator.
//!
//! Every call sends exactly one system prompt and one user message with no history. Backends
//! answer either with plain text or with a structured object carrying an `output` field;
//! [`CompletionOutput::into_text`] is the one place where that difference is resolved.

mod ollama;
mod openai;

pub use ollama::OllamaCompletionClient;
pub use openai::OpenAiCompletionClient;

use crate::config::{Config, LlmProvider};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by completion backends.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Client could not be constructed from the supplied settings.
    #[error("Completion client misconfigured: {0}")]
    Configuration(String),
    /// Backend was unreachable or the call timed out.
    #[error("Completion provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Backend returned an error response.
    #[error("Completion failed: {0}")]
    GenerationFailed(String),
    /// Backend response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Raw result of one completion call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CompletionOutput {
    /// Plain text answer.
    Text(String),
    /// Structured answer whose text lives in `output`.
    Structured {
        /// Generated text.
        output: String,
    },
}

impl CompletionOutput {
    /// Normalize into the summary text: plain text is trimmed, structured output is taken as-is.
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text.trim().to_string(),
            Self::Structured { output } => output,
        }
    }
}

/// Interface implemented by completion backends.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run one stateless completion.
    async fn complete(
        &self,
        system_prompt: &str,
        user_content: &str,
    ) -> Result<CompletionOutput, CompletionError>;
}

/// Build the completion client selected by configuration.
pub fn build_completion_client(
    config: &Config,
) -> Result<Arc<dyn CompletionClient>, CompletionError> {
    let client: Arc<dyn CompletionClient> = match config.llm_provider {
        LlmProvider::OpenAI => {
            let api_key = config.openai_api_key.clone().ok_or_else(|| {
                CompletionError::Configuration("OPENAI_API_KEY is not set".into())
            })?;
            Arc::new(OpenAiCompletionClient::new(
                config.openai_base_url.clone(),
                api_key,
                config.llm_model.clone(),
                config.llm_timeout,
            )?)
        }
        LlmProvider::Ollama => Arc::new(OllamaCompletionClient::new(
            config.ollama_url.clone(),
            config.llm_model.clone(),
            config.llm_timeout,
        )?),
    };
    tracing::info!(
        provider = ?config.llm_provider,
        model = %config.llm_model,
        "Completion client initialized"
    );
    Ok(client)
}

/// Map a transport error into the completion taxonomy, keeping timeouts distinguishable.
pub(crate) fn transport_error(provider: &str, error: reqwest::Error) -> CompletionError {
    if error.is_timeout() {
        CompletionError::ProviderUnavailable(format!("{provider} request timed out: {error}"))
    } else {
        CompletionError::ProviderUnavailable(format!("failed to reach {provider}: {error}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_text_is_trimmed() {
        let output = CompletionOutput::Text("\n  The widget solves X.  \n".into());
        assert_eq!(output.into_text(), "The widget solves X.");
    }

    #[test]
    fn structured_output_is_extracted_verbatim() {
        let output = CompletionOutput::Structured {
            output: " keep spacing ".into(),
        };
        assert_eq!(output.into_text(), " keep spacing ");
    }

    #[test]
    fn deserializes_either_response_form() {
        let text: CompletionOutput = serde_json::from_value(json!("summary")).expect("text form");
        assert_eq!(text, CompletionOutput::Text("summary".into()));

        let structured: CompletionOutput =
            serde_json::from_value(json!({ "output": "summary", "usage": {} }))
                .expect("structured form");
        assert_eq!(
            structured,
            CompletionOutput::Structured {
                output: "summary".into()
            }
        );

        assert!(serde_json::from_value::<CompletionOutput>(json!({ "text": "x" })).is_err());
    }
}
