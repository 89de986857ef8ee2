use super::{CompletionClient, CompletionError, CompletionOutput, transport_error};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI chat-completions client (also works with compatible gateways).
pub struct OpenAiCompletionClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiCompletionClient {
    /// Construct a client for `model` at `base_url` (e.g. `https://api.openai.com/v1`).
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        let http = Client::builder()
            .user_agent("patsum/completion")
            .timeout(timeout)
            .build()
            .map_err(|error| CompletionError::Configuration(error.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_content: &str,
    ) -> Result<CompletionOutput, CompletionError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_content,
                },
            ],
        };

        tracing::debug!(
            model = %self.model,
            system_chars = system_prompt.len(),
            user_chars = user_content.len(),
            "Sending chat completion"
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(self.api_key.trim())
            .json(&body)
            .send()
            .await
            .map_err(|error| transport_error("OpenAI", error))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::GenerationFailed(format!(
                "OpenAI returned {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|error| {
            CompletionError::InvalidResponse(format!("failed to decode OpenAI response: {error}"))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(CompletionOutput::Text)
            .ok_or_else(|| CompletionError::InvalidResponse("OpenAI returned no choices".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};
    use serde_json::json;

    fn client(server: &MockServer) -> OpenAiCompletionClient {
        OpenAiCompletionClient::new(
            format!("{}/v1/", server.base_url()),
            "sk-test",
            "gpt-4o",
            Duration::from_secs(5),
        )
        .expect("client")
    }

    #[tokio::test]
    async fn sends_system_and_user_messages_without_history() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("authorization", "Bearer sk-test")
                    .json_body(json!({
                        "model": "gpt-4o",
                        "messages": [
                            { "role": "system", "content": "Be terse." },
                            { "role": "user", "content": "Chunk text" }
                        ]
                    }));
                then.status(200).json_body(json!({
                    "choices": [
                        { "index": 0, "message": { "role": "assistant", "content": "  Summary.\n" } }
                    ]
                }));
            })
            .await;

        let output = client(&server)
            .complete("Be terse.", "Chunk text")
            .await
            .expect("completion");

        mock.assert();
        assert_eq!(output.into_text(), "Summary.");
    }

    #[tokio::test]
    async fn error_status_is_generation_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(429).body("rate limited");
            })
            .await;

        let error = client(&server)
            .complete("system", "user")
            .await
            .expect_err("429 should fail");
        assert!(
            matches!(&error, CompletionError::GenerationFailed(message) if message.contains("429")),
            "unexpected error: {error}"
        );
    }

    #[tokio::test]
    async fn empty_choices_are_invalid() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200).json_body(json!({ "choices": [] }));
            })
            .await;

        let error = client(&server)
            .complete("system", "user")
            .await
            .expect_err("no choices");
        assert!(matches!(error, CompletionError::InvalidResponse(_)));
    }
}
