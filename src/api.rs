//! HTTP surface for Patsum.
//!
//! This module exposes a compact Axum router:
//!
//! - `POST /summarize` – Resolve a patent or publication number, fetch its description, and
//!   return `{ "summary": string }`. Accepts an optional `custom_instruction` that is prepended
//!   to the analyst prompt for every chunk.
//! - `GET /resolve/{document_number}` – Show how a number is normalized and classified.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.
//!
//! Any pipeline failure maps to `500` with the error message as the body.

use crate::document::{DocumentKind, resolve};
use crate::pipeline::{PipelineError, SummarizeApi};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Build the HTTP router exposing the summarization API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: SummarizeApi + 'static,
{
    Router::new()
        .route("/summarize", post(summarize_document::<S>))
        .route("/resolve/:document_number", get(resolve_document))
        .route("/commands", get(get_commands))
        .with_state(service)
}

/// Request body for the `POST /summarize` endpoint.
#[derive(Deserialize)]
struct SummarizeRequest {
    /// US patent or publication number; commas and slashes are ignored.
    document_number: String,
    /// Optional instruction prepended to the analyst prompt.
    #[serde(default)]
    custom_instruction: String,
}

/// Success response for the `POST /summarize` endpoint.
#[derive(Serialize)]
struct SummarizeResponse {
    summary: String,
}

/// Fetch and summarize one document.
async fn summarize_document<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, AppError>
where
    S: SummarizeApi,
{
    let SummarizeRequest {
        document_number,
        custom_instruction,
    } = request;
    if document_number.trim().is_empty() {
        return Err(AppError::BadRequest("document_number must not be empty".into()));
    }

    let summary = service
        .fetch_and_summarize(&document_number, &custom_instruction)
        .await?;
    tracing::info!(
        document_number = %document_number,
        chars = summary.len(),
        "Summarize request completed"
    );
    Ok(Json(SummarizeResponse { summary }))
}

/// Response body for `GET /resolve/{document_number}`.
#[derive(Serialize)]
struct ResolveResponse {
    document_number: String,
    kind: DocumentKind,
}

async fn resolve_document(Path(document_number): Path<String>) -> Json<ResolveResponse> {
    let identifier = resolve(&document_number);
    Json(ResolveResponse {
        document_number: identifier.normalized().to_string(),
        kind: identifier.kind(),
    })
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "summarize",
                method: "POST",
                path: "/summarize",
                description: "Fetch a US patent or publication description and return a technical summary. Response returns { \"summary\": string }.",
                request_example: Some(json!({
                    "document_number": "9878232",
                    "custom_instruction": "Summarize this simply."
                })),
            },
            CommandDescriptor {
                name: "resolve",
                method: "GET",
                path: "/resolve/{document_number}",
                description: "Show the normalized number and whether it is treated as a patent or a publication.",
                request_example: None,
            },
        ],
    })
}

enum AppError {
    BadRequest(String),
    Pipeline(PipelineError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            Self::Pipeline(error) => {
                tracing::error!(error = %error, "Summarize request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()).into_response()
            }
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(inner: PipelineError) -> Self {
        Self::Pipeline(inner)
    }
}
