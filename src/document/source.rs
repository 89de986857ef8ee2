//! Document retrieval collaborator and its USPTO-backed HTTP adapter.

use crate::config::Config;
use crate::document::DocumentKind;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

/// Errors returned by a document source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP layer failed before receiving a response (includes timeouts).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The source responded with an unexpected status code.
    #[error("Unexpected document source response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned by the source.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// The configured base URL cannot carry path segments.
    #[error("Invalid document source URL: {0}")]
    InvalidBaseUrl(String),
    /// The identifier cannot be used as a single path segment.
    #[error("Invalid document identifier: {0:?}")]
    InvalidIdentifier(String),
}

/// Interface implemented by document retrieval backends.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the plain description text for a document.
    ///
    /// `Ok(None)` means the document exists but carries no description (or is unknown to the
    /// source); errors cover transport and protocol failures.
    async fn get_text(
        &self,
        identifier: &str,
        kind: DocumentKind,
    ) -> Result<Option<String>, SourceError>;
}

/// HTTP client for the USPTO full-text endpoints.
pub struct UsptoDocumentSource {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FullTextResponse {
    #[serde(default)]
    description: Option<String>,
}

impl UsptoDocumentSource {
    /// Construct a client from explicit settings.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, SourceError> {
        let http = Client::builder()
            .user_agent("patsum/0.1")
            .timeout(timeout)
            .build()?;
        let base_url = base_url.into();
        let base_url = Url::parse(&base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or(SourceError::InvalidBaseUrl(base_url))?;
        tracing::debug!(
            url = %base_url,
            has_api_key = api_key.as_deref().is_some_and(|value| !value.is_empty()),
            "Initialized document source client"
        );
        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    /// Construct a client using the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        Self::new(
            config.uspto_base_url.clone(),
            config.uspto_api_key.clone(),
            config.document_timeout,
        )
    }

    /// `{base}/{patents|publications}/{identifier}/full-text`, with the identifier
    /// percent-encoded as exactly one path segment.
    fn endpoint(&self, identifier: &str, kind: DocumentKind) -> Result<Url, SourceError> {
        if matches!(identifier, "" | "." | "..") {
            return Err(SourceError::InvalidIdentifier(identifier.to_string()));
        }
        let category = match kind {
            DocumentKind::Patent => "patents",
            DocumentKind::Publication => "publications",
        };
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SourceError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend([category, identifier, "full-text"]);
        Ok(url)
    }
}

#[async_trait]
impl DocumentSource for UsptoDocumentSource {
    async fn get_text(
        &self,
        identifier: &str,
        kind: DocumentKind,
    ) -> Result<Option<String>, SourceError> {
        let mut request = self.http.get(self.endpoint(identifier, kind)?);
        if let Some(api_key) = &self.api_key
            && !api_key.is_empty()
        {
            request = request.header("X-API-KEY", api_key);
        }

        let response = request.send().await?;
        match response.status() {
            status if status.is_success() => {
                let body: FullTextResponse = response.json().await?;
                Ok(body.description)
            }
            StatusCode::NOT_FOUND => {
                tracing::debug!(identifier, %kind, "Document not found at source");
                Ok(None)
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(SourceError::UnexpectedStatus { status, body })
            }
        }
    }
}
