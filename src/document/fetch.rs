//! Fetch stage: turn a resolved identifier into description text.

use crate::document::{DocumentIdentifier, DocumentKind, DocumentSource};

/// Description text obtained for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    /// Plain description text; empty when nothing could be retrieved.
    pub full_text: String,
    /// Category the document was requested under.
    pub resolved_type: DocumentKind,
    /// Why `full_text` is empty when the source failed, kept for diagnostics.
    pub retrieval_error: Option<String>,
}

impl FetchedDocument {
    /// Whether there is any text to summarize.
    pub fn has_content(&self) -> bool {
        !self.full_text.trim().is_empty()
    }
}

/// Retrieve the description for `identifier`, degrading every failure into empty text.
pub async fn fetch(source: &dyn DocumentSource, identifier: &DocumentIdentifier) -> FetchedDocument {
    let kind = identifier.kind();
    match source.get_text(identifier.normalized(), kind).await {
        Ok(text) => FetchedDocument {
            full_text: text.unwrap_or_default(),
            resolved_type: kind,
            retrieval_error: None,
        },
        Err(error) => {
            tracing::warn!(
                document_number = identifier.normalized(),
                %kind,
                error = %error,
                "Document retrieval failed; treating as empty text"
            );
            FetchedDocument {
                full_text: String::new(),
                resolved_type: kind,
                retrieval_error: Some(error.to_string()),
            }
        }
    }
}
