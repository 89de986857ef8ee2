//! Document resolution and retrieval: identifier classification and description fetching.

mod fetch;
mod resolver;
mod source;

pub use fetch::{FetchedDocument, fetch};
pub use resolver::{
    DocumentIdentifier, DocumentKind, MAX_PATENT_NUMBER_LEN, normalize, resolve,
};
pub use source::{DocumentSource, SourceError, UsptoDocumentSource};
