//! Patent vs. publication classification for raw document numbers.

use serde::Serialize;
use std::fmt;

/// Normalized numbers at or below this length are treated as granted patents.
///
/// The threshold is a heuristic: it is never checked against a real registry, so unusual
/// formats (kind codes, country prefixes) may land in the wrong category.
pub const MAX_PATENT_NUMBER_LEN: usize = 8;

/// Category of document requested from the document source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Granted patent (e.g. `9878232`).
    Patent,
    /// Pre-grant application publication (e.g. `20210123456`).
    Publication,
}

impl DocumentKind {
    /// Classify an already-normalized document number by length.
    pub fn of(normalized: &str) -> Self {
        if normalized.chars().count() <= MAX_PATENT_NUMBER_LEN {
            Self::Patent
        } else {
            Self::Publication
        }
    }

    /// Lowercase label used in logs and API responses.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patent => "patent",
            Self::Publication => "publication",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document number after punctuation stripping, paired with its resolved kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentIdentifier {
    normalized: String,
    kind: DocumentKind,
}

impl DocumentIdentifier {
    /// Normalized number sent to the document source.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Resolved document category.
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }
}

impl fmt::Display for DocumentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.normalized)
    }
}

/// Strip commas and slashes, then surrounding whitespace.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ',' | '/'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Resolve a raw document number into a normalized identifier. Never fails.
pub fn resolve(raw: &str) -> DocumentIdentifier {
    let normalized = normalize(raw);
    let kind = DocumentKind::of(&normalized);
    DocumentIdentifier { normalized, kind }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_numbers_resolve_to_patents() {
        let id = resolve("9878232");
        assert_eq!(id.kind(), DocumentKind::Patent);
        assert_eq!(id.normalized(), "9878232");

        assert_eq!(resolve("10001001").kind(), DocumentKind::Patent);
    }

    #[test]
    fn punctuation_is_ignored_when_measuring() {
        let id = resolve(" 9,878,232 ");
        assert_eq!(id.normalized(), "9878232");
        assert_eq!(id.kind(), DocumentKind::Patent);

        let id = resolve("2021/0123456");
        assert_eq!(id.normalized(), "20210123456");
        assert_eq!(id.kind(), DocumentKind::Publication);
    }

    #[test]
    fn threshold_is_inclusive_at_eight_characters() {
        for len in 0..=20 {
            let raw = "7".repeat(len);
            let expected = if len <= 8 {
                DocumentKind::Patent
            } else {
                DocumentKind::Publication
            };
            assert_eq!(DocumentKind::of(&raw), expected, "length {len}");
        }
    }

    #[test]
    fn inner_whitespace_counts_toward_length() {
        // "US 987823" keeps its inner space: nine characters.
        assert_eq!(resolve("US 987823").kind(), DocumentKind::Publication);
    }

    #[test]
    fn kind_serializes_lowercase() {
        let value = serde_json::to_value(DocumentKind::Publication).expect("json");
        assert_eq!(value, "publication");
    }
}
