//! Core domain types for an indexed article archive.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Placeholder used when a document has no concepts to group by.
pub const GENERAL_CONCEPT: &str = "general";

/// Most concepts kept per document.
pub const MAX_CONCEPTS: usize = 10;

// ---------------------------------------------------------------------------
// DocumentStatus
// ---------------------------------------------------------------------------

/// Editorial completeness of an archived article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Finished,
    Draft,
    Comment,
    Error,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Finished => "finished",
            Self::Draft => "draft",
            Self::Comment => "comment",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DocumentRecord
// ---------------------------------------------------------------------------

/// Everything known about one archived article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Name of the enclosing directory; unique within an archive.
    pub id: String,
    pub title: String,
    /// Empty when the page has no summary/subtitle element.
    pub subtitle: String,
    pub description: String,
    /// Plain text with scripts/styles removed and blank runs collapsed.
    pub body: String,
    pub word_count: usize,
    pub has_images: bool,
    pub status: DocumentStatus,
    /// At most [`MAX_CONCEPTS`], in discovery order.
    pub concepts: Vec<String>,
    /// The markup file this record was extracted from.
    pub path: PathBuf,
    /// SHA-256 of the raw file bytes (empty if the file could not be read).
    pub content_hash: String,
    /// Extraction failure cause, set only for `Error` records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentRecord {
    /// The first multi-word concept, else the first concept, else `"general"`.
    pub fn primary_concept(&self) -> &str {
        primary_concept(&self.concepts)
    }
}

/// Primary-concept rule shared by records and summaries.
pub fn primary_concept(concepts: &[String]) -> &str {
    concepts
        .iter()
        .find(|c| c.split_whitespace().count() > 1)
        .or_else(|| concepts.first())
        .map(String::as_str)
        .unwrap_or(GENERAL_CONCEPT)
}

// ---------------------------------------------------------------------------
// DocumentSummary
// ---------------------------------------------------------------------------

/// Listing-sized view of a record, kept in discovery order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub word_count: usize,
    pub has_images: bool,
    pub status: DocumentStatus,
    pub concepts: Vec<String>,
}

impl DocumentSummary {
    pub fn primary_concept(&self) -> &str {
        primary_concept(&self.concepts)
    }
}

impl From<&DocumentRecord> for DocumentSummary {
    fn from(record: &DocumentRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            subtitle: record.subtitle.clone(),
            description: record.description.clone(),
            word_count: record.word_count,
            has_images: record.has_images,
            status: record.status,
            concepts: record.concepts.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concepts(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn primary_prefers_multi_word() {
        let c = concepts(&["ux", "analytics", "design system", "user research"]);
        assert_eq!(primary_concept(&c), "design system");
    }

    #[test]
    fn primary_falls_back_to_first() {
        let c = concepts(&["workflow", "analytics"]);
        assert_eq!(primary_concept(&c), "workflow");
    }

    #[test]
    fn primary_defaults_to_general() {
        assert_eq!(primary_concept(&[]), GENERAL_CONCEPT);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&DocumentStatus::Comment).expect("serialize");
        assert_eq!(json, "\"comment\"");
        assert_eq!(DocumentStatus::Error.to_string(), "error");
    }

    #[test]
    fn summary_copies_listing_fields() {
        let record = DocumentRecord {
            id: "draft-test".into(),
            title: "Draft".into(),
            subtitle: String::new(),
            description: "d".into(),
            body: "one two".into(),
            word_count: 2,
            has_images: true,
            status: DocumentStatus::Draft,
            concepts: concepts(&["workflow"]),
            path: PathBuf::from("draft-test/index.html"),
            content_hash: String::new(),
            error: None,
        };
        let summary = DocumentSummary::from(&record);
        assert_eq!(summary.id, "draft-test");
        assert_eq!(summary.word_count, 2);
        assert!(summary.has_images);
        assert_eq!(summary.primary_concept(), "workflow");
    }
}
