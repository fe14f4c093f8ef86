//! Book-structure suggestions over finished (and optionally draft) chapters.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use folio_shared::{DocumentStatus, DocumentSummary};

use crate::index::IndexSnapshot;

/// How chapters should be arranged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganizationMode {
    /// Sections keyed by each chapter's primary concept.
    #[default]
    Conceptual,
    /// Accepted but not ordered: chapters stay in discovery order.
    Chronological,
    /// One sequence, shortest chapter first.
    Complexity,
    /// Accepted but not ordered: chapters stay in discovery order.
    Workflow,
}

impl OrganizationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conceptual => "conceptual",
            Self::Chronological => "chronological",
            Self::Complexity => "complexity",
            Self::Workflow => "workflow",
        }
    }
}

impl fmt::Display for OrganizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chapters sharing a primary concept, longest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub concept: String,
    pub chapters: Vec<DocumentSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookStructure {
    Sections(Vec<Section>),
    Sequence(Vec<DocumentSummary>),
}

/// Arrange the finished chapters (plus drafts when `include_drafts`).
pub fn organize(
    snapshot: &IndexSnapshot,
    mode: OrganizationMode,
    include_drafts: bool,
) -> BookStructure {
    let mut chapters: Vec<DocumentSummary> = snapshot
        .summaries()
        .iter()
        .filter(|s| {
            s.status == DocumentStatus::Finished
                || (include_drafts && s.status == DocumentStatus::Draft)
        })
        .cloned()
        .collect();

    match mode {
        OrganizationMode::Conceptual => BookStructure::Sections(group_by_primary_concept(chapters)),
        OrganizationMode::Complexity => {
            chapters.sort_by_key(|c| c.word_count);
            BookStructure::Sequence(chapters)
        }
        OrganizationMode::Chronological | OrganizationMode::Workflow => {
            BookStructure::Sequence(chapters)
        }
    }
}

/// Groups appear in first-seen order; each group is sorted by word count, descending.
fn group_by_primary_concept(chapters: Vec<DocumentSummary>) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for chapter in chapters {
        let concept = chapter.primary_concept().to_string();
        let pos = *positions.entry(concept.clone()).or_insert_with(|| {
            sections.push(Section {
                concept,
                chapters: Vec::new(),
            });
            sections.len() - 1
        });
        sections[pos].chapters.push(chapter);
    }

    for section in &mut sections {
        section
            .chapters
            .sort_by(|a, b| b.word_count.cmp(&a.word_count));
    }
    sections
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use folio_shared::DocumentRecord;

    use super::*;

    fn record(id: &str, status: DocumentStatus, words: usize, concepts: &[&str]) -> DocumentRecord {
        DocumentRecord {
            id: id.into(),
            title: id.into(),
            subtitle: String::new(),
            description: String::new(),
            body: String::new(),
            word_count: words,
            has_images: false,
            status,
            concepts: concepts.iter().map(|s| s.to_string()).collect(),
            path: PathBuf::new(),
            content_hash: String::new(),
            error: None,
        }
    }

    fn snapshot() -> IndexSnapshot {
        use DocumentStatus::*;
        IndexSnapshot::from_records(vec![
            record("f1", Finished, 900, &["ux", "design system"]),
            record("d1", Draft, 1500, &["workflow"]),
            record("f2", Finished, 300, &["analytics"]),
            record("c1", Comment, 20, &["ux"]),
            record("f3", Finished, 1200, &["design system"]),
            record("f4", Finished, 50, &[]),
            record("e1", Error, 0, &[]),
        ])
    }

    fn ids(chapters: &[DocumentSummary]) -> Vec<&str> {
        chapters.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn complexity_is_ascending_finished_only() {
        let BookStructure::Sequence(seq) = organize(&snapshot(), OrganizationMode::Complexity, false)
        else {
            panic!("expected a sequence");
        };
        assert_eq!(ids(&seq), vec!["f4", "f2", "f1", "f3"]);
    }

    #[test]
    fn conceptual_groups_in_first_seen_order() {
        let BookStructure::Sections(sections) =
            organize(&snapshot(), OrganizationMode::Conceptual, true)
        else {
            panic!("expected sections");
        };
        let concepts: Vec<&str> = sections.iter().map(|s| s.concept.as_str()).collect();
        assert_eq!(concepts, vec!["design system", "workflow", "analytics", "general"]);
        assert_eq!(ids(&sections[0].chapters), vec!["f3", "f1"]);
        assert_eq!(ids(&sections[1].chapters), vec!["d1"]);
    }

    #[test]
    fn unordered_modes_pass_through() {
        for mode in [OrganizationMode::Chronological, OrganizationMode::Workflow] {
            let BookStructure::Sequence(seq) = organize(&snapshot(), mode, true) else {
                panic!("expected a sequence");
            };
            assert_eq!(ids(&seq), vec!["f1", "d1", "f2", "f3", "f4"]);
        }
    }

    #[test]
    fn mode_parses_from_lowercase() {
        let mode: OrganizationMode = serde_json::from_str("\"complexity\"").unwrap();
        assert_eq!(mode, OrganizationMode::Complexity);
        assert!(serde_json::from_str::<OrganizationMode>("\"random\"").is_err());
    }
}
