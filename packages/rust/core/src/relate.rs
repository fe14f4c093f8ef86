//! Concept-overlap ranking between documents.

use std::collections::HashSet;

use folio_shared::DocumentStatus;

use crate::error::QueryError;
use crate::index::IndexSnapshot;

/// A document sharing at least one concept with the target set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedDocument {
    pub id: String,
    pub title: String,
    pub status: DocumentStatus,
    /// Size of the case-insensitive intersection with the target set.
    pub overlap: usize,
    /// Shared concepts, lower-cased, in the candidate's concept order.
    pub shared: Vec<String>,
    pub word_count: usize,
}

/// Rank every document except `exclude` by how many target concepts it shares.
///
/// Documents sharing nothing are left out. Ties keep discovery order.
pub fn find_related(
    snapshot: &IndexSnapshot,
    target: &[String],
    exclude: Option<&str>,
) -> Vec<RelatedDocument> {
    let target: HashSet<String> = target.iter().map(|c| c.to_lowercase()).collect();
    if target.is_empty() {
        return Vec::new();
    }

    let mut related: Vec<RelatedDocument> = snapshot
        .records()
        .filter(|record| exclude != Some(record.id.as_str()))
        .filter_map(|record| {
            let mut seen = HashSet::new();
            let shared: Vec<String> = record
                .concepts
                .iter()
                .map(|c| c.to_lowercase())
                .filter(|c| target.contains(c) && seen.insert(c.clone()))
                .collect();
            if shared.is_empty() {
                return None;
            }
            Some(RelatedDocument {
                id: record.id.clone(),
                title: record.title.clone(),
                status: record.status,
                overlap: shared.len(),
                shared,
                word_count: record.word_count,
            })
        })
        .collect();

    related.sort_by(|a, b| b.overlap.cmp(&a.overlap));
    related
}

/// Documents related to `id`, seeded with that document's own concepts.
pub fn related_to_document(
    snapshot: &IndexSnapshot,
    id: &str,
) -> Result<Vec<RelatedDocument>, QueryError> {
    let seed = snapshot
        .get(id)
        .ok_or_else(|| QueryError::unknown_entity("Chapter", id))?;
    Ok(find_related(snapshot, &seed.concepts, Some(id)))
}

/// Documents tagged with the free-text `theme` (matched as one whole concept).
pub fn related_to_theme(snapshot: &IndexSnapshot, theme: &str) -> Vec<RelatedDocument> {
    find_related(snapshot, &[theme.to_lowercase()], None)
}
