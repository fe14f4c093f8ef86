//! Lexical overlap between document bodies.

use std::collections::{BTreeSet, HashSet};

use crate::classify::LONG_WORD_RE;
use crate::error::QueryError;
use crate::index::IndexSnapshot;

/// Fewest resolvable documents an overlap report needs.
pub const MIN_DOCUMENTS: usize = 2;

/// Most words reported as common to every document.
const MAX_COMMON_WORDS: usize = 20;

/// Most sample words reported per pair.
const MAX_PAIR_SAMPLE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedDocument {
    pub id: String,
    pub title: String,
}

/// Shared vocabulary between two documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairOverlap {
    pub first: AnalyzedDocument,
    pub second: AnalyzedDocument,
    /// Size of the intersection of the two word sets.
    pub overlap_words: usize,
    /// Alphabetically first shared words.
    pub sample: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapReport {
    /// Resolved documents, in request order.
    pub documents: Vec<AnalyzedDocument>,
    /// Words present in every document (alphabetical, not ranked by frequency).
    pub common_words: Vec<String>,
    /// One entry per unordered pair, in request order.
    pub pairs: Vec<PairOverlap>,
}

/// Lower-cased words of four or more ASCII letters in `body`.
pub fn word_set(body: &str) -> BTreeSet<String> {
    let lower = body.to_lowercase();
    LONG_WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Compare the bodies of the documents named by `ids`.
///
/// Unknown ids are ignored and repeated ids count once; fewer than
/// [`MIN_DOCUMENTS`] remaining is an [`QueryError::InsufficientInput`].
pub fn analyze_overlap(snapshot: &IndexSnapshot, ids: &[String]) -> Result<OverlapReport, QueryError> {
    if ids.len() < MIN_DOCUMENTS {
        return Err(QueryError::InsufficientInput(format!(
            "Need at least {MIN_DOCUMENTS} chapter IDs"
        )));
    }

    let mut seen = HashSet::new();
    let resolved: Vec<_> = ids
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .filter_map(|id| snapshot.get(id))
        .collect();
    if resolved.len() < MIN_DOCUMENTS {
        return Err(QueryError::InsufficientInput(
            "Not enough valid chapters found".to_string(),
        ));
    }

    let documents: Vec<AnalyzedDocument> = resolved
        .iter()
        .map(|r| AnalyzedDocument {
            id: r.id.clone(),
            title: r.title.clone(),
        })
        .collect();
    let word_sets: Vec<BTreeSet<String>> = resolved.iter().map(|r| word_set(&r.body)).collect();

    let common_words = word_sets[0]
        .iter()
        .filter(|word| word_sets[1..].iter().all(|set| set.contains(*word)))
        .take(MAX_COMMON_WORDS)
        .cloned()
        .collect();

    let mut pairs = Vec::with_capacity(documents.len() * (documents.len() - 1) / 2);
    for i in 0..documents.len() {
        for j in (i + 1)..documents.len() {
            let shared: Vec<&String> = word_sets[i].intersection(&word_sets[j]).collect();
            pairs.push(PairOverlap {
                first: documents[i].clone(),
                second: documents[j].clone(),
                overlap_words: shared.len(),
                sample: shared
                    .into_iter()
                    .take(MAX_PAIR_SAMPLE)
                    .cloned()
                    .collect(),
            });
        }
    }

    Ok(OverlapReport {
        documents,
        common_words,
        pairs,
    })
}
