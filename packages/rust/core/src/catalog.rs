//! Listing-style queries: keyword search, status breakdown, topic and
//! concept frequencies.

use std::collections::HashMap;

use folio_shared::{DocumentStatus, DocumentSummary};

use crate::classify::LONG_WORD_RE;
use crate::index::IndexSnapshot;

/// Most entries returned by the frequency queries.
const MAX_FREQUENCIES: usize = 20;

/// Title words ignored when counting topics.
const TOPIC_STOP_WORDS: &[&str] = &[
    "with", "from", "your", "this", "that", "will", "have", "been", "they", "them", "their",
];

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Body occurrences plus twice the title occurrences.
    pub relevance: usize,
}

/// Case-insensitive substring search over titles and bodies.
///
/// Hits are ordered by relevance (ties keep discovery order) and truncated
/// to `limit`.
pub fn search(snapshot: &IndexSnapshot, query: &str, limit: usize) -> Vec<SearchHit> {
    let query = query.to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<SearchHit> = snapshot
        .records()
        .filter_map(|record| {
            let body_hits = record.body.to_lowercase().matches(&query).count();
            let title_hits = record.title.to_lowercase().matches(&query).count();
            if body_hits == 0 && title_hits == 0 {
                return None;
            }
            Some(SearchHit {
                id: record.id.clone(),
                title: record.title.clone(),
                description: record.description.clone(),
                relevance: body_hits + title_hits * 2,
            })
        })
        .collect();

    hits.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    hits.truncate(limit);
    hits
}

// ---------------------------------------------------------------------------
// Status breakdown
// ---------------------------------------------------------------------------

/// Summaries bucketed by status, each bucket in its display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusBreakdown {
    /// Longest first.
    pub finished: Vec<DocumentSummary>,
    /// Longest first.
    pub drafts: Vec<DocumentSummary>,
    /// Discovery order.
    pub comments: Vec<DocumentSummary>,
    /// Discovery order.
    pub errors: Vec<DocumentSummary>,
}

pub fn status_breakdown(snapshot: &IndexSnapshot) -> StatusBreakdown {
    let mut breakdown = StatusBreakdown::default();
    for summary in snapshot.summaries() {
        let bucket = match summary.status {
            DocumentStatus::Finished => &mut breakdown.finished,
            DocumentStatus::Draft => &mut breakdown.drafts,
            DocumentStatus::Comment => &mut breakdown.comments,
            DocumentStatus::Error => &mut breakdown.errors,
        };
        bucket.push(summary.clone());
    }
    breakdown
        .finished
        .sort_by(|a, b| b.word_count.cmp(&a.word_count));
    breakdown
        .drafts
        .sort_by(|a, b| b.word_count.cmp(&a.word_count));
    breakdown
}

// ---------------------------------------------------------------------------
// Frequencies
// ---------------------------------------------------------------------------

/// Insertion-ordered counter; ranking is stable so ties keep first-seen order.
#[derive(Default)]
struct Tally {
    counts: Vec<(String, usize)>,
    positions: HashMap<String, usize>,
}

impl Tally {
    fn add(&mut self, key: &str) {
        match self.positions.get(key) {
            Some(&pos) => self.counts[pos].1 += 1,
            None => {
                self.positions.insert(key.to_string(), self.counts.len());
                self.counts.push((key.to_string(), 1));
            }
        }
    }

    fn top(mut self, n: usize) -> Vec<(String, usize)> {
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts.truncate(n);
        self.counts
    }
}

/// Title-word frequencies across `ids` (all documents when `ids` is empty).
///
/// Unknown ids are skipped. A word repeated in one title counts each time.
pub fn title_topics(snapshot: &IndexSnapshot, ids: &[String]) -> Vec<(String, usize)> {
    let mut tally = Tally::default();
    let mut count_title = |title: &str| {
        let lower = title.to_lowercase();
        for m in LONG_WORD_RE.find_iter(&lower) {
            if !TOPIC_STOP_WORDS.contains(&m.as_str()) {
                tally.add(m.as_str());
            }
        }
    };

    if ids.is_empty() {
        snapshot.records().for_each(|r| count_title(&r.title));
    } else {
        ids.iter()
            .filter_map(|id| snapshot.get(id))
            .for_each(|r| count_title(&r.title));
    }
    tally.top(MAX_FREQUENCIES)
}

/// How many of the given documents carry each concept, most common first.
pub fn concept_frequencies(snapshot: &IndexSnapshot, ids: &[String]) -> Vec<(String, usize)> {
    let mut tally = Tally::default();
    for record in ids.iter().filter_map(|id| snapshot.get(id)) {
        for concept in &record.concepts {
            tally.add(concept);
        }
    }
    tally.top(MAX_FREQUENCIES)
}

/// Ids of finished documents in discovery order.
pub fn finished_ids(snapshot: &IndexSnapshot) -> Vec<String> {
    snapshot
        .summaries()
        .iter()
        .filter(|s| s.status == DocumentStatus::Finished)
        .map(|s| s.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use folio_shared::DocumentRecord;

    use super::*;

    fn record(id: &str, title: &str, body: &str, status: DocumentStatus) -> DocumentRecord {
        DocumentRecord {
            id: id.into(),
            title: title.into(),
            subtitle: String::new(),
            description: format!("about {id}"),
            body: body.into(),
            word_count: folio_markup::count_words(body),
            has_images: false,
            status,
            concepts: crate::classify::extract_concepts(title, body),
            path: PathBuf::new(),
            content_hash: String::new(),
            error: None,
        }
    }

    fn snapshot() -> IndexSnapshot {
        use DocumentStatus::*;
        IndexSnapshot::from_records(vec![
            record("a", "Analytics Dashboards", "analytics analytics and more", Finished),
            record("b", "Workflow Notes", "one analytics mention here today", Draft),
            record("c", "Reply", "thanks", Comment),
            record("d", "Analytics For Teams", "long long long long body text", Finished),
        ])
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn search_weights_title_hits() {
        let hits = search(&snapshot(), "Analytics", 10);
        let ranked: Vec<(&str, usize)> = hits.iter().map(|h| (h.id.as_str(), h.relevance)).collect();
        // a: 2 body + 2×1 title; d: 0 body + 2×1 title; b: 1 body.
        assert_eq!(ranked, vec![("a", 4), ("d", 2), ("b", 1)]);
    }

    #[test]
    fn search_respects_limit_and_empty_query() {
        assert_eq!(search(&snapshot(), "analytics", 1).len(), 1);
        assert!(search(&snapshot(), "", 10).is_empty());
        assert!(search(&snapshot(), "nowhere-to-be-found", 10).is_empty());
    }

    #[test]
    fn breakdown_sorts_finished_and_drafts() {
        let breakdown = status_breakdown(&snapshot());
        let finished: Vec<&str> = breakdown.finished.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(finished, vec!["d", "a"]);
        assert_eq!(breakdown.drafts.len(), 1);
        assert_eq!(breakdown.comments.len(), 1);
        assert!(breakdown.errors.is_empty());
    }

    #[test]
    fn topics_count_title_words() {
        let topics = title_topics(&snapshot(), &[]);
        assert_eq!(topics[0], ("analytics".to_string(), 2));
        assert!(topics.iter().all(|(w, _)| w.len() >= 4));
        assert!(!topics.iter().any(|(w, _)| w == "for"));

        let topics = title_topics(&snapshot(), &ids(&["b", "missing"]));
        assert_eq!(
            topics,
            vec![("workflow".to_string(), 1), ("notes".to_string(), 1)]
        );
    }

    #[test]
    fn concept_frequencies_rank_with_stable_ties() {
        let freq = concept_frequencies(&snapshot(), &finished_ids(&snapshot()));
        assert_eq!(freq[0], ("analytics".to_string(), 2));
        assert_eq!(finished_ids(&snapshot()), vec!["a", "d"]);
    }
}
