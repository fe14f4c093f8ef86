//! Archive index: record store + discovery-ordered summaries.
//!
//! The archive is a root directory with one subdirectory per article:
//!
//! ```text
//! <root>/
//! ├── The-Analytic-Workflow-3e551e67647f/
//! │   ├── the-analytic-workflow.html
//! │   └── img/
//! └── Window-Seat-98c38b5e3a3/
//!     └── window-seat.html
//! ```
//!
//! A rebuild extracts and classifies every article into a fresh
//! [`IndexSnapshot`] and then publishes it in one swap, so readers always see
//! a complete record store and summary list from the same build.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use folio_shared::{ArchiveSettings, DocumentRecord, DocumentStatus, DocumentSummary};

use crate::classify::Classifier;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One complete, immutable build of the archive index.
#[derive(Debug, Clone, Default)]
pub struct IndexSnapshot {
    records: HashMap<String, DocumentRecord>,
    summaries: Vec<DocumentSummary>,
    built_at: Option<DateTime<Utc>>,
}

impl IndexSnapshot {
    /// Build a snapshot from records in discovery order.
    ///
    /// A repeated id keeps its first record so that summaries and the record
    /// store always describe the same set of documents.
    pub fn from_records(records: Vec<DocumentRecord>) -> Self {
        let mut store = HashMap::with_capacity(records.len());
        let mut summaries = Vec::with_capacity(records.len());
        for record in records {
            if store.contains_key(&record.id) {
                warn!(id = %record.id, "duplicate document id, keeping first");
                continue;
            }
            summaries.push(DocumentSummary::from(&record));
            store.insert(record.id.clone(), record);
        }
        Self {
            records: store,
            summaries,
            built_at: Some(Utc::now()),
        }
    }

    pub fn get(&self, id: &str) -> Option<&DocumentRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Full records in discovery order.
    pub fn records(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.summaries
            .iter()
            .filter_map(|summary| self.records.get(&summary.id))
    }

    /// Listing view in discovery order.
    pub fn summaries(&self) -> &[DocumentSummary] {
        &self.summaries
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// When this snapshot was assembled (`None` for the empty default).
    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.built_at
    }

    /// Number of documents with the given status.
    pub fn count_status(&self, status: DocumentStatus) -> usize {
        self.summaries.iter().filter(|s| s.status == status).count()
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Progress callback for reporting rebuild status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each document is extracted and classified.
    fn document_indexed(&self, id: &str, current: usize, total: usize);
    /// Called once the new snapshot is published.
    fn done(&self, snapshot: &IndexSnapshot);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn document_indexed(&self, _id: &str, _current: usize, _total: usize) {}
    fn done(&self, _snapshot: &IndexSnapshot) {}
}

// ---------------------------------------------------------------------------
// ArchiveIndex
// ---------------------------------------------------------------------------

/// Lazily built, wholesale-rebuilt index over one archive directory.
#[derive(Debug)]
pub struct ArchiveIndex {
    root: PathBuf,
    classifier: Classifier,
    current: RwLock<Option<Arc<IndexSnapshot>>>,
}

impl ArchiveIndex {
    pub fn new(settings: ArchiveSettings) -> Self {
        Self {
            root: settings.root,
            classifier: Classifier::new(settings.finished),
            current: RwLock::new(None),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn is_built(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The current snapshot, building it first if nothing has been built yet.
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        let existing = self
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match existing {
            Some(snapshot) => snapshot,
            None => self.rebuild(&SilentProgress),
        }
    }

    /// Re-scan the archive and replace the published snapshot.
    #[instrument(skip_all, fields(root = %self.root.display()))]
    pub fn rebuild(&self, progress: &dyn ProgressReporter) -> Arc<IndexSnapshot> {
        progress.phase("Scanning archive");
        let documents = discover_documents(&self.root);
        let total = documents.len();

        progress.phase("Extracting articles");
        let mut records = Vec::with_capacity(total);
        for (i, (id, path)) in documents.into_iter().enumerate() {
            let page = folio_markup::extract_page(&path);
            let record = self.classifier.classify(&id, page);
            debug!(%id, status = %record.status, words = record.word_count, "document indexed");
            progress.document_indexed(&id, i + 1, total);
            records.push(record);
        }

        let snapshot = Arc::new(IndexSnapshot::from_records(records));
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&snapshot));

        info!(
            documents = snapshot.len(),
            finished = snapshot.count_status(DocumentStatus::Finished),
            drafts = snapshot.count_status(DocumentStatus::Draft),
            comments = snapshot.count_status(DocumentStatus::Comment),
            errors = snapshot.count_status(DocumentStatus::Error),
            "index published"
        );
        progress.done(&snapshot);

        snapshot
    }
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// `(id, markup path)` for every article directory under `root`, sorted by id.
///
/// Each subdirectory, hidden ones included, contributes its first `*.html`
/// file (by name). Subdirectories without one are skipped.
pub fn discover_documents(root: &Path) -> Vec<(String, PathBuf)> {
    let mut dirs = match sorted_entries(root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(root = %root.display(), error = %e, "archive root not readable, index is empty");
            return Vec::new();
        }
    };
    dirs.retain(|p| p.is_dir());

    let mut documents = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let Some(id) = dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        let files = match sorted_entries(&dir) {
            Ok(files) => files,
            Err(e) => {
                warn!(%id, error = %e, "article directory not readable, skipping");
                continue;
            }
        };
        let markup = files
            .into_iter()
            .find(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "html"));
        match markup {
            Some(path) => documents.push((id, path)),
            None => debug!(%id, "no html file, skipping"),
        }
    }
    documents
}

/// Entries of `dir`, dotfiles included, sorted by file name.
fn sorted_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs;

    use super::*;

    fn write_article(root: &Path, id: &str, html: &str) {
        let dir = root.join(id);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{}.html", id.to_lowercase())), html).unwrap();
    }

    fn index_for(root: &Path, finished: &[&str]) -> ArchiveIndex {
        ArchiveIndex::new(ArchiveSettings {
            root: root.to_path_buf(),
            finished: finished.iter().map(|s| s.to_string()).collect::<HashSet<_>>(),
        })
    }

    #[test]
    fn discovery_is_sorted_and_keeps_hidden_directories() {
        let dir = tempfile::tempdir().unwrap();
        write_article(dir.path(), "b-article", "<h1>B</h1>");
        write_article(dir.path(), "a-article", "<h1>A</h1>");
        fs::create_dir_all(dir.path().join("no-markup")).unwrap();
        fs::write(dir.path().join("no-markup").join("notes.txt"), "x").unwrap();
        write_article(dir.path(), ".hidden", "<h1>H</h1>");
        fs::write(dir.path().join("stray.html"), "<h1>S</h1>").unwrap();

        let ids: Vec<String> = discover_documents(dir.path())
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec![".hidden", "a-article", "b-article"]);
    }

    #[test]
    fn missing_root_gives_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let index = index_for(&dir.path().join("absent"), &[]);
        let snapshot = index.snapshot();
        assert!(snapshot.is_empty());
        assert!(index.is_built());
    }

    #[test]
    fn summaries_match_record_store() {
        let dir = tempfile::tempdir().unwrap();
        write_article(dir.path(), "one", "<article><h1>First Long Article Title</h1></article>");
        write_article(dir.path(), "two", "<article><h1>Second Long Article Title</h1></article>");

        let snapshot = index_for(dir.path(), &["two"]).snapshot();
        assert_eq!(snapshot.len(), 2);
        for summary in snapshot.summaries() {
            let record = snapshot.get(&summary.id).expect("summary id in store");
            assert_eq!(DocumentSummary::from(record), *summary);
        }
        let order: Vec<&str> = snapshot.records().map(|r| r.id.as_str()).collect();
        assert_eq!(order, vec!["one", "two"]);
        assert_eq!(snapshot.get("two").unwrap().status, DocumentStatus::Finished);
    }

    #[test]
    fn rebuild_replaces_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        write_article(dir.path(), "one", "<h1>One</h1>");
        let index = index_for(dir.path(), &[]);

        let before = index.snapshot();
        assert_eq!(before.len(), 1);

        write_article(dir.path(), "two", "<h1>Two</h1>");
        // No implicit rebuild once built.
        assert_eq!(index.snapshot().len(), 1);

        let after = index.rebuild(&SilentProgress);
        assert_eq!(after.len(), 2);
        assert_eq!(index.snapshot().len(), 2);
        // Readers holding the old snapshot keep a consistent view.
        assert_eq!(before.len(), 1);
        assert!(!before.contains("two"));
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let record = |title: &str| DocumentRecord {
            id: "same".into(),
            title: title.into(),
            subtitle: String::new(),
            description: String::new(),
            body: String::new(),
            word_count: 0,
            has_images: false,
            status: DocumentStatus::Draft,
            concepts: vec![],
            path: PathBuf::new(),
            content_hash: String::new(),
            error: None,
        };
        let snapshot = IndexSnapshot::from_records(vec![record("first"), record("second")]);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("same").unwrap().title, "first");
    }
}
