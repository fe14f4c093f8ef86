//! Status classification and concept extraction.
//!
//! Concepts are found lexically: vocabulary phrases that occur verbatim in
//! the lower-cased title + body, followed by notable title words.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use folio_markup::ExtractedPage;
use folio_shared::{DocumentRecord, DocumentStatus, MAX_CONCEPTS};

/// Below this many body words a short-titled page may be a comment.
const COMMENT_WORD_LIMIT: usize = 200;

/// Titles with fewer words than this look like replies.
const COMMENT_TITLE_WORDS: usize = 4;

/// Domain vocabulary, scanned in this order.
const DESIGN_TERMS: &[&str] = &[
    "user experience",
    "ux",
    "design system",
    "product strategy",
    "user research",
    "analytics",
    "monitoring",
    "data visualization",
    "interface design",
    "usability",
    "product development",
    "design thinking",
    "systems thinking",
    "workflow",
    "development process",
    "design patterns",
    "user interface",
    "ui",
    "product management",
    "design standards",
    "design process",
    "design methodology",
    "design tools",
    "design collaboration",
    "design ethics",
    "design philosophy",
    "design language",
    "design principles",
    "design decisions",
    "design leadership",
];

/// Title words never promoted to concepts.
const TITLE_STOP_WORDS: &[&str] = &[
    "with", "from", "your", "this", "that", "will", "have", "been", "they", "them", "their",
    "common", "much", "best", "high",
];

/// Words of four or more ASCII letters.
pub(crate) static LONG_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z]{4,}\b").expect("valid regex"));

/// Assigns status and concepts to extracted pages.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    finished: HashSet<String>,
}

impl Classifier {
    pub fn new(finished: impl IntoIterator<Item = String>) -> Self {
        Self {
            finished: finished.into_iter().collect(),
        }
    }

    pub fn is_finished(&self, id: &str) -> bool {
        self.finished.contains(id)
    }

    /// Turn an extracted page into a full record for `id`.
    pub fn classify(&self, id: &str, page: ExtractedPage) -> DocumentRecord {
        let (status, concepts) = if page.is_error() {
            (DocumentStatus::Error, Vec::new())
        } else {
            (
                self.status_for(id, &page.title, page.word_count),
                extract_concepts(&page.title, &page.body),
            )
        };

        DocumentRecord {
            id: id.to_string(),
            title: page.title,
            subtitle: page.subtitle,
            description: page.description,
            body: page.body,
            word_count: page.word_count,
            has_images: page.has_images,
            status,
            concepts,
            path: page.path,
            content_hash: page.content_hash,
            error: page.error,
        }
    }

    /// Finished membership first, then the comment heuristic, else draft.
    pub fn status_for(&self, id: &str, title: &str, word_count: usize) -> DocumentStatus {
        if self.is_finished(id) {
            DocumentStatus::Finished
        } else if looks_like_comment(title, word_count) {
            DocumentStatus::Comment
        } else {
            DocumentStatus::Draft
        }
    }
}

/// Short body plus a reply-like title (`--` separator or under four words).
fn looks_like_comment(title: &str, word_count: usize) -> bool {
    word_count < COMMENT_WORD_LIMIT
        && (title.contains("--") || title.split_whitespace().count() < COMMENT_TITLE_WORDS)
}

/// Up to [`MAX_CONCEPTS`] concepts from `title` and `body`, in discovery order.
///
/// Title words are skipped when any existing concept *ends* with the same
/// word, so `"workflow"` is dropped after `"analytic workflow"` but
/// `"design"` survives `"design system"`.
pub fn extract_concepts(title: &str, body: &str) -> Vec<String> {
    let text = format!("{title} {body}").to_lowercase();

    let mut concepts: Vec<String> = DESIGN_TERMS
        .iter()
        .filter(|term| text.contains(*term))
        .map(|term| term.to_string())
        .collect();

    let title_lower = title.to_lowercase();
    for m in LONG_WORD_RE.find_iter(&title_lower) {
        let word = m.as_str();
        if TITLE_STOP_WORDS.contains(&word) {
            continue;
        }
        let represented = concepts
            .iter()
            .any(|c| c.split_whitespace().last() == Some(word));
        if !represented {
            concepts.push(word.to_string());
        }
    }

    concepts.truncate(MAX_CONCEPTS);
    concepts
}
