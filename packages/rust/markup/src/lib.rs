//! Article page extraction.
//!
//! Turns one exported article page (an HTML file inside its own directory)
//! into normalized text plus the handful of metadata fields the index needs.
//! Extraction never fails outright: unreadable files come back as an
//! [`ExtractedPage`] carrying the failure cause, so one bad page never stops
//! an index build.

mod cleanup;

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument, warn};

use folio_shared::{FolioError, Result};

pub use cleanup::{count_words, title_case, title_from_stem};

/// Name of the sibling directory holding an article's images.
pub const IMAGE_DIR: &str = "img";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Fields extracted from one article page.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPage {
    pub title: String,
    pub subtitle: String,
    /// Meta description, falling back to the subtitle.
    pub description: String,
    /// Normalized visible text. Holds a diagnostic message on failure.
    pub body: String,
    /// Token count of `body`; zero on failure.
    pub word_count: usize,
    pub has_images: bool,
    pub path: PathBuf,
    pub content_hash: String,
    /// Failure cause when the page could not be read or decoded.
    pub error: Option<String>,
}

impl ExtractedPage {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// The markup-only part of an extraction (no filesystem knowledge).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMarkup {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub body: String,
}

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

/// Title candidates in priority order; the first element found wins.
static TITLE_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        "h1.p-name",
        "h1",
        "title",
        ".p-name",
        r#"[data-testid="storyTitle"]"#,
    ]
    .iter()
    .map(|s| Selector::parse(s).expect("valid selector"))
    .collect()
});

static SUBTITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".p-summary, .graf--subtitle").expect("valid selector"));

static CONTENT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".e-content, article, .postArticle-content, main").expect("valid selector")
});

static META_DESCRIPTION_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="description"]"#).expect("valid selector"));

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Extract one article page from disk.
///
/// Read and decode failures are folded into the returned page (see
/// [`ExtractedPage::error`]) rather than returned as errors.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn extract_page(path: &Path) -> ExtractedPage {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => return failed_page(path, &stem, String::new(), FolioError::io(path, e)),
    };
    let content_hash = hash_bytes(&bytes);

    let html = match decode(path, bytes) {
        Ok(html) => html,
        Err(e) => return failed_page(path, &stem, content_hash, e),
    };

    let parsed = parse_markup(&html, &stem);
    let word_count = count_words(&parsed.body);
    let has_images = path.parent().map(has_images).unwrap_or(false);

    debug!(title = %parsed.title, word_count, has_images, "page extracted");

    ExtractedPage {
        title: parsed.title,
        subtitle: parsed.subtitle,
        description: parsed.description,
        body: parsed.body,
        word_count,
        has_images,
        path: path.to_path_buf(),
        content_hash,
        error: None,
    }
}

/// Parse page markup. `stem` is the file stem used when no title element exists.
pub fn parse_markup(html: &str, stem: &str) -> ParsedMarkup {
    let doc = Html::parse_document(html);

    let title = TITLE_SELECTORS
        .iter()
        .find_map(|sel| doc.select(sel).next())
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| title_from_stem(stem));

    let subtitle = doc
        .select(&SUBTITLE_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let raw_text = match doc.select(&CONTENT_SELECTOR).next() {
        Some(container) => visible_text(container),
        None => visible_text(doc.root_element()),
    };
    let body = cleanup::normalize_text(&raw_text);

    let description = doc
        .select(&META_DESCRIPTION_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::to_string)
        .unwrap_or_else(|| subtitle.clone());

    ParsedMarkup {
        title,
        subtitle,
        description,
        body,
    }
}

/// True iff `dir/img` exists and holds at least one entry, dotfiles included.
pub fn has_images(dir: &Path) -> bool {
    let Ok(mut entries) = std::fs::read_dir(dir.join(IMAGE_DIR)) else {
        return false;
    };
    entries.next().is_some()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Concatenate every text node under `root` that is not inside `<script>`/`<style>`.
fn visible_text(root: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|el| matches!(el.value().name(), "script" | "style"));
        if !hidden {
            out.push_str(text);
        }
    }
    out
}

fn decode(path: &Path, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|e| FolioError::parse(format!("{} is not valid UTF-8: {e}", path.display())))
}

fn hash_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

fn failed_page(path: &Path, stem: &str, content_hash: String, err: FolioError) -> ExtractedPage {
    warn!(error = %err, "failed to extract page");
    let cause = err.to_string();
    ExtractedPage {
        title: title_from_stem(stem),
        subtitle: String::new(),
        description: String::new(),
        body: format!("Error reading article: {cause}"),
        word_count: 0,
        has_images: false,
        path: path.to_path_buf(),
        content_hash,
        error: Some(cause),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture_path(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(name)
    }

    fn load_fixture(name: &str) -> String {
        fs::read_to_string(fixture_path(name))
            .unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"))
    }

    // --- Markup parsing ---

    #[test]
    fn medium_export_fixture() {
        let html = load_fixture("html/medium-export.html");
        let parsed = parse_markup(&html, "The-Analytic-Workflow-3e551e67647f");

        assert_eq!(parsed.title, "The Analytic Workflow");
        assert_eq!(parsed.subtitle, "How analysts actually move from question to answer");
        assert_eq!(parsed.description, "A field guide to the analytic workflow.");
        assert!(parsed.body.contains("Every analysis starts with a question"));
        assert!(!parsed.body.contains("trackPageView"), "script text leaked");
        assert!(!parsed.body.contains("font-family"), "style text leaked");
        assert!(!parsed.body.contains("Site footer"), "text outside the container leaked");
        assert!(!parsed.body.contains("\n\n\n"));
    }

    #[test]
    fn title_prefers_p_name_heading() {
        let html = r#"<html><head><title>Tab title</title></head><body>
            <h1>Other heading</h1><h1 class="p-name">Real Title</h1></body></html>"#;
        assert_eq!(parse_markup(html, "x").title, "Real Title");
    }

    #[test]
    fn title_falls_back_to_document_title() {
        let html = "<html><head><title> Tab Title </title></head><body><p>x</p></body></html>";
        assert_eq!(parse_markup(html, "x").title, "Tab Title");
    }

    #[test]
    fn title_falls_back_to_stem() {
        let html = "<html><body><p>No headings here.</p></body></html>";
        assert_eq!(parse_markup(html, "window-seat").title, "Window Seat");
    }

    #[test]
    fn empty_heading_falls_back_to_stem() {
        let html = "<html><body><h1>  </h1><p>text</p></body></html>";
        assert_eq!(parse_markup(html, "a-natural-reaction").title, "A Natural Reaction");
    }

    #[test]
    fn description_falls_back_to_subtitle() {
        let html = r#"<html><body><h1>T</h1>
            <h4 class="graf--subtitle">The short version</h4></body></html>"#;
        let parsed = parse_markup(html, "t");
        assert_eq!(parsed.subtitle, "The short version");
        assert_eq!(parsed.description, "The short version");
    }

    #[test]
    fn body_without_container_uses_whole_document() {
        let html = r#"<html><head><style>p { color: red; }</style></head>
            <body><p>Loose text.</p><script>var x = 1;</script></body></html>"#;
        let parsed = parse_markup(html, "loose");
        assert!(parsed.body.contains("Loose text."));
        assert!(!parsed.body.contains("color"));
        assert!(!parsed.body.contains("var x"));
    }

    #[test]
    fn first_container_in_document_order_wins() {
        let html = r#"<html><body>
            <main><p>Main text.</p></main>
            <section class="e-content"><p>Later text.</p></section>
        </body></html>"#;
        let parsed = parse_markup(html, "x");
        assert_eq!(parsed.body, "Main text.");
    }

    // --- Filesystem extraction ---

    #[test]
    fn extract_page_counts_words_and_images() {
        let dir = tempfile::tempdir().unwrap();
        let article = dir.path().join("Window-Seat-98c38b5e3a3");
        fs::create_dir_all(article.join(IMAGE_DIR)).unwrap();
        fs::write(article.join(IMAGE_DIR).join("cover.png"), b"png").unwrap();
        let file = article.join("window-seat.html");
        fs::write(&file, "<html><body><article><p>One two three</p></article></body></html>")
            .unwrap();

        let page = extract_page(&file);
        assert!(!page.is_error());
        assert_eq!(page.body, "One two three");
        assert_eq!(page.word_count, 3);
        assert!(page.has_images);
        assert_eq!(page.content_hash.len(), 64);
    }

    #[test]
    fn dotfiles_count_as_images() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(IMAGE_DIR)).unwrap();
        assert!(!has_images(dir.path()));

        fs::write(dir.path().join(IMAGE_DIR).join(".DS_Store"), b"").unwrap();
        assert!(has_images(dir.path()));
    }

    #[test]
    fn invalid_utf8_yields_error_page() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("broken-page.html");
        fs::write(&file, [0xff, 0xfe, 0x00, 0xc3, 0x28]).unwrap();

        let page = extract_page(&file);
        assert!(page.is_error());
        assert_eq!(page.title, "Broken Page");
        assert_eq!(page.word_count, 0);
        assert!(page.body.starts_with("Error reading article: parse error:"));
        assert!(!page.has_images);
    }

    #[test]
    fn missing_file_yields_error_page() {
        let dir = tempfile::tempdir().unwrap();
        let page = extract_page(&dir.path().join("gone.html"));
        assert!(page.is_error());
        assert!(page.content_hash.is_empty());
        assert!(page.error.unwrap().starts_with("I/O error"));
    }

    #[test]
    fn extraction_is_deterministic() {
        let path = fixture_path("html/medium-export.html");
        assert_eq!(extract_page(&path), extract_page(&path));
    }
}
