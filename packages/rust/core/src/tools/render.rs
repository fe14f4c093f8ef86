//! Plain-text rendering of query results, as shown to the host.

use std::fmt::Write as _;

use folio_markup::title_case;
use folio_shared::{DocumentRecord, DocumentSummary};

use crate::catalog::{SearchHit, StatusBreakdown};
use crate::overlap::OverlapReport;
use crate::relate::RelatedDocument;
use crate::structure::{BookStructure, OrganizationMode};

use super::args::{ConceptDepth, StatusFilter};

/// Related documents rendered per call.
const RELATED_SHOWN: usize = 10;
/// Philosophy distribution lines rendered per call.
pub(crate) const DISTRIBUTION_SHOWN: usize = 10;
/// Concepts per chapter in a surface-depth distribution.
const SURFACE_CONCEPTS: usize = 5;
/// Common words rendered in an overlap report.
const COMMON_WORDS_SHOWN: usize = 15;
/// Sample words rendered per overlapping pair.
const PAIR_WORDS_SHOWN: usize = 5;

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

pub(crate) fn search_results(query: &str, hits: &[SearchHit]) -> String {
    let mut out = format!("Found {} articles matching '{query}':\n\n", hits.len());
    for hit in hits {
        let _ = writeln!(out, "**{}** (ID: {})", hit.title, hit.id);
        if !hit.description.is_empty() {
            let _ = writeln!(out, "Description: {}", hit.description);
        }
        let _ = writeln!(out, "Relevance score: {}\n", hit.relevance);
    }
    out
}

pub(crate) fn article(record: &DocumentRecord) -> String {
    let mut out = format!("# {}\n\n", record.title);
    if !record.description.is_empty() {
        let _ = writeln!(out, "**Description:** {}\n", record.description);
    }
    let _ = writeln!(out, "**Word Count:** {}", record.word_count);
    let _ = writeln!(out, "**Has Images:** {}", yes_no(record.has_images));
    let _ = writeln!(out, "**File Path:** {}\n", record.path.display());
    out.push_str("## Content\n\n");
    out.push_str(&record.body);
    out
}

pub(crate) fn article_list(shown: &[DocumentSummary], total: usize) -> String {
    let mut out = format!(
        "Available Articles ({} of {total} total):\n\n",
        shown.len()
    );
    for summary in shown {
        let _ = writeln!(out, "**{}** (ID: {})", summary.title, summary.id);
        if !summary.description.is_empty() {
            let _ = writeln!(out, "Description: {}", summary.description);
        }
        let _ = writeln!(
            out,
            "Words: {}, Images: {}\n",
            summary.word_count,
            yes_no(summary.has_images)
        );
    }
    out
}

pub(crate) fn topics(requested: usize, topics: &[(String, usize)]) -> String {
    let mut out = format!("Key topics from {requested} articles:\n\n");
    for (topic, count) in topics {
        let _ = writeln!(
            out,
            "- **{}**: appears in {count} article{}",
            title_case(topic),
            plural(*count)
        );
    }
    out
}

pub(crate) fn related(heading: &str, related: &[RelatedDocument]) -> String {
    let mut out = format!("{heading}:\n\n");
    for doc in related.iter().take(RELATED_SHOWN) {
        let _ = writeln!(out, "**{}** ({})", doc.title, doc.status);
        let _ = writeln!(out, "ID: {}", doc.id);
        let _ = writeln!(out, "Shared concepts: {}", doc.shared.join(", "));
        let _ = writeln!(
            out,
            "Words: {}, Overlap score: {}\n",
            doc.word_count, doc.overlap
        );
    }
    if related.is_empty() {
        out.push_str("No related chapters found.\n");
    }
    out
}

pub(crate) fn completeness(breakdown: &StatusBreakdown, filter: StatusFilter) -> String {
    let mut out = String::from("Chapter Completion Analysis:\n\n");

    let mut section = |label: &str, chapters: &[DocumentSummary]| {
        let _ = writeln!(out, "**{label} ({}):**", chapters.len());
        for chapter in chapters {
            let _ = writeln!(out, "- {} ({} words)", chapter.title, chapter.word_count);
        }
        out.push('\n');
    };
    if filter.shows(StatusFilter::Finished) {
        section("Finished Chapters", &breakdown.finished);
    }
    if filter.shows(StatusFilter::Draft) {
        section("Draft Chapters", &breakdown.drafts);
    }
    if filter.shows(StatusFilter::Comment) {
        section("Comments/Responses", &breakdown.comments);
    }

    let _ = write!(
        out,
        "**Summary:** {} finished, {} drafts, {} comments",
        breakdown.finished.len(),
        breakdown.drafts.len(),
        breakdown.comments.len()
    );
    if !breakdown.errors.is_empty() {
        let _ = write!(out, ", {} unreadable", breakdown.errors.len());
    }
    out.push('\n');
    out
}

pub(crate) fn chapter_content(record: &DocumentRecord) -> String {
    let mut out = format!("# {}\n\n", record.title);
    if !record.subtitle.is_empty() {
        let _ = writeln!(out, "**Subtitle:** {}\n", record.subtitle);
    }
    let _ = writeln!(out, "**Status:** {}", title_case(record.status.as_str()));
    let _ = writeln!(out, "**Word Count:** {}", record.word_count);
    let _ = writeln!(out, "**Has Images:** {}", yes_no(record.has_images));
    let _ = writeln!(out, "**Design Concepts:** {}", record.concepts.join(", "));
    let _ = writeln!(out, "**File Path:** {}\n", record.path.display());
    out.push_str("## Content\n\n");
    out.push_str(&record.body);
    out
}

pub(crate) fn philosophy(
    requested: usize,
    frequencies: &[(String, usize)],
    distribution: &[(&str, &[String])],
    depth: ConceptDepth,
) -> String {
    let mut out = format!("Design Philosophy Analysis ({requested} chapters):\n\n");
    out.push_str("**Core Design Concepts:**\n");
    for (concept, count) in frequencies {
        let _ = writeln!(
            out,
            "- **{}**: appears in {count} chapter{}",
            title_case(concept),
            plural(*count)
        );
    }

    out.push_str("\n**Concept Distribution Across Chapters:**\n");
    for (title, concepts) in distribution {
        let shown = match depth {
            ConceptDepth::Surface => &concepts[..concepts.len().min(SURFACE_CONCEPTS)],
            ConceptDepth::Deep => &concepts[..],
        };
        let _ = writeln!(out, "- **{title}**: {}", shown.join(", "));
    }
    out
}

pub(crate) fn overlaps(report: &OverlapReport) -> String {
    let titles: Vec<&str> = report.documents.iter().map(|d| d.title.as_str()).collect();
    let common: Vec<&str> = report
        .common_words
        .iter()
        .take(COMMON_WORDS_SHOWN)
        .map(String::as_str)
        .collect();

    let mut out = String::from("Content Overlap Analysis:\n\n");
    let _ = writeln!(out, "**Chapters Analyzed:** {}\n", titles.join(", "));
    let _ = writeln!(out, "**Common Themes:** {}\n", common.join(", "));
    out.push_str("**Pairwise Overlaps:**\n");
    for pair in &report.pairs {
        let sample: Vec<&str> = pair
            .sample
            .iter()
            .take(PAIR_WORDS_SHOWN)
            .map(String::as_str)
            .collect();
        let _ = writeln!(
            out,
            "- **{}** & **{}**: {} shared terms",
            pair.first.title, pair.second.title, pair.overlap_words
        );
        let _ = writeln!(out, "  Key themes: {}\n", sample.join(", "));
    }
    out
}

pub(crate) fn book_structure(mode: OrganizationMode, structure: &BookStructure) -> String {
    let mut out = format!("Suggested Book Structure ({mode} organization):\n\n");
    let line = |c: &DocumentSummary| format!("{} ({} words, {})", c.title, c.word_count, c.status);

    match structure {
        BookStructure::Sections(sections) => {
            for (i, section) in sections.iter().enumerate() {
                let _ = writeln!(out, "## Section {}: {}", i + 1, title_case(&section.concept));
                for chapter in &section.chapters {
                    let _ = writeln!(out, "- {}", line(chapter));
                }
                out.push('\n');
            }
        }
        BookStructure::Sequence(chapters) => {
            out.push_str("## Suggested Chapter Sequence:\n");
            for (i, chapter) in chapters.iter().enumerate() {
                let _ = writeln!(out, "{}. {}", i + 1, line(chapter));
            }
        }
    }
    out
}
