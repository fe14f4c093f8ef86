//! Tool catalogue and dispatch.
//!
//! The host calls a tool by name with a JSON argument object and gets back
//! human-readable text. Every failure, including an unknown tool name, comes
//! back as an `Error: ...` text result; nothing here panics or propagates.

mod args;
mod render;

use std::fmt;
use std::str::FromStr;

use folio_shared::DocumentStatus;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::catalog;
use crate::error::QueryError;
use crate::index::{ArchiveIndex, IndexSnapshot};
use crate::overlap;
use crate::relate;
use crate::structure;

use args::{
    ChapterContentArgs, CompletenessArgs, FindRelatedArgs, GetArticleArgs, ListArgs, OverlapArgs,
    PhilosophyArgs, SearchArgs, StructureArgs, TopicsArgs,
};

// ---------------------------------------------------------------------------
// Tool names
// ---------------------------------------------------------------------------

/// Every tool the dispatcher recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    SearchArticles,
    GetArticle,
    ListArticles,
    GetArticleTopics,
    FindRelatedChapters,
    AnalyzeChapterCompleteness,
    GetChapterContent,
    ExtractDesignPhilosophy,
    IdentifyContentOverlaps,
    SuggestBookStructure,
}

impl ToolName {
    pub const ALL: [ToolName; 10] = [
        Self::SearchArticles,
        Self::GetArticle,
        Self::ListArticles,
        Self::GetArticleTopics,
        Self::FindRelatedChapters,
        Self::AnalyzeChapterCompleteness,
        Self::GetChapterContent,
        Self::ExtractDesignPhilosophy,
        Self::IdentifyContentOverlaps,
        Self::SuggestBookStructure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SearchArticles => "search_articles",
            Self::GetArticle => "get_article",
            Self::ListArticles => "list_articles",
            Self::GetArticleTopics => "get_article_topics",
            Self::FindRelatedChapters => "find_related_chapters",
            Self::AnalyzeChapterCompleteness => "analyze_chapter_completeness",
            Self::GetChapterContent => "get_chapter_content",
            Self::ExtractDesignPhilosophy => "extract_design_philosophy",
            Self::IdentifyContentOverlaps => "identify_content_overlaps",
            Self::SuggestBookStructure => "suggest_book_structure",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::SearchArticles => "Search through archived articles by keyword or theme",
            Self::GetArticle => "Get the full content of a specific article",
            Self::ListArticles => "List all available articles with basic metadata",
            Self::GetArticleTopics => "Extract key topics and themes from article titles",
            Self::FindRelatedChapters => {
                "Find chapters with similar themes for potential combination or reference"
            }
            Self::AnalyzeChapterCompleteness => {
                "Show completion status of all chapters (finished/draft/comment)"
            }
            Self::GetChapterContent => {
                "Get full content of a specific chapter for editing/reference"
            }
            Self::ExtractDesignPhilosophy => {
                "Extract core design concepts and philosophy themes across chapters"
            }
            Self::IdentifyContentOverlaps => {
                "Find redundant or complementary material between chapters for merging decisions"
            }
            Self::SuggestBookStructure => {
                "Analyze potential chapter sequences and book organization"
            }
        }
    }

    /// JSON Schema for the tool's argument object.
    pub fn input_schema(&self) -> Value {
        match self {
            Self::SearchArticles => json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Search query for article content" },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of results to return (default: 10)",
                        "default": 10
                    }
                },
                "required": ["query"]
            }),
            Self::GetArticle => json!({
                "type": "object",
                "properties": {
                    "article_id": { "type": "string", "description": "The ID/directory name of the article" }
                },
                "required": ["article_id"]
            }),
            Self::ListArticles => json!({
                "type": "object",
                "properties": {
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of articles to return (default: 20)",
                        "default": 20
                    }
                }
            }),
            Self::GetArticleTopics => json!({
                "type": "object",
                "properties": {
                    "article_ids": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "List of article IDs to analyze (if empty, analyzes all articles)"
                    }
                }
            }),
            Self::FindRelatedChapters => json!({
                "type": "object",
                "properties": {
                    "theme": { "type": "string", "description": "Theme or concept to find related chapters for" },
                    "chapter_id": { "type": "string", "description": "Optional: ID of a chapter to find chapters similar to" },
                    "include_drafts": {
                        "type": "boolean",
                        "description": "Include draft chapters in results (default: true)",
                        "default": true
                    }
                }
            }),
            Self::AnalyzeChapterCompleteness => json!({
                "type": "object",
                "properties": {
                    "status_filter": {
                        "type": "string",
                        "enum": ["all", "finished", "draft", "comment"],
                        "description": "Filter chapters by status (default: all)",
                        "default": "all"
                    }
                }
            }),
            Self::GetChapterContent => json!({
                "type": "object",
                "properties": {
                    "chapter_id": { "type": "string", "description": "The ID/directory name of the chapter" }
                },
                "required": ["chapter_id"]
            }),
            Self::ExtractDesignPhilosophy => json!({
                "type": "object",
                "properties": {
                    "chapter_ids": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Specific chapter IDs to analyze (if empty, analyzes all finished chapters)"
                    },
                    "concept_depth": {
                        "type": "string",
                        "enum": ["surface", "deep"],
                        "description": "Level of concept analysis (default: surface)",
                        "default": "surface"
                    }
                }
            }),
            Self::IdentifyContentOverlaps => json!({
                "type": "object",
                "properties": {
                    "chapter_ids": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "List of chapter IDs to analyze for overlaps",
                        "minItems": 2
                    }
                },
                "required": ["chapter_ids"]
            }),
            Self::SuggestBookStructure => json!({
                "type": "object",
                "properties": {
                    "organization_type": {
                        "type": "string",
                        "enum": ["conceptual", "chronological", "complexity", "workflow"],
                        "description": "How to organize chapters (default: conceptual)",
                        "default": "conceptual"
                    },
                    "include_drafts": {
                        "type": "boolean",
                        "description": "Include draft chapters in structure (default: false)",
                        "default": false
                    }
                }
            }),
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| QueryError::UnknownOperation(s.to_string()))
    }
}

/// A tool as advertised to the host.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Definitions for every tool, in catalogue order.
pub fn definitions() -> Vec<ToolDefinition> {
    ToolName::ALL
        .iter()
        .map(|tool| ToolDefinition {
            name: tool.as_str(),
            description: tool.description(),
            input_schema: tool.input_schema(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run the named tool against `index` and return its text result.
///
/// The index is built on first use. Errors are rendered, never returned.
#[instrument(skip(index, arguments))]
pub fn call_tool(index: &ArchiveIndex, name: &str, arguments: &Value) -> String {
    match try_call_tool(index, name, arguments) {
        Ok(text) => text,
        Err(err) => {
            debug!(error = %err, "tool call failed");
            format!("Error: {err}")
        }
    }
}

fn try_call_tool(index: &ArchiveIndex, name: &str, arguments: &Value) -> Result<String, QueryError> {
    let tool: ToolName = name.parse()?;
    let snapshot = index.snapshot();
    run(tool, &snapshot, arguments)
}

/// Run a tool against a specific snapshot.
pub fn run(tool: ToolName, snapshot: &IndexSnapshot, arguments: &Value) -> Result<String, QueryError> {
    match tool {
        ToolName::SearchArticles => search_articles(snapshot, args::parse(arguments)?),
        ToolName::GetArticle => get_article(snapshot, args::parse(arguments)?),
        ToolName::ListArticles => Ok(list_articles(snapshot, args::parse(arguments)?)),
        ToolName::GetArticleTopics => Ok(get_article_topics(snapshot, args::parse(arguments)?)),
        ToolName::FindRelatedChapters => find_related_chapters(snapshot, args::parse(arguments)?),
        ToolName::AnalyzeChapterCompleteness => {
            Ok(analyze_chapter_completeness(snapshot, args::parse(arguments)?))
        }
        ToolName::GetChapterContent => get_chapter_content(snapshot, args::parse(arguments)?),
        ToolName::ExtractDesignPhilosophy => {
            Ok(extract_design_philosophy(snapshot, args::parse(arguments)?))
        }
        ToolName::IdentifyContentOverlaps => {
            identify_content_overlaps(snapshot, args::parse(arguments)?)
        }
        ToolName::SuggestBookStructure => Ok(suggest_book_structure(snapshot, args::parse(arguments)?)),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn search_articles(snapshot: &IndexSnapshot, args: SearchArgs) -> Result<String, QueryError> {
    let query = args::required(&args.query, "query")?.to_lowercase();
    let hits = catalog::search(snapshot, &query, args.limit);
    Ok(render::search_results(&query, &hits))
}

fn get_article(snapshot: &IndexSnapshot, args: GetArticleArgs) -> Result<String, QueryError> {
    let id = args::required(&args.article_id, "article_id")?;
    let record = snapshot
        .get(id)
        .ok_or_else(|| QueryError::unknown_entity("Article", id))?;
    Ok(render::article(record))
}

fn list_articles(snapshot: &IndexSnapshot, args: ListArgs) -> String {
    let summaries = snapshot.summaries();
    let shown = &summaries[..summaries.len().min(args.limit)];
    render::article_list(shown, summaries.len())
}

fn get_article_topics(snapshot: &IndexSnapshot, args: TopicsArgs) -> String {
    let requested = if args.article_ids.is_empty() {
        snapshot.len()
    } else {
        args.article_ids.len()
    };
    let topics = catalog::title_topics(snapshot, &args.article_ids);
    render::topics(requested, &topics)
}

fn find_related_chapters(
    snapshot: &IndexSnapshot,
    args: FindRelatedArgs,
) -> Result<String, QueryError> {
    let chapter_id = args.chapter_id.as_deref().filter(|id| !id.trim().is_empty());
    let theme = args.theme.as_deref().filter(|t| !t.trim().is_empty());

    let (heading, mut related) = match (chapter_id.and_then(|id| snapshot.get(id)), theme, chapter_id) {
        (Some(seed), _, _) => (
            format!("Chapters related to '{}'", seed.title),
            relate::related_to_document(snapshot, &seed.id)?,
        ),
        (None, Some(theme), _) => (
            format!("Chapters related to theme '{theme}'"),
            relate::related_to_theme(snapshot, theme),
        ),
        (None, None, Some(id)) => return Err(QueryError::unknown_entity("Chapter", id)),
        (None, None, None) => return Err(QueryError::missing("'theme' or 'chapter_id'")),
    };

    if !args.include_drafts {
        related.retain(|r| r.status == DocumentStatus::Finished);
    }
    Ok(render::related(&heading, &related))
}

fn analyze_chapter_completeness(snapshot: &IndexSnapshot, args: CompletenessArgs) -> String {
    let breakdown = catalog::status_breakdown(snapshot);
    render::completeness(&breakdown, args.status_filter)
}

fn get_chapter_content(
    snapshot: &IndexSnapshot,
    args: ChapterContentArgs,
) -> Result<String, QueryError> {
    let id = args::required(&args.chapter_id, "chapter_id")?;
    let record = snapshot
        .get(id)
        .ok_or_else(|| QueryError::unknown_entity("Chapter", id))?;
    Ok(render::chapter_content(record))
}

fn extract_design_philosophy(snapshot: &IndexSnapshot, args: PhilosophyArgs) -> String {
    let ids = if args.chapter_ids.is_empty() {
        catalog::finished_ids(snapshot)
    } else {
        args.chapter_ids
    };

    let frequencies = catalog::concept_frequencies(snapshot, &ids);
    let distribution: Vec<(&str, &[String])> = ids
        .iter()
        .take(render::DISTRIBUTION_SHOWN)
        .filter_map(|id| snapshot.get(id))
        .map(|r| (r.title.as_str(), r.concepts.as_slice()))
        .collect();

    render::philosophy(ids.len(), &frequencies, &distribution, args.concept_depth)
}

fn identify_content_overlaps(
    snapshot: &IndexSnapshot,
    args: OverlapArgs,
) -> Result<String, QueryError> {
    let report = overlap::analyze_overlap(snapshot, &args.chapter_ids)?;
    Ok(render::overlaps(&report))
}

fn suggest_book_structure(snapshot: &IndexSnapshot, args: StructureArgs) -> String {
    let book = structure::organize(snapshot, args.organization_type, args.include_drafts);
    render::book_structure(args.organization_type, &book)
}
