//! Typed argument sets, one per tool.
//!
//! Hosts send arguments as a JSON object; absent keys take the defaults
//! below and unrecognized keys are ignored.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::QueryError;
use crate::structure::OrganizationMode;

/// Deserialize a tool's arguments, treating `null` as an empty object.
pub(crate) fn parse<T: DeserializeOwned>(arguments: &serde_json::Value) -> Result<T, QueryError> {
    let value = if arguments.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        arguments.clone()
    };
    serde_json::from_value(value).map_err(|e| QueryError::InvalidArgument(e.to_string()))
}

/// Return the argument untouched if present and non-blank.
pub(crate) fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, QueryError> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(QueryError::missing(name)),
    }
}

fn default_search_limit() -> usize {
    10
}

fn default_list_limit() -> usize {
    20
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchArgs {
    pub query: Option<String>,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetArticleArgs {
    pub article_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListArgs {
    #[serde(default = "default_list_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopicsArgs {
    #[serde(default)]
    pub article_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FindRelatedArgs {
    pub theme: Option<String>,
    pub chapter_id: Option<String>,
    #[serde(default = "default_true")]
    pub include_drafts: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum StatusFilter {
    #[default]
    All,
    Finished,
    Draft,
    Comment,
}

impl StatusFilter {
    pub fn shows(&self, section: StatusFilter) -> bool {
        *self == StatusFilter::All || *self == section
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletenessArgs {
    #[serde(default)]
    pub status_filter: StatusFilter,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChapterContentArgs {
    pub chapter_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConceptDepth {
    /// First five concepts per chapter.
    #[default]
    Surface,
    /// Every concept per chapter.
    Deep,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PhilosophyArgs {
    #[serde(default)]
    pub chapter_ids: Vec<String>,
    #[serde(default)]
    pub concept_depth: ConceptDepth,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverlapArgs {
    #[serde(default)]
    pub chapter_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StructureArgs {
    #[serde(default)]
    pub organization_type: OrganizationMode,
    #[serde(default)]
    pub include_drafts: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_apply_to_null_and_empty() {
        let args: SearchArgs = parse(&serde_json::Value::Null).unwrap();
        assert_eq!(args.limit, 10);
        assert!(args.query.is_none());

        let args: FindRelatedArgs = parse(&json!({})).unwrap();
        assert!(args.include_drafts);

        let args: StructureArgs = parse(&json!({})).unwrap();
        assert_eq!(args.organization_type, OrganizationMode::Conceptual);
        assert!(!args.include_drafts);
    }

    #[test]
    fn wrong_types_are_invalid_arguments() {
        let err = parse::<ListArgs>(&json!({ "limit": "many" })).unwrap_err();
        assert!(matches!(err, QueryError::InvalidArgument(_)));

        let err = parse::<CompletenessArgs>(&json!({ "status_filter": "someday" })).unwrap_err();
        assert!(matches!(err, QueryError::InvalidArgument(_)));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let args: OverlapArgs = parse(&json!({ "chapter_ids": ["a", "b"], "extra": 1 })).unwrap();
        assert_eq!(args.chapter_ids, vec!["a", "b"]);
    }

    #[test]
    fn blank_required_values_are_missing() {
        assert_eq!(
            required(&Some("  ".into()), "chapter_id").unwrap_err(),
            QueryError::missing("chapter_id")
        );
        assert_eq!(required(&Some("x".into()), "chapter_id").unwrap(), "x");
        assert_eq!(required(&Some(" ux ".into()), "query").unwrap(), " ux ");
        assert!(required(&None, "chapter_id").is_err());
    }
}
