//! Archive indexing and concept-overlap analysis for Folio.
//!
//! [`index::ArchiveIndex`] scans an archive of exported articles, classifies
//! each one and publishes an immutable [`index::IndexSnapshot`]. The query
//! modules read snapshots; [`tools`] exposes them as named text-returning
//! operations for a host.

pub mod catalog;
pub mod classify;
pub mod error;
pub mod index;
pub mod overlap;
pub mod relate;
pub mod structure;
pub mod tools;

pub use classify::{Classifier, extract_concepts};
pub use error::QueryError;
pub use index::{ArchiveIndex, IndexSnapshot, ProgressReporter, SilentProgress, discover_documents};
pub use tools::{ToolDefinition, ToolName, call_tool, definitions};
