//! Per-request query failures.
//!
//! A [`QueryError`] only ends the request that raised it; the dispatcher
//! renders it as an `Error: ...` text result and the index stays usable.

/// Why a tool call could not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// A required argument was absent or empty.
    #[error("{name} is required")]
    MissingArgument { name: String },

    /// An argument had the wrong type or an unsupported value.
    #[error("invalid arguments: {0}")]
    InvalidArgument(String),

    /// The referenced document id is not in the index.
    #[error("{kind} '{id}' not found")]
    UnknownEntity { kind: &'static str, id: String },

    /// Fewer than two usable documents for an overlap-style query.
    #[error("{0}")]
    InsufficientInput(String),

    /// The tool name is not one the dispatcher knows.
    #[error("Unknown tool '{0}'")]
    UnknownOperation(String),
}

impl QueryError {
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingArgument { name: name.into() }
    }

    pub fn unknown_entity(kind: &'static str, id: impl Into<String>) -> Self {
        Self::UnknownEntity {
            kind,
            id: id.into(),
        }
    }
}
