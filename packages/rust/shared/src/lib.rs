//! Shared types, error model, and configuration for folio.
//!
//! This crate is the foundation depended on by all other folio crates.
//! It provides:
//! - [`FolioError`]: the unified error type
//! - Domain types ([`DocumentRecord`], [`DocumentSummary`], [`DocumentStatus`])
//! - Configuration ([`AppConfig`], [`ArchiveSettings`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ArchiveConfig, ArchiveSettings, CatalogConfig, ServerConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, validate_config,
};
pub use error::{FolioError, Result};
pub use types::{
    DocumentRecord, DocumentStatus, DocumentSummary, GENERAL_CONCEPT, MAX_CONCEPTS,
    primary_concept,
};
