//! Application configuration for folio.
//!
//! User config lives at `~/.folio/folio.toml`.
//! CLI flags override config file values, which override defaults.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "folio.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".folio";

/// Ids of the chapters the author has marked as finished.
const DEFAULT_FINISHED: &[&str] = &[
    "Tim-s-Theory-of-Trails-7f9c33b1cf7d",
    "Visualizing-the-Difference-between-Analytics---Monitoring-3cd5881cf7ab",
    "Five-Common-Product-Fails-b42aed30e7",
    "Metric-Display-Standards-54736533c81",
    "A-Natural-Reaction-ff1ce1c1f8b6",
    "How-to-Get-Started-Designing-for-Developers-2a454c3f699b",
    "Understanding-Data-a573693cdea8",
    "How-Product-Development-Works-Best-95109dcf065d",
    "Every-designer-needs-an-ethical-framework--b64f37ec890",
    "Co-Designing-the-Digital-Machine-45ac5c0a9dc2",
    "Window-Seat-98c38b5e3a3",
    "How-Much-User-Research-Is-Enough--d18d574f3f60",
    "Slack--I-m-still-into-you--bb58e7a85165",
    "Chatting-with-Your-Computer-40962d3d651f",
    "Managing-the-High-Throughput-Design-Studio-1969645a6c12",
    "The-Analytic-Workflow-3e551e67647f",
    "Interchangeable-Parts-d2ca009eaa5b",
    "The-User-Experience-of-Language-Design-e4668ce88fad",
];

// ---------------------------------------------------------------------------
// Config structs (matching folio.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the exported articles live.
    #[serde(default)]
    pub archive: ArchiveConfig,

    /// Editorial classification data.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Host-protocol settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// `[archive]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Root directory holding one subdirectory per article.
    #[serde(default = "default_archive_root")]
    pub root: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            root: default_archive_root(),
        }
    }
}

fn default_archive_root() -> String {
    "data".into()
}

/// `[catalog]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directory names of finished chapters. Anything else is never `finished`.
    #[serde(default = "default_finished")]
    pub finished: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            finished: default_finished(),
        }
    }
}

fn default_finished() -> Vec<String> {
    DEFAULT_FINISHED.iter().map(|s| s.to_string()).collect()
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Name reported to the host during the handshake.
    #[serde(default = "default_server_name")]
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

fn default_server_name() -> String {
    "folio".into()
}

// ---------------------------------------------------------------------------
// Runtime archive settings (merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime settings handed to the index: resolved root and finished set.
#[derive(Debug, Clone)]
pub struct ArchiveSettings {
    /// Archive root directory.
    pub root: PathBuf,
    /// Known-finished chapter ids.
    pub finished: HashSet<String>,
}

impl ArchiveSettings {
    /// Build settings from a loaded config, optionally overriding the root.
    pub fn from_config(config: &AppConfig, root_override: Option<&Path>) -> Self {
        let root = root_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| expand_home(&config.archive.root));
        Self {
            root,
            finished: config.catalog.finished.iter().cloned().collect(),
        }
    }
}

/// Expand a leading `~/` to the user's home directory.
fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.folio/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| FolioError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.folio/folio.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| FolioError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| FolioError::config(format!("failed to parse {}: {e}", path.display())))?;
    validate_config(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| FolioError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| FolioError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| FolioError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Reject configs that could never index anything sensible.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.archive.root.trim().is_empty() {
        return Err(FolioError::validation("archive.root must not be empty"));
    }
    if let Some(bad) = config
        .catalog
        .finished
        .iter()
        .find(|id| id.trim().is_empty() || id.contains('/'))
    {
        return Err(FolioError::validation(format!(
            "catalog.finished entry {bad:?} is not a directory name"
        )));
    }
    Ok(())
}
