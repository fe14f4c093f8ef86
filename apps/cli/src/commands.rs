//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use folio_core::{ArchiveIndex, IndexSnapshot, ProgressReporter, call_tool, definitions};
use folio_shared::{AppConfig, ArchiveSettings, DocumentStatus, init_config, load_config};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::server::Server;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Folio: browse and cross-reference an archive of exported articles.
#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "Index an exported article archive and serve concept-overlap tools over stdio.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Archive root directory (overrides `[archive] root`).
    #[arg(long, env = "FOLIO_ARCHIVE", global = true)]
    pub archive: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Serve the tools over newline-delimited JSON-RPC on stdin/stdout.
    Serve,

    /// Run a single tool and print its text result.
    Call {
        /// Tool name, e.g. `find_related_chapters`.
        tool: String,

        /// Tool arguments as a JSON object.
        #[arg(long, default_value = "{}")]
        args: String,
    },

    /// Rebuild the index and print per-status counts.
    Index,

    /// List the available tools.
    Tools,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// Everything goes to stderr; stdout belongs to the host protocol.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "folio=info",
        1 => "folio=debug",
        _ => "folio=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Serve => cmd_serve(cli.archive).await,
        Command::Call { tool, args } => cmd_call(cli.archive, &tool, &args).await,
        Command::Index => cmd_index(cli.archive).await,
        Command::Tools => cmd_tools(),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

/// Load config and build an (unbuilt) index over the resolved archive.
fn open_index(archive: Option<PathBuf>) -> Result<(AppConfig, ArchiveIndex)> {
    let config = load_config()?;
    let settings = ArchiveSettings::from_config(&config, archive.as_deref());
    info!(
        root = %settings.root.display(),
        finished = settings.finished.len(),
        "archive configured"
    );
    Ok((config, ArchiveIndex::new(settings)))
}

async fn cmd_serve(archive: Option<PathBuf>) -> Result<()> {
    let (config, index) = open_index(archive)?;
    let server = Server::new(Arc::new(index), config.server.name);
    server.run_stdio().await
}

async fn cmd_call(archive: Option<PathBuf>, tool: &str, args: &str) -> Result<()> {
    let arguments: serde_json::Value =
        serde_json::from_str(args).map_err(|e| eyre!("--args is not valid JSON: {e}"))?;
    let (_, index) = open_index(archive)?;

    let tool = tool.to_string();
    let text = tokio::task::spawn_blocking(move || call_tool(&index, &tool, &arguments)).await?;
    println!("{text}");
    Ok(())
}

async fn cmd_index(archive: Option<PathBuf>) -> Result<()> {
    let (_, index) = open_index(archive)?;
    let reporter = CliProgress::new()?;

    let snapshot = tokio::task::spawn_blocking(move || index.rebuild(&reporter)).await?;

    println!();
    println!("  Archive indexed!");
    println!("  Documents: {}", snapshot.len());
    println!("  Finished:  {}", snapshot.count_status(DocumentStatus::Finished));
    println!("  Drafts:    {}", snapshot.count_status(DocumentStatus::Draft));
    println!("  Comments:  {}", snapshot.count_status(DocumentStatus::Comment));
    println!("  Errors:    {}", snapshot.count_status(DocumentStatus::Error));
    if let Some(built_at) = snapshot.built_at() {
        println!("  Built:     {}", built_at.to_rfc3339());
    }
    println!();

    Ok(())
}

fn cmd_tools() -> Result<()> {
    for tool in definitions() {
        println!("{:<30} {}", tool.name, tool.description);
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// Index progress on an indicatif spinner (drawn to stderr).
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Result<Self> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")?
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Ok(Self { spinner })
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn document_indexed(&self, id: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Indexing [{current}/{total}] {id}"));
    }

    fn done(&self, _snapshot: &IndexSnapshot) {
        self.spinner.finish_and_clear();
    }
}
