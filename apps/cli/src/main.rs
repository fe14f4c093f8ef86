//! Folio CLI: index an exported article archive and serve it to a tool host.
//!
//! `folio serve` speaks newline-delimited JSON-RPC on stdin/stdout; every
//! other subcommand is a one-shot convenience over the same index.

mod commands;
mod server;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
