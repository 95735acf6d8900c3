// epiwatch/src/main.rs

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging (Tracing) sur stderr, stdout reste aux commandes
    // RUST_LOG=debug epiwatch run ... pour voir les détails
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { project_dir } => commands::run::execute(project_dir).await,
        Commands::Validate {
            project_dir,
            strict,
        } => commands::validate::execute(project_dir, strict).await,
        Commands::Profile { project_dir } => commands::profile::execute(project_dir).await,
        Commands::Inspect {
            project_dir,
            db_path,
            table,
            limit,
        } => commands::inspect::execute(project_dir, db_path, table, limit),
        Commands::Clean { project_dir } => commands::clean::execute(project_dir),
    }
}
