// epiwatch/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "epiwatch")]
#[command(about = "COVID-19 ETL: schema checks, 7-day incidence & growth, DuckDB report", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Runs the pipeline (Fetch -> Validate -> Normalize -> Metrics -> Report)
    Run {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🛡️ Fetches the source and prints the schema rule table
    Validate {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Exit with error if a blocking rule fails
        #[arg(long)]
        strict: bool,
    },

    /// 📊 Profiles the raw rows of the compared countries into profile.csv
    Profile {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🔍 Inspects a report table (schema + sample rows)
    Inspect {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// DuckDB file (defaults to <target>/<report-file> of the project)
        #[arg(long)]
        db_path: Option<PathBuf>,

        /// Table name to inspect
        #[arg(long, short)]
        table: String,

        /// Number of sample rows to display
        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// 🧹 Cleans build artifacts (target/ folder)
    Clean {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
}
