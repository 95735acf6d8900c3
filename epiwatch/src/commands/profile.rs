// epiwatch/src/commands/profile.rs
//
// USE CASE: Exploratory profile of the raw source.

use std::path::PathBuf;

use anyhow::Context;
use epiwatch_core::application::run_profile;

use super::{build_source, load_config};

pub async fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    println!("📊 Profiling source...");
    let config = load_config(&project_dir)?;
    let source = build_source(&project_dir, &config)?;

    let (profile, path) = run_profile(&source, &project_dir, &config)
        .await
        .context("Profiling failed")?;

    println!("   Rows (Ecuador + {}): {}", config.comparison_country, profile.rows);
    for (metric, value) in profile.entries() {
        println!("   ➜ {}: {}", metric, value);
    }
    println!("\n✨ Profile written to {}", path.display());
    Ok(())
}
