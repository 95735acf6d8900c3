// epiwatch/src/commands/run.rs
//
// USE CASE: Run the full pipeline.

use std::path::PathBuf;

use epiwatch_core::application::run_pipeline;
use epiwatch_core::infrastructure::adapters::DuckDBReportSink;
use epiwatch_core::domain::transform::REQUIRED_COLUMNS;
use epiwatch_core::infrastructure::render::MarkdownRenderer;

use super::{build_source, load_config, report_path};

pub async fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    // A. Load the Config (Infra)
    println!("⚙️  Loading configuration...");
    let config = load_config(&project_dir)?;

    // B. Instantiate the Adapters
    let source = build_source(&project_dir, &config)?.with_projection(&REQUIRED_COLUMNS);
    let sink = DuckDBReportSink::new(report_path(&project_dir, &config));
    let renderer = MarkdownRenderer::new();

    // C. Run the Pipeline (Application Layer)
    let result = run_pipeline(&source, &sink, &renderer, &project_dir, &config).await;

    match result {
        Ok(run_res) => {
            println!(
                "   Source: {} ({} rows)",
                run_res.source_location.as_deref().unwrap_or("-"),
                run_res.raw_rows
            );
            println!(
                "   Canonical: {} rows | incidence_7d: {} | growth_factor_7d: {}",
                run_res.canonical_rows, run_res.incidence_rows, run_res.growth_rows
            );
            for warning in &run_res.warnings {
                println!("   ⚠️  {}", warning);
            }
            if let Some(path) = &run_res.report_path {
                println!("   🦆 Report: {}", path);
            }
            println!("\n✨ SUCCESS! Pipeline finished in {:.2?}", start.elapsed());
        }
        Err(e) => {
            eprintln!("\n💥 CRITICAL PIPELINE ERROR: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
