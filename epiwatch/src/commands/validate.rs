// epiwatch/src/commands/validate.rs
//
// USE CASE: Schema check only, printed as a rule table.

use std::path::PathBuf;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use epiwatch_core::application::run_validation;
use epiwatch_core::domain::quality::{Severity, ValidationReport, ValidationRule};
use epiwatch_core::domain::transform::REQUIRED_COLUMNS;
use epiwatch_core::infrastructure::render::MarkdownRenderer;

use super::{build_source, load_config};

pub async fn execute(project_dir: PathBuf, strict: bool) -> anyhow::Result<()> {
    println!("🛡️  Validating source schema...");
    let config = load_config(&project_dir)?;
    let source = build_source(&project_dir, &config)?.with_projection(&REQUIRED_COLUMNS);
    let renderer = MarkdownRenderer::new();

    let (snapshot, report) = match run_validation(&source, &renderer, &project_dir, &config).await {
        Ok(out) => out,
        Err(e) => {
            eprintln!("❌ Validation failed: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "   Source: {} [{}] ({} rows)",
        snapshot.location,
        snapshot.origin,
        snapshot.table.len()
    );
    print_rules(&report);

    if report.passed {
        println!("\n✅ All blocking rules passed.");
    } else {
        let failed = report.blocking_failures().count();
        eprintln!("\n❌ {} blocking rule(s) failed.", failed);
        if strict {
            std::process::exit(1);
        }
    }
    Ok(())
}

fn print_rules(report: &ValidationReport) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            header_cell("Rule"),
            header_cell("Severity"),
            header_cell("Passed"),
            header_cell("Affected"),
            header_cell("Notes"),
        ]);

    for rule in &report.rules {
        table.add_row(vec![
            Cell::new(&rule.name),
            Cell::new(rule.severity.label()),
            verdict_cell(rule),
            Cell::new(rule.affected_row_count).set_alignment(CellAlignment::Right),
            Cell::new(&rule.notes).add_attribute(Attribute::Dim),
        ]);
    }
    println!("{table}");
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn verdict_cell(rule: &ValidationRule) -> Cell {
    match (rule.passed, rule.severity) {
        (true, _) => Cell::new("PASS").fg(Color::Green),
        (false, Severity::Blocking) => Cell::new("FAIL").fg(Color::Red).add_attribute(Attribute::Bold),
        (false, Severity::Advisory) => Cell::new("WARN").fg(Color::Yellow),
    }
}
