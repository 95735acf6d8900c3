// epiwatch/src/commands/inspect.rs
//
// USE CASE: Inspect a report table (schema + sample rows).

use duckdb::{Connection, Row};
use std::path::PathBuf;

use super::{load_config, report_path};

pub fn execute(
    project_dir: PathBuf,
    db_path: Option<PathBuf>,
    table: String,
    limit: usize,
) -> anyhow::Result<()> {
    let db_path = match db_path {
        Some(path) => path,
        None => report_path(&project_dir, &load_config(&project_dir)?),
    };

    if !db_path.exists() {
        anyhow::bail!(
            "❌ Database not found at: {}\n👉 Have you run 'epiwatch run'?",
            db_path.display()
        );
    }

    let conn = Connection::open(&db_path)?;
    let ident = quote_ident(&table);
    let literal = format!("'{}'", table.replace('\'', "''"));

    println!("\n🔍 Inspecting Table: '{}'", table);

    // Fetch column names
    let mut stmt_cols = conn.prepare(&format!("PRAGMA table_info({})", literal))?;

    let column_names: Vec<String> = stmt_cols
        .query_map([], |row: &Row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;

    if column_names.is_empty() {
        anyhow::bail!("❌ Table '{}' not found in {}", table, db_path.display());
    }

    println!("   Columns: [{}]", column_names.join(", "));
    println!("   --- Rows (Limit {}) ---", limit);

    // Fetch sample rows
    let mut stmt = conn.prepare(&format!("SELECT * FROM {} LIMIT {}", ident, limit))?;
    let mut rows = stmt.query([])?;

    while let Some(row) = rows.next()? {
        let values: Vec<String> = (0..column_names.len())
            .map(|i| match row.get_ref(i) {
                Ok(val) => format!("{:?}", val),
                Err(_) => "ERROR".to_string(),
            })
            .collect();

        println!("   ➜ {}", values.join(" | "));
    }

    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("incidence_7d"), "\"incidence_7d\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}
