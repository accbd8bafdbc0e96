//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use serde::Serialize;

use scriptledger_core::OperationResult;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Print data wrapped in a success envelope
pub fn print_json<T: Serialize>(data: T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&OperationResult::ok(data))?);
    Ok(())
}

/// Print an error wrapped in a failure envelope
pub fn print_failure(err: &anyhow::Error) {
    let envelope: OperationResult<()> = OperationResult::fail(format!("{:#}", err));
    match serde_json::to_string_pretty(&envelope) {
        Ok(text) => println!("{}", text),
        Err(_) => error(&err.to_string()),
    }
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// First line of a SQL body, shortened for table cells
pub fn sql_preview(sql: &str) -> String {
    const MAX: usize = 60;
    let first = sql.lines().next().unwrap_or_default().trim();
    let more_lines = sql.lines().nth(1).is_some();
    if first.chars().count() > MAX {
        let cut: String = first.chars().take(MAX - 3).collect();
        format!("{}...", cut)
    } else if more_lines {
        format!("{} ...", first)
    } else {
        first.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_preview() {
        assert_eq!(sql_preview("DROP TABLE t;"), "DROP TABLE t;");
        assert_eq!(
            sql_preview("CREATE TABLE t (\n  id INT\n);"),
            "CREATE TABLE t ( ..."
        );
        let long = format!("SELECT {}", "x, ".repeat(40));
        assert!(sql_preview(&long).ends_with("..."));
        assert_eq!(sql_preview(&long).chars().count(), 60);
        assert_eq!(sql_preview(""), "");
    }
}
