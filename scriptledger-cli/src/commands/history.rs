//! History command - show the ledger

use anyhow::Result;
use comfy_table::{Cell, Color};
use scriptledger_core::domain::Direction;

use super::{get_context, GlobalArgs};
use crate::output::{self, sql_preview};

pub fn run(args: &GlobalArgs) -> Result<()> {
    let ctx = get_context(args)?;
    let rows = ctx.migrator.history()?;

    if args.json {
        return output::print_json(&rows);
    }

    if rows.is_empty() {
        output::info("Ledger is empty");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Id", "Version", "Direction", "SQL"]);
    for row in &rows {
        let direction = match row.version.direction() {
            Some(Direction::Forward) => Cell::new("migrate").fg(Color::Green),
            Some(Direction::Reverse) => Cell::new("rollback").fg(Color::Yellow),
            None => Cell::new("-"),
        };
        table.add_row(vec![
            Cell::new(row.sequence_id),
            Cell::new(row.version.as_str()),
            direction,
            Cell::new(sql_preview(&row.migrate_sql)),
        ]);
    }
    println!("{}", table);

    Ok(())
}
