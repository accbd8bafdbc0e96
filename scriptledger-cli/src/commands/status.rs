//! Status command - where the database stands against the scripts

use anyhow::Result;
use colored::Colorize;

use super::{get_context, GlobalArgs};
use crate::output;

pub fn run(args: &GlobalArgs) -> Result<()> {
    let ctx = get_context(args)?;
    let status = ctx.migrator.status()?;

    if args.json {
        return output::print_json(&status);
    }

    println!("{}", "Migration Status".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Ledger table", ctx.migrator.ledger().table()]);
    table.add_row(vec!["Ledger rows", &status.ledger_rows.to_string()]);
    table.add_row(vec!["Applied", &status.applied.len().to_string()]);
    table.add_row(vec!["Pending", &status.pending.len().to_string()]);
    table.add_row(vec!["Removed", &status.removed.len().to_string()]);
    println!("{}", table);

    if !status.applied.is_empty() {
        println!();
        println!("{}", "Applied".bold());
        for applied in &status.applied {
            let marker = if applied.reversible { "" } else { " (no rollback)" };
            println!("  • {}{}", applied.version, marker.dimmed());
        }
    }

    if !status.pending.is_empty() {
        println!();
        println!("{}", "Pending".bold());
        for version in &status.pending {
            println!("  • {}", version.to_string().green());
        }
    }

    if !status.removed.is_empty() {
        println!();
        println!("{}", "Removed (will be rolled back one per run)".bold());
        for version in &status.removed {
            println!("  • {}", version.to_string().yellow());
        }
    }

    Ok(())
}
