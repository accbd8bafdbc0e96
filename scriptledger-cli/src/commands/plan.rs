//! Plan command - preview the next migrate run

use anyhow::Result;
use comfy_table::{Cell, Color};
use scriptledger_core::MigrationPlan;

use super::{get_context, GlobalArgs};
use crate::output::{self, sql_preview};

pub fn run(args: &GlobalArgs) -> Result<()> {
    let ctx = get_context(args)?;
    let plan = ctx.migrator.plan()?;

    if args.json {
        return output::print_json(&plan);
    }

    let (action, color) = match &plan {
        MigrationPlan::Apply { .. } => ("apply", Color::Green),
        MigrationPlan::Rollback { .. } => ("rollback", Color::Yellow),
        MigrationPlan::NoOp => {
            output::info("Nothing to do");
            return Ok(());
        }
    };

    let mut table = output::create_table();
    table.set_header(vec!["Action", "Version", "SQL", "Undo"]);
    for record in plan.records() {
        let undo = match (&plan, record.reverse_sql.as_deref()) {
            (MigrationPlan::Rollback { .. }, _) => "-".to_string(),
            (_, Some(sql)) => sql_preview(sql),
            (_, None) => "none".to_string(),
        };
        table.add_row(vec![
            Cell::new(action).fg(color),
            Cell::new(record.version.as_str()),
            Cell::new(sql_preview(&record.forward_sql)),
            Cell::new(undo),
        ]);
    }
    println!("{}", table);

    Ok(())
}
