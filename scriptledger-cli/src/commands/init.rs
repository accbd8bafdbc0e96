//! Init command - create the ledger table

use anyhow::Result;
use serde::Serialize;

use super::{get_context, GlobalArgs};
use crate::output;

#[derive(Serialize)]
struct InitOutput<'a> {
    ledger_table: &'a str,
}

pub fn run(args: &GlobalArgs) -> Result<()> {
    let ctx = get_context(args)?;
    ctx.migrator.init()?;
    let table = ctx.migrator.ledger().table();

    if args.json {
        return output::print_json(InitOutput {
            ledger_table: table,
        });
    }

    output::success(&format!("Ledger table {} is ready", table));
    Ok(())
}
