//! Migrate command - apply pending migrations or roll back a removed one

use anyhow::Result;
use scriptledger_core::MigrationResult;

use super::{get_context, GlobalArgs};
use crate::output;

pub fn run(args: &GlobalArgs) -> Result<()> {
    let ctx = get_context(args)?;
    let result = ctx.migrator.migrate()?;

    if args.json {
        return output::print_json(&result);
    }

    match result {
        MigrationResult::Applied { versions } => {
            output::success(&format!("Applied {} migration(s)", versions.len()));
            for version in versions {
                println!("  + {}", version);
            }
        }
        MigrationResult::RolledBack { version } => {
            output::warning(&format!("Rolled back: {}", version));
        }
        MigrationResult::UpToDate => output::info("Database is up to date"),
    }

    Ok(())
}
