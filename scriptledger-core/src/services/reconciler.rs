//! Reconciler - decides what a single run should do
//!
//! Given the active migrations and the available scripts, exactly one action
//! is chosen:
//! 1. apply every pending forward script, oldest first, or
//! 2. if nothing is pending, undo the oldest active migration whose forward
//!    script has been removed, or
//! 3. nothing.
//!
//! Forward progress always wins: a run with pending scripts never rolls back.

use tracing::info;

use crate::domain::result::{Error, Result};
use crate::domain::{AppliedState, MigrationPlan, MigrationRecord, ScriptSet};

/// Forward scripts not yet active, in version order
///
/// Each record carries the paired reverse script's body when one exists.
pub fn pending_migrations(applied: &AppliedState, scripts: &ScriptSet) -> Vec<MigrationRecord> {
    scripts
        .forward()
        .filter(|(name, _)| !applied.contains(name))
        .map(|(name, body)| {
            let reverse_sql = scripts.get(&name.reverse_name()).map(str::to_string);
            MigrationRecord::new(name.clone(), body, reverse_sql)
        })
        .collect()
}

/// Active migrations whose forward script is gone, in version order
pub fn rollback_candidates<'a>(
    applied: &'a AppliedState,
    scripts: &'a ScriptSet,
) -> impl Iterator<Item = &'a MigrationRecord> + 'a {
    applied
        .iter()
        .filter(move |(version, _)| !scripts.contains(version))
        .map(|(_, record)| record)
}

/// Build the record that undoes an applied migration
///
/// The stored reverse SQL becomes the statement to run and the record is
/// logged under the reverse-marked name. An applied migration with no
/// recorded undo script cannot be rolled back.
pub fn rollback_record(applied: &MigrationRecord) -> Result<MigrationRecord> {
    if !applied.has_reverse_sql() {
        return Err(Error::MissingRollbackScript(applied.version.clone()));
    }
    let undo_sql = applied.reverse_sql.clone().unwrap_or_default();
    Ok(MigrationRecord::new(
        applied.version.reverse_name(),
        undo_sql,
        Some(String::new()),
    ))
}

/// Choose the single action for this run
pub fn plan(applied: &AppliedState, scripts: &ScriptSet) -> Result<MigrationPlan> {
    let pending = pending_migrations(applied, scripts);
    if !pending.is_empty() {
        info!(count = pending.len(), "Pending migrations found");
        return Ok(MigrationPlan::Apply { records: pending });
    }

    if let Some(candidate) = rollback_candidates(applied, scripts).next() {
        info!(version = %candidate.version, "Applied migration no longer present, rolling back");
        return Ok(MigrationPlan::Rollback {
            record: rollback_record(candidate)?,
        });
    }

    Ok(MigrationPlan::NoOp)
}
