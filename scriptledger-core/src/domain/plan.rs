//! Migration plans

use serde::Serialize;

use super::MigrationRecord;

/// The single action chosen for one `migrate()` run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MigrationPlan {
    /// Pending forward migrations, oldest first
    Apply { records: Vec<MigrationRecord> },
    /// Undo exactly one previously applied migration
    Rollback { record: MigrationRecord },
    NoOp,
}

impl MigrationPlan {
    pub fn is_noop(&self) -> bool {
        matches!(self, MigrationPlan::NoOp)
    }

    /// Records in the order they will be executed
    pub fn records(&self) -> &[MigrationRecord] {
        match self {
            MigrationPlan::Apply { records } => records,
            MigrationPlan::Rollback { record } => std::slice::from_ref(record),
            MigrationPlan::NoOp => &[],
        }
    }
}
