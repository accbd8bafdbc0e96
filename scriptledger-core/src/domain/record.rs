//! Migration records and ledger rows

use serde::{Deserialize, Serialize};

use super::ScriptName;

/// One unit of change: what to run and, if known, how to undo it
///
/// For a rollback the `forward_sql` field holds the undo SQL, since that is
/// the statement the executor runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub version: ScriptName,
    pub forward_sql: String,
    pub reverse_sql: Option<String>,
}

impl MigrationRecord {
    pub fn new(
        version: impl Into<ScriptName>,
        forward_sql: impl Into<String>,
        reverse_sql: Option<String>,
    ) -> Self {
        Self {
            version: version.into(),
            forward_sql: forward_sql.into(),
            reverse_sql,
        }
    }

    /// Whether a usable undo script was recorded
    pub fn has_reverse_sql(&self) -> bool {
        self.reverse_sql
            .as_deref()
            .is_some_and(|sql| !sql.trim().is_empty())
    }
}

/// A row of the persisted ledger, in the order it was appended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub sequence_id: i64,
    pub version: ScriptName,
    pub migrate_sql: String,
    pub rollback_sql: Option<String>,
}

impl LedgerRow {
    pub fn to_record(&self) -> MigrationRecord {
        MigrationRecord {
            version: self.version.clone(),
            forward_sql: self.migrate_sql.clone(),
            reverse_sql: self.rollback_sql.clone(),
        }
    }
}
