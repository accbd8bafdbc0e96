//! Executor - runs one migration record in its own transaction

use duckdb::Connection;
use tracing::{debug, warn};

use crate::domain::result::{Error, Result};
use crate::domain::MigrationRecord;
use crate::services::ledger::Ledger;

/// Applies records and logs them to the ledger atomically
pub struct Executor<'a> {
    ledger: &'a Ledger,
}

impl<'a> Executor<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Run `record.forward_sql` and append its ledger row in one transaction
    ///
    /// If either step fails the transaction is rolled back, so the database
    /// never holds a change without its ledger row or the reverse.
    pub fn apply(&self, conn: &mut Connection, record: &MigrationRecord) -> Result<()> {
        let fail = |e: duckdb::Error| Error::execution(&record.version, e.to_string());

        debug!(version = %record.version, sql = %record.forward_sql, "Executing");
        let tx = conn.transaction().map_err(fail)?;

        let outcome = tx
            .execute_batch(&record.forward_sql)
            .and_then(|_| self.ledger.append(&tx, record));

        match outcome {
            Ok(()) => tx.commit().map_err(fail),
            Err(e) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!(
                        version = %record.version,
                        error = %rollback_err,
                        "Rollback after failed migration also failed"
                    );
                }
                Err(fail(e))
            }
        }
    }
}
