//! Ledger access - the append-only log of applied changes
//!
//! The ledger table is owned by this crate:
//!
//! ```sql
//! id           BIGINT   -- monotonically increasing, defines replay order
//! version      VARCHAR  -- script name
//! migrate_sql  VARCHAR  -- SQL that was executed
//! rollback_sql VARCHAR  -- SQL that undoes it, nullable
//! ```
//!
//! Rows are only ever inserted.

use duckdb::{params, Connection};
use tracing::debug;

use crate::domain::result::{Error, Result};
use crate::domain::{AppliedState, LedgerRow, MigrationRecord};

/// Ledger table used when none is configured
pub const DEFAULT_LEDGER_TABLE: &str = "database_migration_log";

/// Fold ledger rows, already in append order, into the set of active migrations
pub fn read_applied_state(rows: &[LedgerRow]) -> AppliedState {
    rows.iter().fold(AppliedState::new(), AppliedState::replay)
}

/// Check that a table name is a plain identifier, optionally schema-qualified
///
/// The name is spliced into SQL text, so anything else is refused.
pub fn validate_table_name(name: &str) -> Result<()> {
    let valid_ident = |part: &str| {
        let mut chars = part.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    };

    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() > 2 || !parts.iter().all(|p| valid_ident(p)) {
        return Err(Error::config(format!("invalid ledger table name: {:?}", name)));
    }
    Ok(())
}

/// Reads and appends rows of one ledger table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    table: String,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            table: DEFAULT_LEDGER_TABLE.to_string(),
        }
    }
}

impl Ledger {
    pub fn new(table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        validate_table_name(&table)?;
        Ok(Self { table })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the ledger table and its id sequence if missing
    pub fn ensure_table(&self, conn: &Connection) -> Result<()> {
        let sql = format!(
            "CREATE SEQUENCE IF NOT EXISTS {table}_id_seq START 1;
             CREATE TABLE IF NOT EXISTS {table} (
                 id BIGINT PRIMARY KEY DEFAULT nextval('{table}_id_seq'),
                 version VARCHAR NOT NULL,
                 migrate_sql VARCHAR NOT NULL,
                 rollback_sql VARCHAR
             );",
            table = self.table
        );
        conn.execute_batch(&sql).map_err(|e| {
            Error::Database(format!("cannot create ledger table {}: {}", self.table, e))
        })?;
        Ok(())
    }

    /// All ledger rows in append order
    ///
    /// A missing table, a failed query or a row with a NULL id, version or
    /// migrate_sql is an error, never an empty ledger.
    pub fn read_rows(&self, conn: &Connection) -> Result<Vec<LedgerRow>> {
        let sql = format!(
            "SELECT id, version, migrate_sql, rollback_sql FROM {} ORDER BY id",
            self.table
        );
        let read_err = |e: duckdb::Error| Error::ledger_read(format!("{}: {}", self.table, e));

        let mut stmt = conn.prepare(&sql).map_err(read_err)?;
        let raw_rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, Option<i64>>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })
            .map_err(read_err)?;

        let mut rows = Vec::new();
        for (position, raw) in raw_rows.enumerate() {
            let (id, version, migrate_sql, rollback_sql) = raw.map_err(read_err)?;
            let malformed = |column: &str| {
                Error::ledger_read(format!(
                    "{}: row {} has NULL {}",
                    self.table,
                    position + 1,
                    column
                ))
            };
            rows.push(LedgerRow {
                sequence_id: id.ok_or_else(|| malformed("id"))?,
                version: version.ok_or_else(|| malformed("version"))?.into(),
                migrate_sql: migrate_sql.ok_or_else(|| malformed("migrate_sql"))?,
                rollback_sql,
            });
        }

        debug!(table = %self.table, rows = rows.len(), "Read ledger");
        Ok(rows)
    }

    /// Read the ledger and replay it
    pub fn applied_state(&self, conn: &Connection) -> Result<AppliedState> {
        Ok(read_applied_state(&self.read_rows(conn)?))
    }

    /// Append one row; callers run this inside the migration's transaction
    pub fn append(&self, conn: &Connection, record: &MigrationRecord) -> duckdb::Result<()> {
        let sql = format!(
            "INSERT INTO {} (version, migrate_sql, rollback_sql) VALUES (?, ?, ?)",
            self.table
        );
        conn.execute(
            &sql,
            params![
                record.version.as_str(),
                record.forward_sql,
                record.reverse_sql
            ],
        )?;
        Ok(())
    }
}
