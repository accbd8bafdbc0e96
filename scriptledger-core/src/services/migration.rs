//! Migration service - reconciles change-scripts against the ledger
//!
//! One `migrate()` call:
//! 1. Loads the script set from the script source
//! 2. Acquires a connection from the connection provider
//! 3. Replays the ledger into the set of active migrations
//! 4. Plans a single action (apply pending, roll back one, or nothing)
//! 5. Executes each planned record in its own transaction
//!
//! The connection is dropped on every exit path.

use duckdb::Connection;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::result::Result;
use crate::domain::{AppliedState, LedgerRow, MigrationPlan, ScriptName, ScriptSet};
use crate::ports::{ConnectionProvider, ScriptSource};
use crate::services::doctor::{DoctorResult, DoctorService};
use crate::services::executor::Executor;
use crate::services::ledger::{read_applied_state, Ledger};
use crate::services::reconciler;

/// Result of running migrations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MigrationResult {
    /// Forward migrations newly applied, in order
    Applied { versions: Vec<ScriptName> },
    /// Ledger version of the rollback that was run
    RolledBack { version: ScriptName },
    UpToDate,
}

/// An active migration as reported by `status()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedMigration {
    pub version: ScriptName,
    /// Whether an undo script was recorded when it was applied
    pub reversible: bool,
}

/// Snapshot of where the database stands against the script set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub applied: Vec<AppliedMigration>,
    pub pending: Vec<ScriptName>,
    /// Active migrations whose forward script was removed
    pub removed: Vec<ScriptName>,
    pub ledger_rows: usize,
}

/// Reconciles a script source against the ledger of one database
pub struct Migrator<S, P> {
    source: S,
    provider: P,
    ledger: Ledger,
    create_ledger_table: bool,
}

impl<S: ScriptSource, P: ConnectionProvider> Migrator<S, P> {
    /// Create a migrator using the default ledger table
    pub fn new(source: S, provider: P) -> Self {
        Self {
            source,
            provider,
            ledger: Ledger::default(),
            create_ledger_table: false,
        }
    }

    /// Create a migrator with the ledger settings from `config`
    pub fn with_config(source: S, provider: P, config: &Config) -> Result<Self> {
        Ok(Self::new(source, provider)
            .with_ledger(config.ledger()?)
            .create_ledger_table(config.create_ledger_table))
    }

    pub fn with_ledger(mut self, ledger: Ledger) -> Self {
        self.ledger = ledger;
        self
    }

    /// Create the ledger table before reading it when it does not exist yet
    pub fn create_ledger_table(mut self, create: bool) -> Self {
        self.create_ledger_table = create;
        self
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Bring the database in line with the script set
    pub fn migrate(&self) -> Result<MigrationResult> {
        info!("Run database migration/rollback if any");
        let (scripts, mut conn, applied) = self.load_state()?;
        self.warn_findings(&scripts);
        let plan = reconciler::plan(&applied, &scripts)?;
        let executor = Executor::new(&self.ledger);

        match plan {
            MigrationPlan::Apply { records } => {
                let mut versions = Vec::with_capacity(records.len());
                for record in &records {
                    info!(version = %record.version, "Migrate database change");
                    if let Err(e) = executor.apply(&mut conn, record) {
                        warn!(
                            committed = versions.len(),
                            remaining = records.len() - versions.len(),
                            "Stopping migration run after failure"
                        );
                        return Err(e);
                    }
                    versions.push(record.version.clone());
                }
                info!(count = versions.len(), "Database migration is completed");
                Ok(MigrationResult::Applied { versions })
            }
            MigrationPlan::Rollback { record } => {
                info!(version = %record.version, "Rollback database change");
                executor.apply(&mut conn, &record)?;
                info!("Database rollback is completed");
                Ok(MigrationResult::RolledBack {
                    version: record.version,
                })
            }
            MigrationPlan::NoOp => {
                info!("Database is up to date");
                Ok(MigrationResult::UpToDate)
            }
        }
    }

    /// Compute what `migrate()` would do without executing anything
    pub fn plan(&self) -> Result<MigrationPlan> {
        let (_conn, plan) = self.load_plan()?;
        Ok(plan)
    }

    /// Report applied, pending and removed migrations
    pub fn status(&self) -> Result<MigrationStatus> {
        let scripts = self.source.list_scripts()?;
        let conn = self.connect()?;
        let rows = self.ledger.read_rows(&conn)?;
        let applied = read_applied_state(&rows);

        Ok(MigrationStatus {
            applied: applied
                .iter()
                .map(|(version, record)| AppliedMigration {
                    version: version.clone(),
                    reversible: record.has_reverse_sql(),
                })
                .collect(),
            pending: reconciler::pending_migrations(&applied, &scripts)
                .into_iter()
                .map(|record| record.version)
                .collect(),
            removed: reconciler::rollback_candidates(&applied, &scripts)
                .map(|record| record.version.clone())
                .collect(),
            ledger_rows: rows.len(),
        })
    }

    /// Every ledger row in append order
    pub fn history(&self) -> Result<Vec<LedgerRow>> {
        let conn = self.connect()?;
        self.ledger.read_rows(&conn)
    }

    /// Check the script set and active migrations for problems
    pub fn doctor(&self) -> Result<DoctorResult> {
        let (scripts, _conn, applied) = self.load_state()?;
        Ok(DoctorService::new().run_checks(&scripts, Some(&applied)))
    }

    /// Create the ledger table if it does not exist
    pub fn init(&self) -> Result<()> {
        let conn = self.provider.get_connection()?;
        self.ledger.ensure_table(&conn)?;
        info!(table = %self.ledger.table(), "Ledger table ready");
        Ok(())
    }

    fn warn_findings(&self, scripts: &ScriptSet) {
        let result = DoctorService::new().run_checks(scripts, None);
        for (check, outcome) in result.checks.iter().filter(|(_, c)| c.status != "pass") {
            warn!(check = %check, "{}", outcome.message);
        }
    }

    fn connect(&self) -> Result<Connection> {
        let conn = self.provider.get_connection()?;
        if self.create_ledger_table {
            self.ledger.ensure_table(&conn)?;
        }
        Ok(conn)
    }

    fn load_state(&self) -> Result<(ScriptSet, Connection, AppliedState)> {
        let scripts = self.source.list_scripts()?;
        let conn = self.connect()?;
        let applied = self.ledger.applied_state(&conn)?;
        Ok((scripts, conn, applied))
    }

    fn load_plan(&self) -> Result<(Connection, MigrationPlan)> {
        let (scripts, conn, applied) = self.load_state()?;
        let plan = reconciler::plan(&applied, &scripts)?;
        Ok((conn, plan))
    }
}
