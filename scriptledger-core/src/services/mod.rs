//! Service layer - reconciliation logic
//!
//! `ledger` reads and appends the audit ledger, `reconciler` picks the
//! action for a run, `executor` applies one record transactionally and
//! `migration` sequences them behind [`Migrator`].

pub mod doctor;
pub mod executor;
pub mod ledger;
pub mod migration;
pub mod reconciler;

pub use doctor::{CheckResult, DoctorResult, DoctorService, DoctorSummary};
pub use executor::Executor;
pub use ledger::{read_applied_state, Ledger, DEFAULT_LEDGER_TABLE};
pub use migration::{AppliedMigration, MigrationResult, MigrationStatus, Migrator};
