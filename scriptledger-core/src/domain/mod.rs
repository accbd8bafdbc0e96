//! Core domain types
//!
//! Pure data structures and the ledger replay rules - no I/O.

mod plan;
mod record;
pub mod result;
mod script_name;
mod state;

pub use plan::MigrationPlan;
pub use record::{LedgerRow, MigrationRecord};
pub use script_name::{Direction, ScriptName, MIGRATE_MARKER, ROLLBACK_MARKER};
pub use state::{AppliedState, ScriptSet};
