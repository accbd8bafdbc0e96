//! scriptledger core - reconcile SQL change-scripts against an applied-changes ledger
//!
//! The crate follows a hexagonal layout:
//!
//! - **domain**: script names, ledger rows, applied state, plans, errors
//! - **ports**: traits for the script source and connection provider
//! - **services**: ledger replay, reconciliation, transactional execution
//! - **adapters**: DuckDB connections and directory/zip/embedded script sources

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use crate::adapters::DuckDbConnectionProvider;

// Re-export commonly used types at crate root
pub use config::Config;
pub use domain::result::{Error, OperationResult, Result};
pub use domain::{AppliedState, LedgerRow, MigrationPlan, MigrationRecord, ScriptName, ScriptSet};
pub use ports::{ConnectionProvider, ScriptSource};
pub use services::{MigrationResult, MigrationStatus, Migrator};

/// Migrator built from a [`Config`]: any script source against a DuckDB file
pub type ConfiguredMigrator = Migrator<Box<dyn ScriptSource>, DuckDbConnectionProvider>;

/// Main context for scriptledger operations
pub struct ScriptLedgerContext {
    pub config: Config,
    pub migrator: ConfiguredMigrator,
}

impl ScriptLedgerContext {
    /// Build a context; the config must name both a database and a script location
    pub fn new(config: Config) -> Result<Self> {
        let database = config
            .database
            .clone()
            .ok_or_else(|| Error::config("no database configured"))?;
        let scripts = config
            .scripts
            .as_deref()
            .ok_or_else(|| Error::config("no script location configured"))?;

        let migrator = Migrator::with_config(
            adapters::open_script_source(scripts),
            DuckDbConnectionProvider::new(database),
            &config,
        )?;

        Ok(Self { config, migrator })
    }
}
