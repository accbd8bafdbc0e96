//! CLI command implementations

pub mod doctor;
pub mod history;
pub mod init;
pub mod migrate;
pub mod plan;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use scriptledger_core::config::CONFIG_FILE;
use scriptledger_core::{Config, ScriptLedgerContext};
use tracing::debug;

/// Options shared by every command
///
/// Flags and `SCRIPTLEDGER_*` environment variables override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file
    #[arg(long, global = true, env = "SCRIPTLEDGER_CONFIG", default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// DuckDB database file
    #[arg(long, global = true, env = "SCRIPTLEDGER_DB")]
    pub db: Option<PathBuf>,

    /// Directory or .zip bundle holding the change-scripts
    #[arg(long, global = true, env = "SCRIPTLEDGER_SCRIPTS")]
    pub scripts: Option<PathBuf>,

    /// Ledger table name
    #[arg(long, global = true, env = "SCRIPTLEDGER_LEDGER_TABLE")]
    pub ledger_table: Option<String>,

    /// Create the ledger table if it is missing
    #[arg(long, global = true)]
    pub create_ledger_table: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Only log warnings and errors
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// Load the config file and apply command line overrides
pub fn resolve_config(args: &GlobalArgs) -> Result<Config> {
    let mut config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config: {}", args.config.display()))?;

    if let Some(db) = &args.db {
        config.database = Some(db.clone());
    }
    if let Some(scripts) = &args.scripts {
        config.scripts = Some(scripts.clone());
    }
    if let Some(table) = &args.ledger_table {
        config.ledger_table = table.clone();
    }
    if args.create_ledger_table {
        config.create_ledger_table = true;
    }
    Ok(config)
}

/// Build the scriptledger context from config file and flags
pub fn get_context(args: &GlobalArgs) -> Result<ScriptLedgerContext> {
    let config = resolve_config(args)?;
    debug!(
        database = ?config.database,
        scripts = ?config.scripts,
        ledger_table = %config.ledger_table,
        "Resolved configuration"
    );
    ScriptLedgerContext::new(config).context("Failed to initialize scriptledger context")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &config_path,
            r#"{ "database": "file.duckdb", "scripts": "changes", "ledgerTable": "from_file" }"#,
        )
        .unwrap();

        let args = GlobalArgs {
            config: config_path,
            db: Some(PathBuf::from("/tmp/flag.duckdb")),
            ledger_table: Some("from_flag".to_string()),
            create_ledger_table: true,
            ..GlobalArgs::default()
        };
        let config = resolve_config(&args).unwrap();

        assert_eq!(config.database, Some(PathBuf::from("/tmp/flag.duckdb")));
        assert_eq!(config.scripts, Some(dir.path().join("changes")));
        assert_eq!(config.ledger_table, "from_flag");
        assert!(config.create_ledger_table);
    }

    #[test]
    fn test_invalid_ledger_table_flag_fails_context() {
        let dir = TempDir::new().unwrap();
        let args = GlobalArgs {
            config: dir.path().join(CONFIG_FILE),
            db: Some(dir.path().join("app.duckdb")),
            scripts: Some(dir.path().to_path_buf()),
            ledger_table: Some("bad name".to_string()),
            ..GlobalArgs::default()
        };

        assert!(get_context(&args).is_err());
    }
}
