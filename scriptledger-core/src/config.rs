//! Configuration management
//!
//! Settings live in a JSON file, by default `scriptledger.json`:
//! ```json
//! {
//!   "database": "app.duckdb",
//!   "scripts": "db/changes",
//!   "ledgerTable": "database_migration_log",
//!   "createLedgerTable": false
//! }
//! ```
//! Relative paths are resolved against the directory holding the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};
use crate::services::ledger::{Ledger, DEFAULT_LEDGER_TABLE};

/// Default config file name
pub const CONFIG_FILE: &str = "scriptledger.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// DuckDB database file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
    /// Directory or `.zip` bundle holding the change-scripts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scripts: Option<PathBuf>,
    pub ledger_table: String,
    /// Create the ledger table on first use instead of requiring it to exist
    pub create_ledger_table: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            scripts: None,
            ledger_table: DEFAULT_LEDGER_TABLE.to_string(),
            create_ledger_table: false,
        }
    }
}

impl Config {
    /// Load config from a JSON file
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?;

        if let Some(base) = path.parent() {
            config.database = config.database.map(|p| resolve(base, p));
            config.scripts = config.scripts.map(|p| resolve(base, p));
        }
        config.ledger()?;

        Ok(config)
    }

    /// Save config as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The configured ledger table, validated
    pub fn ledger(&self) -> Result<Ledger> {
        Ledger::new(self.ledger_table.clone())
    }
}

fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        base.join(path)
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.ledger_table, "database_migration_log");
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            r#"{ "database": "app.duckdb", "scripts": "db", "ledgerTable": "schema_log", "createLedgerTable": true }"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.database, Some(dir.path().join("app.duckdb")));
        assert_eq!(config.scripts, Some(dir.path().join("db")));
        assert_eq!(config.ledger_table, "schema_log");
        assert!(config.create_ledger_table);
    }

    #[test]
    fn test_invalid_table_name_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "ledgerTable": "log; DROP TABLE t" }"#).unwrap();

        assert!(matches!(Config::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_malformed_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Config::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let config = Config {
            database: Some(dir.path().join("app.duckdb")),
            create_ledger_table: true,
            ..Config::default()
        };

        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
