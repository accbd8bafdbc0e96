//! DuckDB connection providers

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use duckdb::Connection;
use tracing::warn;

use crate::domain::result::{Error, Result};
use crate::ports::ConnectionProvider;

/// Maximum number of attempts when the database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
pub fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
        || lower.contains("could not set lock on file")
}

/// Opens a fresh connection to a DuckDB file per request
///
/// For in-memory databases use [`SharedConnectionProvider`], since every
/// new in-memory connection would start empty.
#[derive(Debug, Clone)]
pub struct DuckDbConnectionProvider {
    db_path: PathBuf,
}

impl DuckDbConnectionProvider {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Attempt to open a database connection (called by get_connection() with retry logic)
    fn try_open_connection(&self) -> duckdb::Result<Connection> {
        // Extension autoloading stays off so scripts only see statically linked features
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Connection::open_with_flags(&self.db_path, config)
    }
}

impl ConnectionProvider for DuckDbConnectionProvider {
    /// Open a connection, retrying with exponential backoff while the file is locked
    fn get_connection(&self) -> Result<Connection> {
        let mut attempt = 0;
        loop {
            match self.try_open_connection() {
                Ok(conn) => return Ok(conn),
                Err(e) => {
                    let err_msg = e.to_string();
                    attempt += 1;
                    if !is_retryable_error(&err_msg) || attempt >= MAX_RETRIES {
                        return Err(Error::connection_unavailable(err_msg));
                    }
                    let delay =
                        Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt - 1));
                    warn!(
                        delay_ms = delay.as_millis() as u64,
                        attempt,
                        max_attempts = MAX_RETRIES,
                        error = %err_msg,
                        "Database busy, retrying"
                    );
                    thread::sleep(delay);
                }
            }
        }
    }
}

/// Hands out clones of one already-open connection
///
/// Clones share the underlying database, so an in-memory database keeps its
/// contents across `migrate()` calls.
pub struct SharedConnectionProvider {
    conn: Connection,
}

impl SharedConnectionProvider {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::connection_unavailable(e.to_string()))?;
        Ok(Self::new(conn))
    }

    /// The connection clones are made from
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl ConnectionProvider for SharedConnectionProvider {
    fn get_connection(&self) -> Result<Connection> {
        self.conn
            .try_clone()
            .map_err(|e| Error::connection_unavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_provider_opens_database() {
        let dir = TempDir::new().unwrap();
        let provider = DuckDbConnectionProvider::new(dir.path().join("test.duckdb"));

        let conn = provider.get_connection().unwrap();
        conn.execute_batch("CREATE TABLE t (id INT); INSERT INTO t VALUES (1);")
            .unwrap();
        drop(conn);

        let conn = provider.get_connection().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_unopenable_path_is_connection_unavailable() {
        let dir = TempDir::new().unwrap();
        let provider = DuckDbConnectionProvider::new(dir.path().join("missing").join("x.duckdb"));

        let err = provider.get_connection().unwrap_err();
        assert!(matches!(err, Error::ConnectionUnavailable(_)));
    }

    #[test]
    fn test_shared_provider_keeps_in_memory_state() {
        let provider = SharedConnectionProvider::in_memory().unwrap();

        provider
            .get_connection()
            .unwrap()
            .execute_batch("CREATE TABLE t (id INT)")
            .unwrap();

        let count: i64 = provider
            .get_connection()
            .unwrap()
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 't'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
