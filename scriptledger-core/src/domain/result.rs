//! Result and error types for the core library

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ScriptName;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    /// The script set could not be enumerated or read
    #[error("Script source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Connection unavailable: {0}")]
    ConnectionUnavailable(String),

    /// The ledger could not be read or holds malformed rows
    #[error("Ledger read error: {0}")]
    LedgerRead(String),

    /// A statement or the ledger insert failed; its transaction was rolled back
    #[error("Execution of {version} failed: {message}")]
    Execution { version: ScriptName, message: String },

    #[error("No rollback script recorded for {0}")]
    MissingRollbackScript(ScriptName),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable(msg.into())
    }

    pub fn connection_unavailable(msg: impl Into<String>) -> Self {
        Self::ConnectionUnavailable(msg.into())
    }

    pub fn ledger_read(msg: impl Into<String>) -> Self {
        Self::LedgerRead(msg.into())
    }

    pub fn execution(version: &ScriptName, msg: impl Into<String>) -> Self {
        Self::Execution {
            version: version.clone(),
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Operation result envelope for machine-readable output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> OperationResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::fail(e.to_string()),
        }
    }
}
