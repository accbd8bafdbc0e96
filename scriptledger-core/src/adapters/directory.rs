//! Directory script source - `.sql` files in a folder

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::domain::result::{Error, Result};
use crate::domain::ScriptSet;
use crate::ports::ScriptSource;

/// Extension a file must carry to count as a change-script
pub const SCRIPT_EXTENSION: &str = ".sql";

/// Reads every `*.sql` file directly inside a directory
///
/// The file name (extension included) is the script name. Subdirectories
/// and other files are ignored.
#[derive(Debug, Clone)]
pub struct DirectoryScriptSource {
    dir: PathBuf,
}

impl DirectoryScriptSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ScriptSource for DirectoryScriptSource {
    fn list_scripts(&self) -> Result<ScriptSet> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            Error::source_unavailable(format!(
                "cannot read scripts directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let mut scripts = ScriptSet::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                Error::source_unavailable(format!("{}: {}", self.dir.display(), e))
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.ends_with(SCRIPT_EXTENSION) {
                continue;
            }

            let body = fs::read_to_string(&path).map_err(|e| {
                Error::source_unavailable(format!("cannot read {}: {}", path.display(), e))
            })?;
            scripts.insert(name, &body);
        }

        debug!(dir = %self.dir.display(), count = scripts.len(), "Loaded scripts");
        Ok(scripts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lists_sql_files_only() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("20230801__migrate_create_table.sql"),
            "CREATE TABLE test (id INT);\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::create_dir(dir.path().join("nested.sql")).unwrap();

        let scripts = DirectoryScriptSource::new(dir.path()).list_scripts().unwrap();

        assert_eq!(scripts.len(), 1);
        assert_eq!(
            scripts.get(&"20230801__migrate_create_table.sql".into()),
            Some("CREATE TABLE test (id INT);")
        );
    }

    #[test]
    fn test_empty_directory_is_empty_set() {
        let dir = TempDir::new().unwrap();
        let scripts = DirectoryScriptSource::new(dir.path()).list_scripts().unwrap();
        assert!(scripts.is_empty());
    }

    #[test]
    fn test_missing_directory_is_source_unavailable() {
        let dir = TempDir::new().unwrap();
        let err = DirectoryScriptSource::new(dir.path().join("nope"))
            .list_scripts()
            .unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable(_)));
    }

    #[test]
    fn test_unreadable_script_is_source_unavailable() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("v1__migrate_x.sql"), [0xff, 0xfe, 0x00]).unwrap();

        let err = DirectoryScriptSource::new(dir.path())
            .list_scripts()
            .unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable(_)));
    }
}
