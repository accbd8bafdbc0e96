//! Zip bundle script source - `.sql` entries in an archive

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::ZipArchive;

use super::directory::SCRIPT_EXTENSION;
use crate::domain::result::{Error, Result};
use crate::domain::{ScriptName, ScriptSet};
use crate::ports::ScriptSource;

/// Reads change-scripts shipped as a zip bundle
///
/// Every `*.sql` entry counts regardless of the folder it sits in; the entry's
/// file name is the script name. Two entries with the same file name are
/// rejected since either could be meant.
#[derive(Debug, Clone)]
pub struct ZipScriptSource {
    archive_path: PathBuf,
}

impl ZipScriptSource {
    pub fn new(archive_path: impl Into<PathBuf>) -> Self {
        Self {
            archive_path: archive_path.into(),
        }
    }

    fn unavailable(&self, what: impl std::fmt::Display) -> Error {
        Error::source_unavailable(format!("{}: {}", self.archive_path.display(), what))
    }
}

impl ScriptSource for ZipScriptSource {
    fn list_scripts(&self) -> Result<ScriptSet> {
        let file = File::open(&self.archive_path).map_err(|e| self.unavailable(e))?;
        let mut archive = ZipArchive::new(file).map_err(|e| self.unavailable(e))?;

        let mut scripts = ScriptSet::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(|e| self.unavailable(e))?;
            if entry.is_dir() {
                continue;
            }
            let Some(name) = Path::new(entry.name())
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
            else {
                continue;
            };
            if !name.ends_with(SCRIPT_EXTENSION) {
                continue;
            }
            let script_name = ScriptName::new(name);
            if scripts.contains(&script_name) {
                return Err(self.unavailable(format!("duplicate script {}", script_name)));
            }

            let mut body = String::new();
            entry
                .read_to_string(&mut body)
                .map_err(|e| self.unavailable(format!("{}: {}", script_name, e)))?;
            scripts.insert(script_name, &body);
        }

        debug!(
            archive = %self.archive_path.display(),
            count = scripts.len(),
            "Loaded scripts"
        );
        Ok(scripts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_bundle(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (name, body) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_reads_sql_entries() {
        let dir = TempDir::new().unwrap();
        let bundle = dir.path().join("scripts.zip");
        write_bundle(
            &bundle,
            &[
                ("db/v1__migrate_x.sql", " CREATE TABLE t (id INT); "),
                ("db/v1__rollback_x.sql", "DROP TABLE t;"),
                ("README.md", "ignored"),
            ],
        );

        let scripts = ZipScriptSource::new(&bundle).list_scripts().unwrap();

        assert_eq!(scripts.len(), 2);
        assert_eq!(
            scripts.get(&"v1__migrate_x.sql".into()),
            Some("CREATE TABLE t (id INT);")
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let dir = TempDir::new().unwrap();
        let bundle = dir.path().join("scripts.zip");
        write_bundle(
            &bundle,
            &[("a/v1__migrate_x.sql", "SELECT 1;"), ("b/v1__migrate_x.sql", "SELECT 2;")],
        );

        let err = ZipScriptSource::new(&bundle).list_scripts().unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable(_)));
    }

    #[test]
    fn test_missing_archive_is_source_unavailable() {
        let dir = TempDir::new().unwrap();
        let err = ZipScriptSource::new(dir.path().join("none.zip"))
            .list_scripts()
            .unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable(_)));
    }
}
