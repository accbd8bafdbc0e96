//! Adapters - concrete implementations of ports
//!
//! - `duckdb`: connection providers backed by DuckDB
//! - `directory`, `bundle`, `embedded`: script sources

pub mod bundle;
pub mod directory;
pub mod duckdb;
pub mod embedded;

pub use bundle::ZipScriptSource;
pub use directory::DirectoryScriptSource;
pub use self::duckdb::{DuckDbConnectionProvider, SharedConnectionProvider};
pub use embedded::EmbeddedScriptSource;

use std::path::Path;

use crate::ports::ScriptSource;

/// Pick a script source for a path: `.zip` files are bundles, anything else a directory
pub fn open_script_source(path: &Path) -> Box<dyn ScriptSource> {
    let is_bundle = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
    if is_bundle {
        Box::new(ZipScriptSource::new(path))
    } else {
        Box::new(DirectoryScriptSource::new(path))
    }
}
