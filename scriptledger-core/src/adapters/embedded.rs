//! Embedded script source - scripts compiled into the binary
//!
//! ```ignore
//! const SCRIPTS: &[(&str, &str)] = &[
//!     ("001__migrate_schema.sql", include_str!("sql/001__migrate_schema.sql")),
//!     ("001__rollback_schema.sql", include_str!("sql/001__rollback_schema.sql")),
//! ];
//! let source = EmbeddedScriptSource::new(SCRIPTS);
//! ```

use crate::domain::result::Result;
use crate::domain::ScriptSet;
use crate::ports::ScriptSource;

/// Serves a static `(name, sql)` table, typically built with `include_str!`
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedScriptSource {
    scripts: &'static [(&'static str, &'static str)],
}

impl EmbeddedScriptSource {
    pub const fn new(scripts: &'static [(&'static str, &'static str)]) -> Self {
        Self { scripts }
    }
}

impl ScriptSource for EmbeddedScriptSource {
    fn list_scripts(&self) -> Result<ScriptSet> {
        Ok(self.scripts.iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPTS: &[(&str, &str)] = &[
        ("002__migrate_b", "CREATE TABLE b (id INT);\n"),
        ("001__migrate_a", "CREATE TABLE a (id INT);\n"),
    ];

    #[test]
    fn test_lists_trimmed_scripts_in_order() {
        let scripts = EmbeddedScriptSource::new(SCRIPTS).list_scripts().unwrap();
        let names: Vec<&str> = scripts.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["001__migrate_a", "002__migrate_b"]);
        assert_eq!(
            scripts.get(&"001__migrate_a".into()),
            Some("CREATE TABLE a (id INT);")
        );
    }
}
