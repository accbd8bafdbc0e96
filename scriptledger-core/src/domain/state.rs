//! Script sets and applied state
//!
//! Both are ordered maps keyed by [`ScriptName`], so every scan over them
//! visits names in version order.

use std::collections::btree_map;
use std::collections::BTreeMap;

use super::{LedgerRow, MigrationRecord, ScriptName};

/// Available change-scripts: name to trimmed SQL body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptSet {
    scripts: BTreeMap<ScriptName, String>,
}

impl ScriptSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a script, trimming surrounding whitespace from its body
    pub fn insert(&mut self, name: impl Into<ScriptName>, body: &str) {
        self.scripts.insert(name.into(), body.trim().to_string());
    }

    pub fn get(&self, name: &ScriptName) -> Option<&str> {
        self.scripts.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &ScriptName) -> bool {
        self.scripts.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ScriptName, &str)> {
        self.scripts.iter().map(|(name, body)| (name, body.as_str()))
    }

    /// Forward scripts in version order
    pub fn forward(&self) -> impl Iterator<Item = (&ScriptName, &str)> {
        self.iter().filter(|(name, _)| name.is_forward())
    }

    /// Reverse scripts in version order
    pub fn reverse(&self) -> impl Iterator<Item = (&ScriptName, &str)> {
        self.iter().filter(|(name, _)| name.is_reverse())
    }
}

impl<N: Into<ScriptName>, B: AsRef<str>> FromIterator<(N, B)> for ScriptSet {
    fn from_iter<I: IntoIterator<Item = (N, B)>>(iter: I) -> Self {
        let mut set = ScriptSet::new();
        for (name, body) in iter {
            set.insert(name, body.as_ref());
        }
        set
    }
}

/// Migrations currently in effect: applied and not since rolled back
///
/// Keyed by forward version. Built by replaying ledger rows in append order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedState {
    active: BTreeMap<ScriptName, MigrationRecord>,
}

impl AppliedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the state by one ledger row
    ///
    /// A reverse row cancels its forward counterpart (a no-op if that was
    /// never applied); any other row becomes the active record for its
    /// version.
    pub fn replay(mut self, row: &LedgerRow) -> Self {
        if row.version.is_reverse() {
            self.active.remove(&row.version.forward_name());
        } else {
            self.active.insert(row.version.clone(), row.to_record());
        }
        self
    }

    pub fn get(&self, version: &ScriptName) -> Option<&MigrationRecord> {
        self.active.get(version)
    }

    pub fn contains(&self, version: &ScriptName) -> bool {
        self.active.contains_key(version)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Active records in version order
    pub fn iter(&self) -> btree_map::Iter<'_, ScriptName, MigrationRecord> {
        self.active.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, version: &str, migrate: &str, rollback: Option<&str>) -> LedgerRow {
        LedgerRow {
            sequence_id: id,
            version: version.into(),
            migrate_sql: migrate.to_string(),
            rollback_sql: rollback.map(str::to_string),
        }
    }

    #[test]
    fn test_script_set_trims_bodies() {
        let scripts: ScriptSet = [("v1__migrate_x", "\n  CREATE TABLE t (id INT);  \n")]
            .into_iter()
            .collect();
        assert_eq!(
            scripts.get(&"v1__migrate_x".into()),
            Some("CREATE TABLE t (id INT);")
        );
    }

    #[test]
    fn test_script_set_splits_directions() {
        let scripts: ScriptSet = [
            ("v1__migrate_x", "a"),
            ("v1__rollback_x", "b"),
            ("README", "c"),
        ]
        .into_iter()
        .collect();
        assert_eq!(scripts.forward().count(), 1);
        assert_eq!(scripts.reverse().count(), 1);
        assert_eq!(scripts.len(), 3);
    }

    #[test]
    fn test_replay_reverse_cancels_forward() {
        let state = AppliedState::new()
            .replay(&row(1, "v1__migrate_x", "CREATE TABLE t (id INT);", Some("DROP TABLE t;")))
            .replay(&row(2, "v1__rollback_x", "DROP TABLE t;", Some("")));
        assert!(state.is_empty());
    }

    #[test]
    fn test_replay_reverse_without_forward_is_noop() {
        let state = AppliedState::new().replay(&row(1, "v1__rollback_x", "DROP TABLE t;", None));
        assert!(state.is_empty());
    }

    #[test]
    fn test_replay_reapply_overwrites() {
        let state = AppliedState::new()
            .replay(&row(1, "v1__migrate_x", "old", None))
            .replay(&row(2, "v1__migrate_x", "new", Some("undo")));
        let record = state.get(&"v1__migrate_x".into()).unwrap();
        assert_eq!(record.forward_sql, "new");
        assert_eq!(record.reverse_sql.as_deref(), Some("undo"));
    }
}
