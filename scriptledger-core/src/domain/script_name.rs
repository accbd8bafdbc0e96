//! Script names and the forward/reverse naming convention
//!
//! A forward script's name contains `__migrate_`; the script that undoes it
//! carries the same name with that marker replaced by `__rollback_`:
//!
//! ```text
//! 20230801__migrate_create_table.sql
//! 20230801__rollback_create_table.sql
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Marker carried by forward (apply) scripts
pub const MIGRATE_MARKER: &str = "__migrate_";

/// Marker carried by reverse (undo) scripts
pub const ROLLBACK_MARKER: &str = "__rollback_";

/// Direction encoded in a script name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Reverse,
}

/// Name of a change-script, also used as its ledger version
///
/// Names order by their leading digit run first (compared numerically), then
/// by plain byte order, so `9__migrate_a` sorts before `10__migrate_b` while
/// fixed-width timestamp prefixes keep their lexical order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScriptName(String);

impl ScriptName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Direction of the script, or `None` when the name carries no marker
    ///
    /// The reverse marker wins when both are present, matching how ledger
    /// rows are replayed.
    pub fn direction(&self) -> Option<Direction> {
        if self.0.contains(ROLLBACK_MARKER) {
            Some(Direction::Reverse)
        } else if self.0.contains(MIGRATE_MARKER) {
            Some(Direction::Forward)
        } else {
            None
        }
    }

    pub fn is_forward(&self) -> bool {
        self.direction() == Some(Direction::Forward)
    }

    pub fn is_reverse(&self) -> bool {
        self.direction() == Some(Direction::Reverse)
    }

    /// Name of the reverse script paired with this one
    pub fn reverse_name(&self) -> ScriptName {
        Self(self.0.replace(MIGRATE_MARKER, ROLLBACK_MARKER))
    }

    /// Name of the forward script paired with this one
    pub fn forward_name(&self) -> ScriptName {
        Self(self.0.replace(ROLLBACK_MARKER, MIGRATE_MARKER))
    }

    /// Leading run of ASCII digits, e.g. `20230801` in `20230801__migrate_x`
    fn numeric_prefix(&self) -> Option<&str> {
        let end = self
            .0
            .bytes()
            .position(|b| !b.is_ascii_digit())
            .unwrap_or(self.0.len());
        (end > 0).then(|| &self.0[..end])
    }
}

/// Compare two digit strings by numeric value without parsing them
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl Ord for ScriptName {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_prefix = match (self.numeric_prefix(), other.numeric_prefix()) {
            (Some(a), Some(b)) => cmp_digits(a, b),
            _ => Ordering::Equal,
        };
        by_prefix.then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for ScriptName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ScriptName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScriptName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ScriptName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for ScriptName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction() {
        assert_eq!(
            ScriptName::from("v1__migrate_x").direction(),
            Some(Direction::Forward)
        );
        assert_eq!(
            ScriptName::from("v1__rollback_x").direction(),
            Some(Direction::Reverse)
        );
        assert_eq!(ScriptName::from("v1_notes").direction(), None);
    }

    #[test]
    fn test_pairing() {
        let forward = ScriptName::from("20230801__migrate_create_table.sql");
        let reverse = forward.reverse_name();
        assert_eq!(reverse.as_str(), "20230801__rollback_create_table.sql");
        assert_eq!(reverse.forward_name(), forward);
    }

    #[test]
    fn test_numeric_prefix_ordering() {
        let mut names: Vec<ScriptName> = ["10__migrate_b", "9__migrate_a", "011__migrate_c"]
            .into_iter()
            .map(ScriptName::from)
            .collect();
        names.sort();
        let sorted: Vec<&str> = names.iter().map(|n| n.as_str()).collect();
        assert_eq!(sorted, vec!["9__migrate_a", "10__migrate_b", "011__migrate_c"]);
    }

    #[test]
    fn test_lexical_fallback() {
        let a = ScriptName::from("v1__migrate_a");
        let b = ScriptName::from("v2__migrate_a");
        assert!(a < b);

        // Equal numeric value falls back to byte order
        let padded = ScriptName::from("009__migrate_x");
        let bare = ScriptName::from("9__migrate_x");
        assert!(padded < bare);
    }

    #[test]
    fn test_timestamp_prefixes_keep_lexical_order() {
        let earlier = ScriptName::from("20230801__migrate_a");
        let later = ScriptName::from("20230915__migrate_a");
        assert!(earlier < later);
    }
}
