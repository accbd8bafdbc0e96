//! Doctor service - script set hygiene checks
//!
//! Nothing here blocks a migration run; the checks point at scripts that
//! will be ignored, cannot be undone, or are unlikely to execute.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;
use sqlparser::dialect::DuckDbDialect;
use sqlparser::parser::Parser;

use crate::domain::{AppliedState, ScriptSet};

const PASS: &str = "pass";
const WARNING: &str = "warning";
const ERROR: &str = "error";

/// Runs hygiene checks over a script set
#[derive(Debug, Default)]
pub struct DoctorService;

impl DoctorService {
    pub fn new() -> Self {
        Self
    }

    /// Run all checks; `applied` enables the checks that need ledger state
    pub fn run_checks(&self, scripts: &ScriptSet, applied: Option<&AppliedState>) -> DoctorResult {
        let mut checks = BTreeMap::new();

        // Empty scripts
        let empty: Vec<serde_json::Value> = scripts
            .iter()
            .filter(|(name, body)| name.direction().is_some() && body.is_empty())
            .map(|(name, _)| json!({ "script": name }))
            .collect();
        checks.insert(
            "empty_scripts".to_string(),
            CheckResult::from_findings(
                ERROR,
                empty,
                "No empty scripts".to_string(),
                |n| format!("{} script(s) have an empty body", n),
            ),
        );

        // SQL syntax; DuckDB accepts some statements sqlparser does not, so only warn
        let dialect = DuckDbDialect {};
        let unparsable: Vec<serde_json::Value> = scripts
            .iter()
            .filter(|(name, body)| name.direction().is_some() && !body.is_empty())
            .filter_map(|(name, body)| {
                Parser::parse_sql(&dialect, body).err().map(|e| {
                    let msg = e.to_string();
                    json!({
                        "script": name,
                        "error": msg.trim_start_matches("sql parser error: "),
                    })
                })
            })
            .collect();
        checks.insert(
            "sql_syntax".to_string(),
            CheckResult::from_findings(
                WARNING,
                unparsable,
                "All scripts parse".to_string(),
                |n| format!("{} script(s) failed to parse", n),
            ),
        );

        // Forward scripts without a paired reverse script
        let irreversible: Vec<serde_json::Value> = scripts
            .forward()
            .filter(|(name, _)| !scripts.contains(&name.reverse_name()))
            .map(|(name, _)| json!({ "script": name, "expected": name.reverse_name() }))
            .collect();
        checks.insert(
            "missing_rollback".to_string(),
            CheckResult::from_findings(
                WARNING,
                irreversible,
                "Every migrate script has a rollback script".to_string(),
                |n| format!("{} migrate script(s) have no rollback script", n),
            ),
        );

        // Reverse scripts without a forward script
        let orphaned: Vec<serde_json::Value> = scripts
            .reverse()
            .filter(|(name, _)| !scripts.contains(&name.forward_name()))
            .map(|(name, _)| json!({ "script": name }))
            .collect();
        checks.insert(
            "orphaned_rollback".to_string(),
            CheckResult::from_findings(
                WARNING,
                orphaned,
                "Every rollback script has a migrate script".to_string(),
                |n| format!("{} rollback script(s) have no migrate script", n),
            ),
        );

        // Scripts the reconciler will never look at
        let unmarked: Vec<serde_json::Value> = scripts
            .iter()
            .filter(|(name, _)| name.direction().is_none())
            .map(|(name, _)| json!({ "script": name }))
            .collect();
        checks.insert(
            "unmarked_scripts".to_string(),
            CheckResult::from_findings(
                WARNING,
                unmarked,
                "All scripts carry a direction marker".to_string(),
                |n| format!("{} script(s) are neither migrate nor rollback scripts", n),
            ),
        );

        if let Some(applied) = applied {
            // Removed scripts that cannot be undone will fail the next run
            let stuck: Vec<serde_json::Value> = applied
                .iter()
                .filter(|(version, record)| !scripts.contains(version) && !record.has_reverse_sql())
                .map(|(version, _)| json!({ "version": version }))
                .collect();
            checks.insert(
                "unrollbackable_removals".to_string(),
                CheckResult::from_findings(
                    ERROR,
                    stuck,
                    "Every removed migration has a recorded rollback".to_string(),
                    |n| format!("{} removed migration(s) have no recorded rollback", n),
                ),
            );
        }

        let passed = checks.values().filter(|c| c.status == PASS).count() as i64;
        let warnings = checks.values().filter(|c| c.status == WARNING).count() as i64;
        let errors = checks.values().filter(|c| c.status == ERROR).count() as i64;

        DoctorResult {
            checks,
            summary: DoctorSummary { passed, warnings, errors },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorResult {
    pub checks: BTreeMap<String, CheckResult>,
    pub summary: DoctorSummary,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<serde_json::Value>>,
}

impl CheckResult {
    fn from_findings(
        severity: &str,
        findings: Vec<serde_json::Value>,
        clean_message: String,
        describe: impl Fn(usize) -> String,
    ) -> Self {
        if findings.is_empty() {
            Self {
                status: PASS.to_string(),
                message: clean_message,
                details: None,
            }
        } else {
            Self {
                status: severity.to_string(),
                message: describe(findings.len()),
                details: Some(findings),
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorSummary {
    pub passed: i64,
    pub warnings: i64,
    pub errors: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LedgerRow;
    use crate::services::ledger::read_applied_state;

    #[test]
    fn test_clean_script_set() {
        let scripts: ScriptSet = [
            ("v1__migrate_x.sql", "CREATE TABLE t (id INT);"),
            ("v1__rollback_x.sql", "DROP TABLE t;"),
        ]
        .into_iter()
        .collect();

        let result = DoctorService::new().run_checks(&scripts, None);

        assert_eq!(result.summary.warnings, 0);
        assert_eq!(result.summary.errors, 0);
        assert_eq!(result.summary.passed, 5);
    }

    #[test]
    fn test_flags_problems() {
        let scripts: ScriptSet = [
            ("v1__migrate_x.sql", "CREATE TABLE t (id INT);"),
            ("v2__rollback_y.sql", "DROP TABLE y;"),
            ("v3__migrate_z.sql", "CREATE TABLEZ nope"),
            ("v4__migrate_e.sql", "   "),
            ("seed.sql", "INSERT INTO t VALUES (1);"),
        ]
        .into_iter()
        .collect();

        let result = DoctorService::new().run_checks(&scripts, None);

        assert_eq!(result.checks["empty_scripts"].status, "error");
        assert_eq!(result.checks["sql_syntax"].status, "warning");
        assert_eq!(result.checks["missing_rollback"].status, "warning");
        assert_eq!(
            result.checks["missing_rollback"].details.as_ref().unwrap().len(),
            3
        );
        assert_eq!(result.checks["orphaned_rollback"].status, "warning");
        assert_eq!(result.checks["unmarked_scripts"].status, "warning");
    }

    #[test]
    fn test_removed_without_rollback_is_error() {
        let applied = read_applied_state(&[LedgerRow {
            sequence_id: 1,
            version: "v1__migrate_x.sql".into(),
            migrate_sql: "CREATE TABLE t (id INT);".into(),
            rollback_sql: None,
        }]);

        let result = DoctorService::new().run_checks(&ScriptSet::new(), Some(&applied));

        assert_eq!(result.checks["unrollbackable_removals"].status, "error");
        assert_eq!(result.summary.errors, 1);
    }
}
