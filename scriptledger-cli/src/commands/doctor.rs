//! Doctor command - check scripts for common mistakes

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use comfy_table::{Cell, Color};
use scriptledger_core::services::DoctorResult;
use scriptledger_core::OperationResult;
use serde_json::Value;

use super::{get_context, GlobalArgs};
use crate::output;

/// Format a detail JSON value for display
fn format_detail(value: &Value) -> String {
    match value {
        Value::Object(map) => map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| match v {
                Value::String(s) => format!("{}: {}", k, s),
                _ => format!("{}: {}", k, v),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Value::String(s) => s.clone(),
        _ => value.to_string(),
    }
}

fn failure_message(result: &DoctorResult) -> Option<String> {
    (result.summary.errors > 0).then(|| format!("{} check(s) failed", result.summary.errors))
}

/// One envelope carrying the findings, marked failed when any check errored
fn json_envelope(result: &DoctorResult) -> OperationResult<&DoctorResult> {
    match failure_message(result) {
        Some(error) => OperationResult {
            success: false,
            data: Some(result),
            error: Some(error),
        },
        None => OperationResult::ok(result),
    }
}

pub fn run(args: &GlobalArgs, verbose: bool) -> Result<ExitCode> {
    let ctx = get_context(args)?;
    let result = ctx.migrator.doctor()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&json_envelope(&result))?);
    } else {
        println!("{}", "Script Health Check".bold());
        println!();

        let mut table = output::create_table();
        table.set_header(vec!["Check", "Status", "Message"]);

        for (check_name, check_result) in &result.checks {
            let status_cell = match check_result.status.as_str() {
                "pass" => Cell::new("PASS").fg(Color::Green),
                "warning" => Cell::new("WARN").fg(Color::Yellow),
                "error" => Cell::new("ERROR").fg(Color::Red),
                _ => Cell::new(&check_result.status),
            };

            table.add_row(vec![
                Cell::new(check_name),
                status_cell,
                Cell::new(&check_result.message),
            ]);

            if verbose {
                if let Some(details) = &check_result.details {
                    for detail in details {
                        table.add_row(vec![
                            Cell::new(""),
                            Cell::new(""),
                            Cell::new(format!("  - {}", format_detail(detail))),
                        ]);
                    }
                }
            }
        }

        println!("{}", table);
        println!();

        println!(
            "Summary: {} passed, {} warnings, {} errors",
            result.summary.passed.to_string().green(),
            result.summary.warnings.to_string().yellow(),
            result.summary.errors.to_string().red(),
        );
    }

    match failure_message(&result) {
        Some(message) => {
            if !args.json {
                output::error(&message);
            }
            Ok(ExitCode::FAILURE)
        }
        None => Ok(ExitCode::SUCCESS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptledger_core::services::DoctorService;
    use scriptledger_core::ScriptSet;
    use serde_json::json;

    #[test]
    fn test_format_detail() {
        let detail = json!({ "script": "v1__migrate_x.sql", "expected": "v1__rollback_x.sql" });
        assert_eq!(
            format_detail(&detail),
            "expected: v1__rollback_x.sql, script: v1__migrate_x.sql"
        );
        assert_eq!(format_detail(&json!("plain")), "plain");
    }

    #[test]
    fn test_failed_checks_give_single_failure_envelope() {
        let scripts: ScriptSet = [("v1__migrate_empty.sql", "")].into_iter().collect();
        let result = DoctorService::new().run_checks(&scripts, None);

        let text = serde_json::to_string_pretty(&json_envelope(&result)).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["success"], json!(false));
        assert_eq!(value["error"], json!("1 check(s) failed"));
        assert_eq!(value["data"]["checks"]["empty_scripts"]["status"], json!("error"));
        assert_eq!(value["data"]["summary"]["errors"], json!(1));
    }

    #[test]
    fn test_clean_checks_give_success_envelope() {
        let scripts: ScriptSet = [
            ("v1__migrate_x.sql", "CREATE TABLE t (id INT);"),
            ("v1__rollback_x.sql", "DROP TABLE t;"),
        ]
        .into_iter()
        .collect();
        let result = DoctorService::new().run_checks(&scripts, None);

        let envelope = json_envelope(&result);
        assert!(envelope.success);
        assert!(envelope.error.is_none());
        assert!(failure_message(&result).is_none());
    }
}
