//! Output formatting for commands.

use colored::Colorize;
use nomad_run_reconcile::ConflictError;
use serde::Serialize;
use tabled::{Table, Tabled};

const CLI_SCHEMA_VERSION: &str = "nomad-run.v1";

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Self {
        match s {
            "json" => Self::Json,
            _ => Self::Table,
        }
    }
}

/// Print rows in the specified format.
pub fn print_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                println!("{}", "No jobs found.".dimmed());
            } else {
                println!("{}", Table::new(data));
            }
        }
        OutputFormat::Json => println!("{}", format_json(data, "[]")),
    }
}

/// Print a single item as JSON.
pub fn print_single<T: Serialize>(data: &T) {
    println!("{}", format_json(data, "{}"));
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "Success:".green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "Info:".blue().bold(), message);
}

/// Format a failed run as JSON.
///
/// A conflict is reported in full so callers can act on it without parsing
/// the message.
pub fn format_error_json(message: &str, conflict: Option<&ConflictError>) -> String {
    let wrapped = serde_json::json!({
        "schemaVersion": CLI_SCHEMA_VERSION,
        "error": {
            "message": message,
            "conflict": conflict,
        }
    });
    serde_json::to_string_pretty(&wrapped).unwrap_or_else(|_| "{}".to_string())
}

fn format_json<T: Serialize + ?Sized>(data: &T, fallback: &str) -> String {
    let value = serde_json::to_value(data).unwrap_or_else(|_| serde_json::json!({}));
    let wrapped = serde_json::json!({
        "schemaVersion": CLI_SCHEMA_VERSION,
        "data": value
    });
    serde_json::to_string_pretty(&wrapped).unwrap_or_else(|_| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parse_defaults_to_table() {
        assert_eq!(OutputFormat::parse("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("table"), OutputFormat::Table);
        assert_eq!(OutputFormat::parse("yaml"), OutputFormat::Table);
    }

    #[test]
    fn json_output_is_wrapped_with_schema_version() {
        let out = format_json(&serde_json::json!({ "id": "web" }), "{}");
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["schemaVersion"], "nomad-run.v1");
        assert_eq!(value["data"]["id"], "web");
    }

    #[test]
    fn error_json_carries_conflict() {
        use nomad_run_id::{JobId, Port};
        use nomad_run_reconcile::{ConflictKind, JobInfo};

        let port = Port::new(8080).unwrap();
        let conflict = ConflictError {
            kind: ConflictKind::Collision,
            existing: JobInfo::new(JobId::parse("api").unwrap(), "API", vec![port]),
            desired_id: JobId::parse("web").unwrap(),
            desired_port: port,
        };
        let out = format_error_json(&conflict.to_string(), Some(&conflict));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["schemaVersion"], "nomad-run.v1");
        assert_eq!(value["error"]["conflict"]["kind"], "collision");
        assert_eq!(value["error"]["conflict"]["existing"]["ports"], serde_json::json!([8080]));
        assert_eq!(value["error"]["conflict"]["desired_port"], 8080);
        assert!(value["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Job conflict:"));
    }

    #[test]
    fn error_json_without_conflict() {
        let out = format_error_json("missing required configuration: nomad-acl", None);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value["error"]["conflict"].is_null());
    }
}
