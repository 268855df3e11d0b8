use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const ANALYZE_HELP_COMMAND: &str = "ledgerwatch analyze --help";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `ledgerwatch {cmd} --help` for usage."),
            None => "Run `ledgerwatch --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn statement_read_failed(source: &str, detail: &str) -> Self {
        Self::new(
            "statement_read_failed",
            &format!("Could not read statement `{source}`: {detail}"),
            vec![
                "Verify the path exists and is readable.".to_string(),
                "Rerun `ledgerwatch analyze <path>`.".to_string(),
            ],
        )
        .with_data(json!({
            "source": source,
        }))
    }

    pub fn invalid_statement_format(message: &str, received_format: &str) -> Self {
        Self::new(
            "invalid_statement_format",
            message,
            vec![
                "Provide a bank statement JSON document, a JSON array of transactions, or a CSV file with headers.".to_string(),
                format!("Run `{ANALYZE_HELP_COMMAND}` to review the accepted layouts."),
            ],
        )
        .with_data(json!({
            "received_format": received_format,
            "supported_formats": ["statement_json", "json_array", "csv"],
            "help_command": ANALYZE_HELP_COMMAND,
        }))
    }

    pub fn statement_schema_mismatch(
        required_headers: Vec<String>,
        actual_headers: Vec<String>,
    ) -> Self {
        let missing_headers = required_headers
            .iter()
            .filter(|required| !actual_headers.contains(required))
            .cloned()
            .collect::<Vec<String>>();

        Self::new(
            "statement_schema_mismatch",
            "CSV headers are missing required transaction fields.",
            vec![
                format!("Include every required header: {}.", required_headers.join(", ")),
                "Extra columns are allowed and ignored.".to_string(),
                format!("Run `{ANALYZE_HELP_COMMAND}` to review the accepted layouts."),
            ],
        )
        .with_data(json!({
            "required_headers": required_headers,
            "missing_headers": missing_headers,
            "actual_headers": actual_headers,
        }))
    }

    pub fn invalid_config(field: &str, detail: &str) -> Self {
        Self::new(
            "invalid_config",
            &format!("Configuration value `{field}` is invalid: {detail}"),
            vec![
                "Fix the value in your config file, environment, or command flags.".to_string(),
                "Run `ledgerwatch config show` to inspect the effective configuration."
                    .to_string(),
            ],
        )
        .with_data(json!({
            "field": field,
        }))
    }

    pub fn config_read_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "config_read_failed",
            &format!("Could not load config file `{location}`: {detail}"),
            vec![
                format!("Check that `{location}` exists and contains a JSON object."),
                "Remove the `--config` flag to fall back to defaults.".to_string(),
            ],
        )
        .with_data(json!({
            "path": location,
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
