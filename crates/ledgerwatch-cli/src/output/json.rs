use std::io;

use ledgerwatch_client::{ClientError, SuccessEnvelope, failure_from_error};
use serde::Serialize;
use serde_json::json;

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "analyze" | "config show" => serialize_json_pretty(&json!({
            "ok": true,
            "command": success.command,
            "version": success.version,
            "data": success.data,
        })),
        _ => Err(io::Error::other(format!(
            "JSON output is not supported for command `{}`",
            success.command
        ))),
    }
}

pub fn render_error_json(error: &ClientError) -> io::Result<String> {
    serialize_json_pretty(&failure_from_error(error))
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}
