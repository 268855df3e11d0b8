mod config_text;
mod error_text;
mod format;
mod json;
mod mode;
mod report_text;

use std::io::{self, Write};

use ledgerwatch_client::{ClientError, SuccessEnvelope};

use crate::stdout_io::StdoutSink;

pub use mode::{OutputMode, mode_for_command};

pub fn print_success<W: Write>(
    sink: &mut StdoutSink<W>,
    success: &SuccessEnvelope,
    mode: OutputMode,
) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    sink.write_line(&body)
}

pub fn print_failure<W: Write>(
    sink: &mut StdoutSink<W>,
    error: &ClientError,
    mode: OutputMode,
) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    sink.write_line(&body)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "analyze" => report_text::render_analyze(&success.data),
        "config show" => config_text::render_config_show(&success.data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}

#[cfg(test)]
mod tests {
    use ledgerwatch_client::{ClientError, SuccessEnvelope};
    use serde_json::json;

    use super::{OutputMode, print_failure, print_success};
    use crate::stdout_io::StdoutSink;

    #[test]
    fn failures_are_written_in_the_requested_mode() {
        let error = ClientError::invalid_argument("No statement provided.");

        let mut text_sink = StdoutSink::with_writer(Vec::new());
        assert!(print_failure(&mut text_sink, &error, OutputMode::Text).is_ok());
        let text = String::from_utf8_lossy(&text_sink.into_inner()).to_string();
        assert!(text.contains("What to do next:"));
        assert!(text.ends_with('\n'));

        let mut json_sink = StdoutSink::with_writer(Vec::new());
        assert!(print_failure(&mut json_sink, &error, OutputMode::Json).is_ok());
        let body = String::from_utf8_lossy(&json_sink.into_inner()).to_string();
        assert!(body.contains("\"code\": \"invalid_argument\""));
    }

    #[test]
    fn unknown_text_command_is_an_io_error() {
        let success = SuccessEnvelope {
            ok: true,
            command: "export".to_string(),
            version: "0.1.0".to_string(),
            data: json!({}),
        };
        let mut sink = StdoutSink::with_writer(Vec::new());
        assert!(print_success(&mut sink, &success, OutputMode::Text).is_err());
        assert!(sink.into_inner().is_empty());
    }
}
