mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use ledgerwatch_client::ClientError;
use stdout_io::StdoutSink;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "LEDGERWATCH_LOG";
const DEFAULT_LOG_DIRECTIVE: &str = "warn";

const ROOT_HELP: &str = "ledgerwatch - bank statement anomaly and balance alerts

Usage:
  ledgerwatch <command>

Start here:
  ledgerwatch analyze statement.json
  ledgerwatch analyze --help
  ledgerwatch config show
";

const TOP_LEVEL_HELP: &str = "ledgerwatch - bank statement anomaly and balance alerts

USAGE: ledgerwatch <command>

Analyze a statement:
  ledgerwatch analyze <path>                              Report unusual amounts, low balances, high-spend days
  cat statement.json | ledgerwatch analyze -              Read the statement from stdin
  ledgerwatch analyze <path> --json                       Emit the full report as JSON

Tune the alerts:
  ledgerwatch analyze <path> --low-balance-threshold 500
  ledgerwatch analyze <path> --high-expenditure-threshold 8000
  ledgerwatch analyze <path> --outlier-multiplier 2.5 --estimator median-mad

Configuration:
  ledgerwatch config show                                 Print thresholds after file/env layering
  $LEDGERWATCH_HOME/config.json                           Default config file (~/.ledgerwatch)
  LEDGERWATCH_LOG=debug                                   Log rejected records to stderr

Run `ledgerwatch analyze --help` for accepted statement layouts and alert rules.
";

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    let mut sink = StdoutSink::new();
    if raw_args.len() == 1 {
        if sink.write_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let cli = match cli::Cli::try_parse() {
        Ok(value) => value,
        Err(err) => return handle_parse_error(&err, &raw_args, &mut sink),
    };
    let mode = output::mode_for_command(&cli.command);
    debug!(?mode, "dispatching command");

    match dispatch::dispatch(&cli) {
        Ok(success) => {
            if output::print_success(&mut sink, &success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            if output::print_failure(&mut sink, &error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn handle_parse_error(
    err: &clap::Error,
    raw_args: &[String],
    sink: &mut StdoutSink,
) -> Result<ExitCode, ExitCode> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let text = if is_top_level_help_request(raw_args) {
                TOP_LEVEL_HELP.to_string()
            } else {
                err.to_string()
            };
            if sink.write_text(&text).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        ErrorKind::DisplayVersion => {
            if sink.write_text(&err.to_string()).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        kind => {
            let command_hint = if matches!(
                kind,
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::InvalidValue
                    | ErrorKind::ValueValidation
                    | ErrorKind::WrongNumberOfValues
                    | ErrorKind::UnknownArgument
                    | ErrorKind::InvalidSubcommand
            ) {
                command_path_from_args(raw_args)
            } else {
                None
            };
            let clean_message = strip_clap_boilerplate(&err.to_string());
            let parse_error =
                ClientError::invalid_argument_for_command(&clean_message, command_hint);
            let mode = infer_requested_output_mode(raw_args);
            if output::print_failure(sink, &parse_error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(ExitCode::from(1))
        }
    }
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Drops clap's trailing usage block so "What to do next" is the only guidance.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

fn command_path_from_args(raw_args: &[String]) -> Option<&'static str> {
    let words = raw_args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .map(String::as_str)
        .collect::<Vec<&str>>();

    match words.as_slice() {
        ["analyze", ..] => Some("analyze"),
        ["config", "show", ..] => Some("config show"),
        ["config", ..] => Some("config"),
        _ => None,
    }
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if is_internal_error(error) {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

fn is_internal_error(error: &ClientError) -> bool {
    error.code.starts_with("internal_")
}
