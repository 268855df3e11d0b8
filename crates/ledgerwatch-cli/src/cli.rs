use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ledgerwatch_client::{ConfigOverrides, EstimatorKind};

pub fn parse_threshold(value: &str) -> Result<f64, String> {
    let parsed = value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if !parsed.is_finite() {
        return Err("threshold must be a finite number".to_string());
    }
    Ok(parsed)
}

pub fn parse_multiplier(value: &str) -> Result<f64, String> {
    let parsed = parse_threshold(value)?;
    if parsed < 0.0 {
        return Err("multiplier must be zero or greater".to_string());
    }
    Ok(parsed)
}

pub fn parse_estimator(value: &str) -> Result<EstimatorKind, String> {
    EstimatorKind::parse(value)
        .ok_or_else(|| "estimator must be one of: mean-std, median-mad".to_string())
}

/// Extended help shown after `ledgerwatch analyze --help`.
pub const ANALYZE_AFTER_HELP: &str = "\
Accepted statement layouts:
  JSON bank statement:
    {\"Account\": {\"Transactions\": {\"Transaction\": [ {...}, {...} ]}}}
  JSON array:
    [ {...}, {...} ]
  CSV with a header row (extra columns are ignored):
    type,amount,currentBalance,transactionTimestamp
    DEBIT,250.00,4750.00,2024-01-01T10:00:00+05:30

Transaction fields:
  amount                 Decimal number. Unparseable values drop the record.
  type                   CREDIT or DEBIT (any case).
  currentBalance         Decimal number; balance after the transaction.
  transactionTimestamp   ISO date or date-time, with or without an offset.

Alerts:
  Unusual amounts        amount outside mean +/- k * standard deviation
  Low balance            currentBalance strictly below the floor
  High expenditure       DEBIT total for a calendar day strictly above the ceiling

Configuration (lowest to highest precedence):
  defaults -> config file -> LEDGERWATCH_* environment -> flags
  Config file: --config <file>, else $LEDGERWATCH_HOME/config.json,
  else ~/.ledgerwatch/config.json
";

#[derive(Debug, Parser)]
#[command(
    name = "ledgerwatch",
    version,
    about = "bank statement anomaly and balance alerts",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Flag unusual amounts, low balances, and high-spend days in a statement
    #[command(after_long_help = ANALYZE_AFTER_HELP)]
    Analyze {
        /// Path to a JSON or CSV statement (use `-` for stdin)
        path: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        thresholds: ThresholdArgs,
    },
    /// Inspect the effective alert configuration
    #[command(arg_required_else_help = true)]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigCommand {
    /// Show thresholds after layering the config file, environment, and defaults
    Show {
        /// Read configuration from this JSON file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, clap::Args)]
pub struct ThresholdArgs {
    /// Read configuration from this JSON file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Alert when the balance after a transaction is below this value
    #[arg(long, allow_negative_numbers = true, value_parser = parse_threshold)]
    pub low_balance_threshold: Option<f64>,
    /// Alert when a day's total spend is above this value
    #[arg(long, allow_negative_numbers = true, value_parser = parse_threshold)]
    pub high_expenditure_threshold: Option<f64>,
    /// Number of deviations from the center that counts as unusual
    #[arg(long, allow_negative_numbers = true, value_parser = parse_multiplier)]
    pub outlier_multiplier: Option<f64>,
    /// Distribution estimator: mean-std or median-mad
    #[arg(long, value_parser = parse_estimator)]
    pub estimator: Option<EstimatorKind>,
    /// Transaction type summed for daily expenditure
    #[arg(long)]
    pub expenditure_type: Option<String>,
}

impl ThresholdArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            low_balance_threshold: self.low_balance_threshold,
            high_expenditure_threshold: self.high_expenditure_threshold,
            outlier_std_dev_multiplier: self.outlier_multiplier,
            outlier_estimator: self.estimator,
            expenditure_type: self.expenditure_type.clone(),
        }
    }
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
