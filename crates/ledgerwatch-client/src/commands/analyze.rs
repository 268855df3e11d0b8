use std::path::Path;

use tracing::{debug, info, warn};

use crate::ClientResult;
use crate::config::{ConfigLoadOptions, ConfigOverrides, load_config};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{AnalyzeData, StatementSource};
use crate::pipeline::{PipelineReport, run_pipeline};
use crate::statement::load_transactions;

#[derive(Debug, Default)]
pub struct AnalyzeRunOptions<'a> {
    pub path: Option<String>,
    pub config_path: Option<&'a Path>,
    pub home_override: Option<&'a Path>,
    pub stdin_override: Option<String>,
    pub overrides: ConfigOverrides,
}

pub fn run(
    path: Option<String>,
    config_path: Option<&Path>,
    overrides: ConfigOverrides,
) -> ClientResult<SuccessEnvelope> {
    run_with_options(AnalyzeRunOptions {
        path,
        config_path,
        overrides,
        ..AnalyzeRunOptions::default()
    })
}

#[doc(hidden)]
pub fn run_with_options(options: AnalyzeRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let loaded = load_config(&ConfigLoadOptions {
        config_path: options.config_path,
        home_override: options.home_override,
        overrides: options.overrides,
    })?;
    let statement = load_transactions(options.path, options.stdin_override)?;
    debug!(
        format = ?statement.format,
        source = ?statement.source_kind,
        records = statement.transactions.len(),
        "statement loaded"
    );

    let report = run_pipeline(&statement.transactions, &loaded.config);
    log_report(&report);

    let data = AnalyzeData {
        source: StatementSource {
            kind: statement.source_kind,
            path: statement.source_path,
            format: statement.format,
        },
        config: loaded.config,
        report,
    };

    success("analyze", data)
}

fn log_report(report: &PipelineReport) {
    for rejection in &report.normalization.rejections {
        let reasons = rejection
            .reasons
            .iter()
            .map(|reason| reason.as_str())
            .collect::<Vec<&str>>()
            .join(",");
        debug!(index = rejection.index, reasons = %reasons, "record rejected");
    }

    let bounds = &report.unusual_amounts.bounds;
    debug!(
        estimator = bounds.estimator.as_str(),
        center = bounds.center,
        spread = bounds.spread,
        lower = bounds.lower,
        upper = bounds.upper,
        "outlier bounds computed"
    );

    if report.normalization.rows_read > 0 && report.normalization.rows_valid == 0 {
        warn!(
            rows_read = report.normalization.rows_read,
            "every record was rejected during normalization"
        );
    }

    info!(
        rows_read = report.normalization.rows_read,
        rows_valid = report.normalization.rows_valid,
        rows_rejected = report.normalization.rows_rejected,
        unusual = report.unusual_amounts.rows.len(),
        low_balance = report.low_balances.rows.len(),
        high_expenditure_days = report.high_expenditure.days.len(),
        "analysis complete"
    );
}
