pub mod anomalies;
pub mod balance;
pub mod expenditure;
pub mod normalize;
pub mod stats;
#[cfg(test)]
pub(crate) mod testkit;
pub mod types;

use serde::Serialize;

use crate::config::AlertConfig;
use crate::pipeline::anomalies::{UnusualAmountAlerts, detect_unusual_amounts_with};
use crate::pipeline::balance::{LowBalanceAlerts, detect_low_balances};
use crate::pipeline::expenditure::{HighExpenditureAlerts, daily_totals, high_expenditure_from};
use crate::pipeline::normalize::normalize_transactions;
use crate::pipeline::types::{DailyTotal, RawTransaction, RejectedRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizationSummary {
    pub rows_read: usize,
    pub rows_valid: usize,
    pub rows_rejected: usize,
    pub rejections: Vec<RejectedRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub normalization: NormalizationSummary,
    pub unusual_amounts: UnusualAmountAlerts,
    pub low_balances: LowBalanceAlerts,
    pub high_expenditure: HighExpenditureAlerts,
    /// Full pre-ceiling series, kept for chart consumers.
    pub daily_expenditure: Vec<DailyTotal>,
}

/// Normalizes `raw` once, then runs every detector over the same table.
/// Malformed records and empty input shrink the result; they never fail it.
pub fn run_pipeline(raw: &[RawTransaction], config: &AlertConfig) -> PipelineReport {
    let outcome = normalize_transactions(raw);
    let table = &outcome.table;

    let unusual_amounts = detect_unusual_amounts_with(
        table,
        config.outlier_estimator.estimator(),
        config.outlier_std_dev_multiplier,
    );
    let low_balances = detect_low_balances(table, config.low_balance_threshold);
    let daily_expenditure = daily_totals(table, &config.expenditure_type);
    let high_expenditure = high_expenditure_from(
        &daily_expenditure,
        &config.expenditure_type,
        config.high_expenditure_threshold,
    );

    PipelineReport {
        normalization: NormalizationSummary {
            rows_read: raw.len(),
            rows_valid: table.len(),
            rows_rejected: outcome.rejected.len(),
            rejections: outcome.rejected,
        },
        unusual_amounts,
        low_balances,
        high_expenditure,
        daily_expenditure,
    }
}
