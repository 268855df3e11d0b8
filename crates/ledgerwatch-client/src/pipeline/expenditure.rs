use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::pipeline::types::{DailyTotal, NormalizedTable, TransactionType};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighExpenditureAlerts {
    pub ceiling: f64,
    pub transaction_type: TransactionType,
    pub days: Vec<DailyTotal>,
}

/// Sums `amount` per calendar date over rows of the selected type, oldest
/// date first. Dates without a matching row are absent, not zero.
pub fn daily_totals(table: &NormalizedTable, selector: &TransactionType) -> Vec<DailyTotal> {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for row in table.iter().filter(|row| &row.transaction_type == selector) {
        *totals.entry(row.date).or_insert(0.0) += row.amount;
    }

    totals
        .into_iter()
        .map(|(date, total)| DailyTotal { date, total })
        .collect()
}

pub fn detect_high_expenditure(
    table: &NormalizedTable,
    selector: &TransactionType,
    ceiling: f64,
) -> HighExpenditureAlerts {
    high_expenditure_from(&daily_totals(table, selector), selector, ceiling)
}

/// Alert set for a series already produced by [`daily_totals`]: the days
/// whose total is strictly above `ceiling`.
pub fn high_expenditure_from(
    series: &[DailyTotal],
    selector: &TransactionType,
    ceiling: f64,
) -> HighExpenditureAlerts {
    HighExpenditureAlerts {
        ceiling,
        transaction_type: selector.clone(),
        days: series
            .iter()
            .filter(|day| day.total > ceiling)
            .copied()
            .collect(),
    }
}
