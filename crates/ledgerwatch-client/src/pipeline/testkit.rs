use chrono::{Duration, FixedOffset, NaiveDate, TimeZone};

use crate::pipeline::types::{NormalizedTable, NormalizedTransaction, TransactionType};

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

pub(crate) fn row(
    index: usize,
    amount: f64,
    transaction_type: TransactionType,
    balance: f64,
    timestamp: &str,
) -> NormalizedTransaction {
    let parsed = crate::pipeline::normalize::parse_timestamp(Some(timestamp));
    assert!(parsed.is_some(), "fixture timestamp `{timestamp}` must parse");
    let timestamp = parsed.unwrap_or_default();
    NormalizedTransaction {
        index,
        amount,
        transaction_type,
        balance,
        date: timestamp.date_naive(),
        timestamp,
    }
}

/// One debit per day starting 2024-01-01, balance well above any floor.
pub(crate) fn table_of_amounts(amounts: &[f64]) -> NormalizedTable {
    let start = FixedOffset::east_opt(0)
        .and_then(|offset| offset.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).single());
    assert!(start.is_some());
    let start = start.unwrap_or_default();

    let rows = amounts
        .iter()
        .enumerate()
        .map(|(index, amount)| {
            let timestamp = start + Duration::days(index as i64);
            NormalizedTransaction {
                index,
                amount: *amount,
                transaction_type: TransactionType::Debit,
                balance: 20_000.0,
                date: timestamp.date_naive(),
                timestamp,
            }
        })
        .collect();
    NormalizedTable::new(rows)
}
