use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::pipeline::types::{
    NormalizationOutcome, NormalizedTable, NormalizedTransaction, RawTransaction, RejectedRecord,
    RejectionKind, TransactionType,
};

const OFFSET_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Coerces raw records into typed rows. Records failing any coercion are
/// left out of the table and listed in `rejected`; the surviving rows keep
/// their input order.
pub fn normalize_transactions(raw: &[RawTransaction]) -> NormalizationOutcome {
    let mut rows = Vec::with_capacity(raw.len());
    let mut rejected = Vec::new();

    for (index, record) in raw.iter().enumerate() {
        let mut reasons = Vec::new();

        let amount = parse_decimal(record.amount.as_deref());
        if amount.is_none() {
            reasons.push(RejectionKind::InvalidAmount);
        }
        let balance = parse_decimal(record.current_balance.as_deref());
        if balance.is_none() {
            reasons.push(RejectionKind::InvalidBalance);
        }
        let timestamp = parse_timestamp(record.transaction_timestamp.as_deref());
        if timestamp.is_none() {
            reasons.push(RejectionKind::InvalidTimestamp);
        }

        let (Some(amount), Some(balance), Some(timestamp)) = (amount, balance, timestamp) else {
            rejected.push(RejectedRecord { index, reasons });
            continue;
        };

        rows.push(NormalizedTransaction {
            index,
            amount,
            transaction_type: record
                .transaction_type
                .as_deref()
                .map(TransactionType::parse)
                .unwrap_or_else(|| TransactionType::Other(String::new())),
            balance,
            date: timestamp.date_naive(),
            timestamp,
        });
    }

    NormalizationOutcome {
        table: NormalizedTable::new(rows),
        rejected,
    }
}

pub fn parse_decimal(value: Option<&str>) -> Option<f64> {
    let candidate = value?.trim();
    if candidate.is_empty() {
        return None;
    }
    let parsed = candidate.parse::<f64>().ok()?;
    parsed.is_finite().then_some(parsed)
}

/// Reads a timestamp, keeping whatever offset it carries. Values without an
/// offset are pinned to `+00:00` without shifting the wall-clock time.
pub fn parse_timestamp(value: Option<&str>) -> Option<DateTime<FixedOffset>> {
    let candidate = value?.trim();
    if candidate.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(candidate) {
        return Some(parsed);
    }

    for format in OFFSET_DATE_TIME_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(candidate, format) {
            return Some(parsed);
        }
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(candidate, format) {
            return pin_to_zero_offset(parsed);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(candidate, format) {
            return pin_to_zero_offset(parsed.and_time(NaiveTime::MIN));
        }
    }

    None
}

fn pin_to_zero_offset(value: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    let utc = FixedOffset::east_opt(0)?;
    utc.from_local_datetime(&value).single()
}
