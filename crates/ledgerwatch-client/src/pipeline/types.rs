use std::fmt;
use std::ops::Deref;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A transaction as handed over by the statement loader. Every field is
/// optional text; nothing has been checked yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTransaction {
    pub amount: Option<String>,
    pub transaction_type: Option<String>,
    pub current_balance: Option<String>,
    pub transaction_timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionType {
    Credit,
    Debit,
    Other(String),
}

impl TransactionType {
    pub fn parse(value: &str) -> Self {
        let canonical = value.trim().to_ascii_uppercase();
        match canonical.as_str() {
            "CREDIT" => Self::Credit,
            "DEBIT" => Self::Debit,
            _ => Self::Other(canonical),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Credit => "CREDIT",
            Self::Debit => "DEBIT",
            Self::Other(value) => value,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TransactionType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TransactionType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTransaction {
    /// Position of the record in the raw input.
    pub index: usize,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub balance: f64,
    pub timestamp: DateTime<FixedOffset>,
    pub date: NaiveDate,
}

/// Ordered, immutable set of normalized rows shared by every detector.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedTable {
    rows: Vec<NormalizedTransaction>,
}

impl NormalizedTable {
    pub fn new(rows: Vec<NormalizedTransaction>) -> Self {
        Self { rows }
    }

    pub fn amounts(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.amount).collect()
    }
}

impl Deref for NormalizedTable {
    type Target = [NormalizedTransaction];

    fn deref(&self) -> &Self::Target {
        &self.rows
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    InvalidAmount,
    InvalidBalance,
    InvalidTimestamp,
}

impl RejectionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidAmount => "invalid_amount",
            Self::InvalidBalance => "invalid_balance",
            Self::InvalidTimestamp => "invalid_timestamp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRecord {
    pub index: usize,
    pub reasons: Vec<RejectionKind>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizationOutcome {
    pub table: NormalizedTable,
    pub rejected: Vec<RejectedRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: f64,
}
