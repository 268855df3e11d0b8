use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::pipeline::types::RawTransaction;
use crate::{ClientError, ClientResult};

pub(crate) const AMOUNT_FIELD: &str = "amount";
pub(crate) const TYPE_FIELD: &str = "type";
pub(crate) const BALANCE_FIELD: &str = "currentBalance";
pub(crate) const TIMESTAMP_FIELD: &str = "transactionTimestamp";

const REQUIRED_FIELDS: [&str; 4] = [AMOUNT_FIELD, TYPE_FIELD, BALANCE_FIELD, TIMESTAMP_FIELD];

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementFormat {
    StatementJson,
    JsonArray,
    Csv,
}

#[derive(Debug, Clone)]
pub(crate) struct ParsedStatement {
    pub(crate) format: StatementFormat,
    pub(crate) transactions: Vec<RawTransaction>,
}

pub(crate) fn parse_statement(content: &str) -> ClientResult<ParsedStatement> {
    let trimmed = content.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Err(ClientError::invalid_statement_format(
            "Statement input is empty.",
            "empty",
        ));
    }

    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return parse_json(trimmed);
    }

    if looks_like_csv(trimmed) {
        return parse_csv(trimmed);
    }

    Err(ClientError::invalid_statement_format(
        "Unsupported statement format. Provide JSON or CSV with a header row.",
        "unknown",
    ))
}

fn parse_json(content: &str) -> ClientResult<ParsedStatement> {
    let parsed = serde_json::from_str::<Value>(content).map_err(|error| {
        ClientError::invalid_statement_format(
            &format!("Statement is not valid JSON: {error}"),
            "invalid_json",
        )
    })?;

    match parsed {
        Value::Array(items) => Ok(ParsedStatement {
            format: StatementFormat::JsonArray,
            transactions: transactions_from_values(&items)?,
        }),
        Value::Object(document) => {
            let Some(listing) = document
                .get("Account")
                .and_then(|account| account.get("Transactions"))
                .and_then(|transactions| transactions.get("Transaction"))
            else {
                return Err(ClientError::invalid_statement_format(
                    "JSON statement has no `Account.Transactions.Transaction` list.",
                    "json_without_transactions",
                ));
            };

            let transactions = match listing {
                Value::Array(items) => transactions_from_values(items)?,
                Value::Object(single) => vec![transaction_from_object(single)],
                Value::Null => Vec::new(),
                _ => {
                    return Err(ClientError::invalid_statement_format(
                        "`Account.Transactions.Transaction` must be a list of transaction objects.",
                        "json_without_transactions",
                    ));
                }
            };

            Ok(ParsedStatement {
                format: StatementFormat::StatementJson,
                transactions,
            })
        }
        _ => Err(ClientError::invalid_statement_format(
            "JSON statement must be an object or an array of transactions.",
            "json_scalar",
        )),
    }
}

fn transactions_from_values(items: &[Value]) -> ClientResult<Vec<RawTransaction>> {
    items
        .iter()
        .map(|item| {
            item.as_object().map(transaction_from_object).ok_or_else(|| {
                ClientError::invalid_statement_format(
                    "Every transaction entry must be a JSON object.",
                    "json_non_object_entry",
                )
            })
        })
        .collect()
}

fn transaction_from_object(object: &Map<String, Value>) -> RawTransaction {
    RawTransaction {
        amount: read_optional_string(object.get(AMOUNT_FIELD)),
        transaction_type: read_optional_string(object.get(TYPE_FIELD)),
        current_balance: read_optional_string(object.get(BALANCE_FIELD)),
        transaction_timestamp: read_optional_string(object.get(TIMESTAMP_FIELD)),
    }
}

fn read_optional_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}

fn parse_csv(content: &str) -> ClientResult<ParsedStatement> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| {
            ClientError::invalid_statement_format(
                "CSV header row is missing or unreadable.",
                "csv",
            )
        })?
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<String>>();

    if REQUIRED_FIELDS
        .iter()
        .any(|required| !headers.iter().any(|header| header == required))
    {
        return Err(ClientError::statement_schema_mismatch(
            REQUIRED_FIELDS.iter().map(|value| value.to_string()).collect(),
            headers,
        ));
    }

    let index_by_name = headers
        .iter()
        .enumerate()
        .map(|(index, name)| (name.clone(), index))
        .collect::<HashMap<String, usize>>();

    let mut transactions = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| {
            ClientError::invalid_statement_format(
                &format!("CSV rows are malformed or not UTF-8: {error}"),
                "csv",
            )
        })?;
        transactions.push(RawTransaction {
            amount: value_for(&record, &index_by_name, AMOUNT_FIELD),
            transaction_type: value_for(&record, &index_by_name, TYPE_FIELD),
            current_balance: value_for(&record, &index_by_name, BALANCE_FIELD),
            transaction_timestamp: value_for(&record, &index_by_name, TIMESTAMP_FIELD),
        });
    }

    Ok(ParsedStatement {
        format: StatementFormat::Csv,
        transactions,
    })
}

fn value_for(
    record: &csv::StringRecord,
    index_by_name: &HashMap<String, usize>,
    field_name: &str,
) -> Option<String> {
    let index = index_by_name.get(field_name)?;
    let value = record.get(*index)?;
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

fn looks_like_csv(content: &str) -> bool {
    content
        .lines()
        .find(|line| !line.trim().is_empty())
        .is_some_and(|line| line.contains(','))
}
