use std::io;

use serde_json::Value;

use super::format::{self, Align, Column};

const TRANSACTION_COLUMNS: [Column<'static>; 5] = [
    Column {
        name: "Row",
        align: Align::Right,
    },
    Column {
        name: "Date",
        align: Align::Left,
    },
    Column {
        name: "Type",
        align: Align::Left,
    },
    Column {
        name: "Amount",
        align: Align::Right,
    },
    Column {
        name: "Balance",
        align: Align::Right,
    },
];

pub fn render_analyze(data: &Value) -> io::Result<String> {
    let normalization = data
        .get("normalization")
        .ok_or_else(|| io::Error::other("analyze output requires a normalization summary"))?;

    let rows_read = number(normalization, "rows_read") as u64;
    let mut lines = vec![
        format!(
            "Analyzed {rows_read} {} from {}.",
            plural(rows_read, "transaction", "transactions"),
            source_label(data.get("source"))
        ),
        String::new(),
    ];
    lines.extend(format::key_value_rows(
        &[
            ("Valid", format!("{}", number(normalization, "rows_valid") as u64)),
            (
                "Rejected",
                format!("{}", number(normalization, "rows_rejected") as u64),
            ),
        ],
        2,
    ));

    lines.push(String::new());
    lines.extend(render_unusual_amounts(data.get("unusual_amounts")));
    lines.push(String::new());
    lines.extend(render_low_balances(data.get("low_balances")));
    lines.push(String::new());
    lines.extend(render_high_expenditure(data.get("high_expenditure")));

    let rejections = array(normalization, "rejections");
    if !rejections.is_empty() {
        lines.push(String::new());
        lines.extend(render_rejections(rejections));
    }

    Ok(lines.join("\n"))
}

fn render_unusual_amounts(section: Option<&Value>) -> Vec<String> {
    let section = section.unwrap_or(&Value::Null);
    let rows = array(section, "rows");
    let mut lines = vec![format!("Unusual amounts ({}):", rows.len())];

    if let Some(bounds) = section.get("bounds") {
        lines.extend(format::key_value_rows(
            &[
                (
                    "Estimator",
                    bounds
                        .get("estimator")
                        .and_then(Value::as_str)
                        .unwrap_or("mean_std")
                        .to_string(),
                ),
                (
                    "Center",
                    format!(
                        "{} (spread {}, k {})",
                        format::format_amount(number(bounds, "center")),
                        format::format_amount(number(bounds, "spread")),
                        number(bounds, "multiplier")
                    ),
                ),
                (
                    "Range",
                    format!(
                        "{} to {}",
                        format::format_amount(number(bounds, "lower")),
                        format::format_amount(number(bounds, "upper"))
                    ),
                ),
            ],
            2,
        ));
        lines.push(String::new());
    }

    lines.extend(transaction_table(rows, "  No amounts outside the range."));
    lines
}

fn render_low_balances(section: Option<&Value>) -> Vec<String> {
    let section = section.unwrap_or(&Value::Null);
    let rows = array(section, "rows");
    let mut lines = vec![format!(
        "Low balances below {} ({}):",
        format::format_amount(number(section, "floor")),
        rows.len()
    )];
    lines.extend(transaction_table(rows, "  No balance fell below the floor."));
    lines
}

fn render_high_expenditure(section: Option<&Value>) -> Vec<String> {
    let section = section.unwrap_or(&Value::Null);
    let days = array(section, "days");
    let kind = section
        .get("transaction_type")
        .and_then(Value::as_str)
        .unwrap_or("DEBIT");
    let mut lines = vec![format!(
        "High {kind} days above {} ({}):",
        format::format_amount(number(section, "ceiling")),
        days.len()
    )];

    if days.is_empty() {
        lines.push("  No day went over the ceiling.".to_string());
        return lines;
    }

    let columns = [
        Column {
            name: "Date",
            align: Align::Left,
        },
        Column {
            name: "Total",
            align: Align::Right,
        },
    ];
    let table_rows = days
        .iter()
        .map(|day| {
            vec![
                text(day, "date"),
                format::format_amount(number(day, "total")),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::render_table(&columns, &table_rows));
    lines
}

fn render_rejections(rejections: &[Value]) -> Vec<String> {
    let mut lines = vec![format!("Rejected records ({}):", rejections.len())];
    let columns = [
        Column {
            name: "Row",
            align: Align::Right,
        },
        Column {
            name: "Reasons",
            align: Align::Left,
        },
    ];
    let table_rows = rejections
        .iter()
        .map(|rejection| {
            let reasons = array(rejection, "reasons")
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<&str>>()
                .join(", ");
            vec![row_index(rejection), reasons]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::render_table(&columns, &table_rows));
    lines.push(String::new());
    lines.push("  Run with LEDGERWATCH_LOG=debug to log each rejection.".to_string());
    lines
}

fn transaction_table(rows: &[Value], empty_message: &str) -> Vec<String> {
    if rows.is_empty() {
        return vec![empty_message.to_string()];
    }

    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                row_index(row),
                text(row, "date"),
                text(row, "type"),
                format::format_amount(number(row, "amount")),
                format::format_amount(number(row, "balance")),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    format::render_table(&TRANSACTION_COLUMNS, &table_rows)
}

fn source_label(source: Option<&Value>) -> String {
    let Some(source) = source else {
        return "unknown source".to_string();
    };
    let format = source
        .get("format")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    match source.get("path").and_then(Value::as_str) {
        Some(path) => format!("{path} ({format})"),
        None => format!("stdin ({format})"),
    }
}

fn row_index(row: &Value) -> String {
    row.get("index")
        .and_then(Value::as_u64)
        .map(|index| index.to_string())
        .unwrap_or_else(|| "?".to_string())
}

fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn number(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn text(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}

fn plural<'a>(count: u64, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
