use std::io;

use serde_json::Value;

use super::format;

const FIELDS: [(&str, &str); 5] = [
    ("lowBalanceThreshold", "Low balance threshold"),
    ("highExpenditureThreshold", "High expenditure threshold"),
    ("outlierStdDevMultiplier", "Outlier multiplier"),
    ("outlierEstimator", "Outlier estimator"),
    ("expenditureType", "Expenditure type"),
];

pub fn render_config_show(data: &Value) -> io::Result<String> {
    let config = data
        .get("config")
        .and_then(Value::as_object)
        .ok_or_else(|| io::Error::other("config show output requires a config object"))?;

    let source = match data.get("config_path").and_then(Value::as_str) {
        Some(path) => format!("Effective configuration (file: {path})"),
        None => "Effective configuration (no config file, defaults and environment only)"
            .to_string(),
    };

    let entries = FIELDS
        .iter()
        .map(|(key, label)| (*label, display_value(config.get(*key))))
        .collect::<Vec<(&str, String)>>();

    let mut lines = vec![source, String::new()];
    lines.extend(format::key_value_rows(&entries, 2));
    Ok(lines.join("\n"))
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(other) => other.to_string(),
        None => "unset".to_string(),
    }
}
