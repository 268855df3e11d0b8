use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::pipeline::stats::EstimatorKind;
use crate::pipeline::types::TransactionType;
use crate::{ClientError, ClientResult};

pub const DEFAULT_LOW_BALANCE_THRESHOLD: f64 = 1000.0;
pub const DEFAULT_HIGH_EXPENDITURE_THRESHOLD: f64 = 5000.0;
pub const DEFAULT_OUTLIER_STD_DEV_MULTIPLIER: f64 = 3.0;

pub const HOME_ENV: &str = "LEDGERWATCH_HOME";
pub const LOW_BALANCE_ENV: &str = "LEDGERWATCH_LOW_BALANCE_THRESHOLD";
pub const HIGH_EXPENDITURE_ENV: &str = "LEDGERWATCH_HIGH_EXPENDITURE_THRESHOLD";
pub const OUTLIER_MULTIPLIER_ENV: &str = "LEDGERWATCH_OUTLIER_MULTIPLIER";

const CONFIG_FILE_NAME: &str = "config.json";

/// Detector thresholds. Keys mirror the bank-export naming so a config file
/// reads `{"lowBalanceThreshold": 500}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AlertConfig {
    pub low_balance_threshold: f64,
    pub high_expenditure_threshold: f64,
    pub outlier_std_dev_multiplier: f64,
    pub outlier_estimator: EstimatorKind,
    pub expenditure_type: TransactionType,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            low_balance_threshold: DEFAULT_LOW_BALANCE_THRESHOLD,
            high_expenditure_threshold: DEFAULT_HIGH_EXPENDITURE_THRESHOLD,
            outlier_std_dev_multiplier: DEFAULT_OUTLIER_STD_DEV_MULTIPLIER,
            outlier_estimator: EstimatorKind::MeanStd,
            expenditure_type: TransactionType::Debit,
        }
    }
}

impl AlertConfig {
    pub fn validate(&self) -> ClientResult<()> {
        require_finite("lowBalanceThreshold", self.low_balance_threshold)?;
        require_finite("highExpenditureThreshold", self.high_expenditure_threshold)?;
        require_finite("outlierStdDevMultiplier", self.outlier_std_dev_multiplier)?;
        if self.outlier_std_dev_multiplier < 0.0 {
            return Err(ClientError::invalid_config(
                "outlierStdDevMultiplier",
                "must be zero or greater",
            ));
        }
        if self.expenditure_type.as_str().is_empty() {
            return Err(ClientError::invalid_config(
                "expenditureType",
                "must name a transaction type such as DEBIT",
            ));
        }
        Ok(())
    }

    fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(value) = overrides.low_balance_threshold {
            self.low_balance_threshold = value;
        }
        if let Some(value) = overrides.high_expenditure_threshold {
            self.high_expenditure_threshold = value;
        }
        if let Some(value) = overrides.outlier_std_dev_multiplier {
            self.outlier_std_dev_multiplier = value;
        }
        if let Some(value) = overrides.outlier_estimator {
            self.outlier_estimator = value;
        }
        if let Some(value) = overrides.expenditure_type.as_deref() {
            self.expenditure_type = TransactionType::parse(value);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub low_balance_threshold: Option<f64>,
    pub high_expenditure_threshold: Option<f64>,
    pub outlier_std_dev_multiplier: Option<f64>,
    pub outlier_estimator: Option<EstimatorKind>,
    pub expenditure_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: AlertConfig,
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoadOptions<'a> {
    pub config_path: Option<&'a Path>,
    pub home_override: Option<&'a Path>,
    pub overrides: ConfigOverrides,
}

/// Layers defaults, the config file, `LEDGERWATCH_*` variables and explicit
/// overrides, in that order.
pub fn load_config(options: &ConfigLoadOptions<'_>) -> ClientResult<LoadedConfig> {
    load_config_with_env(options, |name| std::env::var(name).ok())
}

pub(crate) fn load_config_with_env<F>(
    options: &ConfigLoadOptions<'_>,
    env_lookup: F,
) -> ClientResult<LoadedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let (mut config, config_path) = match options.config_path {
        Some(path) => (read_config_file(path)?, Some(path.to_path_buf())),
        None => {
            let home = options
                .home_override
                .map(Path::to_path_buf)
                .or_else(|| env_lookup(HOME_ENV).map(PathBuf::from))
                .or_else(|| home::home_dir().map(|path| path.join(".ledgerwatch")));
            match home.map(|path| path.join(CONFIG_FILE_NAME)) {
                Some(path) if path.is_file() => (read_config_file(&path)?, Some(path)),
                _ => (AlertConfig::default(), None),
            }
        }
    };

    config.apply(&overrides_from_env(&env_lookup)?);
    config.apply(&options.overrides);
    config.validate()?;

    Ok(LoadedConfig {
        config,
        config_path,
    })
}

fn read_config_file(path: &Path) -> ClientResult<AlertConfig> {
    let body = fs::read_to_string(path)
        .map_err(|error| ClientError::config_read_failed(path, &error.to_string()))?;
    serde_json::from_str::<AlertConfig>(&body)
        .map_err(|error| ClientError::config_read_failed(path, &error.to_string()))
}

fn overrides_from_env<F>(env_lookup: &F) -> ClientResult<ConfigOverrides>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(ConfigOverrides {
        low_balance_threshold: env_number(env_lookup, LOW_BALANCE_ENV)?,
        high_expenditure_threshold: env_number(env_lookup, HIGH_EXPENDITURE_ENV)?,
        outlier_std_dev_multiplier: env_number(env_lookup, OUTLIER_MULTIPLIER_ENV)?,
        outlier_estimator: None,
        expenditure_type: None,
    })
}

fn env_number<F>(env_lookup: &F, name: &str) -> ClientResult<Option<f64>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = env_lookup(name) else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    raw.trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ClientError::invalid_config(name, &format!("expected a number; got \"{raw}\"")))
}

fn require_finite(field: &str, value: f64) -> ClientResult<()> {
    if value.is_finite() {
        return Ok(());
    }
    Err(ClientError::invalid_config(field, "must be a finite number"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use tempfile::TempDir;

    use super::{
        AlertConfig, ConfigLoadOptions, ConfigOverrides, HIGH_EXPENDITURE_ENV, LOW_BALANCE_ENV,
        load_config_with_env,
    };
    use crate::pipeline::stats::EstimatorKind;
    use crate::pipeline::types::TransactionType;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<String, String>>();
        move |name| values.get(name).cloned()
    }

    #[test]
    fn defaults_match_the_documented_thresholds() {
        let config = AlertConfig::default();
        assert_eq!(config.low_balance_threshold, 1000.0);
        assert_eq!(config.high_expenditure_threshold, 5000.0);
        assert_eq!(config.outlier_std_dev_multiplier, 3.0);
        assert_eq!(config.outlier_estimator, EstimatorKind::MeanStd);
        assert_eq!(config.expenditure_type, TransactionType::Debit);
    }

    #[test]
    fn empty_home_falls_back_to_defaults() {
        let dir = TempDir::new();
        assert!(dir.is_ok());
        if let Ok(home) = dir {
            let loaded = load_config_with_env(
                &ConfigLoadOptions {
                    home_override: Some(home.path()),
                    ..ConfigLoadOptions::default()
                },
                env_from(&[]),
            );
            assert!(loaded.is_ok());
            if let Ok(value) = loaded {
                assert_eq!(value.config, AlertConfig::default());
                assert!(value.config_path.is_none());
            }
        }
    }

    #[test]
    fn file_then_env_then_flags_take_precedence() {
        let dir = TempDir::new();
        assert!(dir.is_ok());
        if let Ok(home) = dir {
            let written = fs::write(
                home.path().join("config.json"),
                r#"{"lowBalanceThreshold": 250, "highExpenditureThreshold": 900, "outlierEstimator": "median_mad", "expenditureType": "debit"}"#,
            );
            assert!(written.is_ok());

            let loaded = load_config_with_env(
                &ConfigLoadOptions {
                    home_override: Some(home.path()),
                    overrides: ConfigOverrides {
                        low_balance_threshold: Some(75.0),
                        ..ConfigOverrides::default()
                    },
                    ..ConfigLoadOptions::default()
                },
                env_from(&[(LOW_BALANCE_ENV, "500"), (HIGH_EXPENDITURE_ENV, "1200")]),
            );
            assert!(loaded.is_ok());
            if let Ok(value) = loaded {
                assert_eq!(value.config.low_balance_threshold, 75.0);
                assert_eq!(value.config.high_expenditure_threshold, 1200.0);
                assert_eq!(value.config.outlier_std_dev_multiplier, 3.0);
                assert_eq!(value.config.outlier_estimator, EstimatorKind::MedianMad);
                assert_eq!(value.config.expenditure_type, TransactionType::Debit);
                assert!(value.config_path.is_some());
            }
        }
    }

    #[test]
    fn explicit_missing_config_file_is_an_error() {
        let dir = TempDir::new();
        assert!(dir.is_ok());
        if let Ok(home) = dir {
            let missing = home.path().join("absent.json");
            let loaded = load_config_with_env(
                &ConfigLoadOptions {
                    config_path: Some(&missing),
                    ..ConfigLoadOptions::default()
                },
                env_from(&[]),
            );
            assert!(matches!(loaded, Err(error) if error.code == "config_read_failed"));
        }
    }

    #[test]
    fn unknown_keys_and_bad_values_are_rejected() {
        let dir = TempDir::new();
        assert!(dir.is_ok());
        if let Ok(home) = dir {
            let path = home.path().join("typo.json");
            let written = fs::write(&path, r#"{"lowBalance": 10}"#);
            assert!(written.is_ok());
            let loaded = load_config_with_env(
                &ConfigLoadOptions {
                    config_path: Some(&path),
                    ..ConfigLoadOptions::default()
                },
                env_from(&[]),
            );
            assert!(matches!(loaded, Err(error) if error.code == "config_read_failed"));
        }

        let negative = load_config_with_env(
            &ConfigLoadOptions {
                overrides: ConfigOverrides {
                    outlier_std_dev_multiplier: Some(-1.0),
                    ..ConfigOverrides::default()
                },
                ..ConfigLoadOptions::default()
            },
            env_from(&[(super::HOME_ENV, "/nonexistent/ledgerwatch-home")]),
        );
        assert!(matches!(negative, Err(error) if error.code == "invalid_config"));

        let bad_env = load_config_with_env(
            &ConfigLoadOptions::default(),
            env_from(&[
                (super::HOME_ENV, "/nonexistent/ledgerwatch-home"),
                (LOW_BALANCE_ENV, "plenty"),
            ]),
        );
        assert!(matches!(bad_env, Err(error) if error.code == "invalid_config"));
    }
}
