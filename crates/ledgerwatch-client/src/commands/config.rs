use std::path::Path;

use crate::ClientResult;
use crate::config::{ConfigLoadOptions, ConfigOverrides, load_config};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::ConfigShowData;

#[derive(Debug, Default)]
pub struct ConfigShowOptions<'a> {
    pub config_path: Option<&'a Path>,
    pub home_override: Option<&'a Path>,
    pub overrides: ConfigOverrides,
}

pub fn show(config_path: Option<&Path>) -> ClientResult<SuccessEnvelope> {
    show_with_options(ConfigShowOptions {
        config_path,
        ..ConfigShowOptions::default()
    })
}

#[doc(hidden)]
pub fn show_with_options(options: ConfigShowOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let loaded = load_config(&ConfigLoadOptions {
        config_path: options.config_path,
        home_override: options.home_override,
        overrides: options.overrides,
    })?;

    success(
        "config show",
        ConfigShowData {
            config_path: loaded
                .config_path
                .as_ref()
                .map(|path| path.display().to_string()),
            config: loaded.config,
        },
    )
}
