use ledgerwatch_client::commands::analyze;
use ledgerwatch_client::commands::config;
use ledgerwatch_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands, ConfigCommand};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Analyze {
            path, thresholds, ..
        } => analyze::run(
            path.clone(),
            thresholds.config.as_deref(),
            thresholds.overrides(),
        ),
        Commands::Config { command } => match command {
            ConfigCommand::Show { config: path, .. } => config::show(path.as_deref()),
        },
    }
}
