pub mod commands;
pub mod config;
pub mod contracts;
pub mod error;
pub mod pipeline;
pub mod statement;

pub use config::{AlertConfig, ConfigOverrides};
pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope, failure_from_error};
pub use error::{ClientError, ClientResult};
pub use pipeline::stats::EstimatorKind;

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
