use serde::Serialize;

use crate::config::AlertConfig;
use crate::pipeline::PipelineReport;
use crate::statement::{SourceKind, StatementFormat};

#[derive(Debug, Clone, Serialize)]
pub struct StatementSource {
    pub kind: SourceKind,
    pub path: Option<String>,
    pub format: StatementFormat,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeData {
    pub source: StatementSource,
    pub config: AlertConfig,
    #[serde(flatten)]
    pub report: PipelineReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigShowData {
    pub config_path: Option<String>,
    pub config: AlertConfig,
}
