mod input;
mod parse;

pub use input::SourceKind;
pub use parse::StatementFormat;

use crate::ClientResult;
use crate::pipeline::types::RawTransaction;

#[derive(Debug, Clone)]
pub struct LoadedStatement {
    pub source_kind: SourceKind,
    pub source_path: Option<String>,
    pub format: StatementFormat,
    pub transactions: Vec<RawTransaction>,
}

/// Reads one statement from a file or stdin and extracts its transaction
/// list. Only structural problems fail here; bad field values are left for
/// the normalizer.
pub fn load_transactions(
    path: Option<String>,
    stdin_override: Option<String>,
) -> ClientResult<LoadedStatement> {
    let source = input::resolve_source(path, stdin_override)?;
    let parsed = parse::parse_statement(&source.content)?;
    Ok(LoadedStatement {
        source_kind: source.kind,
        source_path: source.path,
        format: parsed.format,
        transactions: parsed.transactions,
    })
}
