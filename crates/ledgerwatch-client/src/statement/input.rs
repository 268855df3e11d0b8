use std::fs;
use std::io::{IsTerminal, Read};

use serde::Serialize;

use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    File,
    Stdin,
}

#[derive(Debug, Clone)]
pub(crate) struct ResolvedSource {
    pub(crate) kind: SourceKind,
    pub(crate) path: Option<String>,
    pub(crate) content: String,
}

/// Picks exactly one of a file path or piped stdin. `-` forces stdin.
pub(crate) fn resolve_source(
    path: Option<String>,
    stdin_override: Option<String>,
) -> ClientResult<ResolvedSource> {
    let stdin_body = read_stdin(stdin_override)?.filter(|body| !body.trim().is_empty());

    match path {
        Some(value) if value == "-" => match stdin_body {
            Some(content) => Ok(ResolvedSource {
                kind: SourceKind::Stdin,
                path: None,
                content,
            }),
            None => Err(ClientError::invalid_argument_with_recovery(
                "Path `-` means stdin input, but stdin was empty.",
                vec![
                    "Pipe a statement into the command or pass a file path.".to_string(),
                    "Example: cat statement.json | ledgerwatch analyze -".to_string(),
                ],
            )),
        },
        Some(value) => {
            if stdin_body.is_some() {
                return Err(ClientError::invalid_argument_with_recovery(
                    "Both stdin and a file path were provided.",
                    vec![
                        "Pass exactly one source: either a file path or piped stdin.".to_string(),
                    ],
                ));
            }
            let content = fs::read_to_string(&value)
                .map_err(|error| ClientError::statement_read_failed(&value, &error.to_string()))?;
            Ok(ResolvedSource {
                kind: SourceKind::File,
                path: Some(value),
                content,
            })
        }
        None => match stdin_body {
            Some(content) => Ok(ResolvedSource {
                kind: SourceKind::Stdin,
                path: None,
                content,
            }),
            None => Err(ClientError::invalid_argument_with_recovery(
                "No statement provided.",
                vec![
                    "Pass a file path: ledgerwatch analyze statement.json".to_string(),
                    "Or pipe input: cat statement.json | ledgerwatch analyze".to_string(),
                ],
            )),
        },
    }
}

fn read_stdin(stdin_override: Option<String>) -> ClientResult<Option<String>> {
    if let Some(value) = stdin_override {
        return Ok(Some(value));
    }

    if std::io::stdin().is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|error| ClientError::statement_read_failed("stdin", &error.to_string()))?;
    Ok(Some(buffer))
}
