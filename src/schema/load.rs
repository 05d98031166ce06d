use std::path::Path;

use sqlparser::ast::Statement;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use tracing::debug;

use super::build::build_schema;
use super::types::SqlSchema;
use crate::functions::{extract_functions, is_routine_statement, mask_function_bodies};

/// Parse a DDL file into a [`SqlSchema`].
///
/// The only fatal failure is an unreadable file; malformed statements inside
/// the file become warnings on the returned schema.
pub fn load_schema(path: impl AsRef<Path>) -> anyhow::Result<SqlSchema> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let source = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("schema.sql");
    Ok(parse_schema(&content, source))
}

/// Parse DDL text into a [`SqlSchema`]. `source` labels the input in
/// diagnostics (typically the file name).
///
/// Routines are extracted by the regex pass first and their `$$` bodies are
/// masked out, so the structural grammar only ever sees declarative SQL.
pub fn parse_schema(sql: &str, source: &str) -> SqlSchema {
    let mut warnings = Vec::new();
    let functions = extract_functions(sql);
    let masked = mask_function_bodies(sql);
    let statements = parse_statements(&masked, &mut warnings);
    build_schema(statements, functions, warnings, source)
}

/// Structural parse of the masked content.
///
/// The whole input is parsed in one batch first; if that fails the content is
/// split on `;` and re-parsed statement by statement so one malformed
/// statement cannot take down the rest of the file. Statements that still
/// fail are recorded as warnings, except routine definitions, which the
/// regex pass already consumed.
fn parse_statements(sql: &str, warnings: &mut Vec<String>) -> Vec<Statement> {
    let dialect = GenericDialect {};
    match Parser::parse_sql(&dialect, sql) {
        Ok(statements) => statements,
        Err(batch_err) => {
            debug!(error = %batch_err, "batch parse failed, retrying statement by statement");
            let mut statements = Vec::new();
            for piece in split_statements(sql) {
                if is_routine_statement(&piece) {
                    continue;
                }
                match Parser::parse_sql(&dialect, &piece) {
                    Ok(mut parsed) => statements.append(&mut parsed),
                    Err(err) => {
                        warnings.push(format!(
                            "failed to parse statement `{}`: {err}",
                            snippet(&piece)
                        ));
                    }
                }
            }
            statements
        }
    }
}

fn split_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(str::trim)
        .filter(|piece| !piece.is_empty() && !is_comment_only(piece))
        .map(str::to_string)
        .collect()
}

fn is_comment_only(piece: &str) -> bool {
    piece
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with("--"))
}

/// One-line, length-capped excerpt for warning messages.
fn snippet(statement: &str) -> String {
    let flat = statement.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > 80 {
        let head: String = flat.chars().take(80).collect();
        format!("{head}...")
    } else {
        flat
    }
}
