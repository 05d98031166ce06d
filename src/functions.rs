//! # Function/Procedure Extractor
//!
//! `CREATE FUNCTION` / `CREATE PROCEDURE` bodies are written in a procedural
//! language the structural SQL grammar cannot parse, so routines are pulled
//! out of the raw text by a single DOTALL regex *before* the structural pass,
//! and every `$$...$$` body is masked to `''` so the grammar never sees it.
//!
//! Recognized shape:
//!
//! ```sql
//! CREATE [OR REPLACE] FUNCTION|PROCEDURE name(params)
//!     [RETURNS type] [LANGUAGE lang] AS $$ body $$ [LANGUAGE lang]
//! ```
//!
//! Parameters are split on top-level commas with manual parenthesis-depth
//! tracking, so nested type arguments like `numeric(10,2)` never split.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::{map_sql_type, FunctionKind, ParamMode, SqlFunction, SqlFunctionParam};

static ROUTINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)CREATE\s+(?:OR\s+REPLACE\s+)?(FUNCTION|PROCEDURE)\s+([A-Za-z_][A-Za-z0-9_.]*)\s*\((.*?)\)\s*(?:RETURNS\s+(.+?)\s+)?(?:LANGUAGE\s+([A-Za-z_][A-Za-z0-9_]*)\s+)?AS\s*\$\$(.*?)\$\$(?:\s*LANGUAGE\s+([A-Za-z_][A-Za-z0-9_]*))?",
    )
    .expect("routine regex should be valid")
});

static ROUTINE_HEAD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*CREATE\s+(?:OR\s+REPLACE\s+)?(?:FUNCTION|PROCEDURE)\b")
        .expect("routine head regex should be valid")
});

static DOLLAR_BODY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\$\$.*?\$\$").expect("dollar body regex should be valid")
});

/// Extract every function/procedure definition from raw DDL text.
pub fn extract_functions(sql: &str) -> Vec<SqlFunction> {
    ROUTINE_RE
        .captures_iter(sql)
        .filter_map(|caps| {
            let kind = if caps.get(1)?.as_str().eq_ignore_ascii_case("procedure") {
                FunctionKind::Procedure
            } else {
                FunctionKind::Function
            };
            // drop any schema qualifier, mirroring table resolution
            let name = caps
                .get(2)?
                .as_str()
                .rsplit('.')
                .next()
                .unwrap_or_default()
                .to_string();
            let params = parse_params(caps.get(3).map_or("", |m| m.as_str()));
            let return_type = caps.get(4).map(|m| m.as_str().trim().to_string());
            let return_generic = return_type.as_deref().map(map_sql_type);
            let language = caps
                .get(5)
                .or_else(|| caps.get(7))
                .map(|m| m.as_str().to_ascii_lowercase());
            let body = caps.get(6)?.as_str().trim().to_string();
            Some(SqlFunction {
                name,
                kind,
                params,
                return_type,
                return_generic,
                language,
                body,
            })
        })
        .collect()
}

/// Replace every `$$...$$` region with `''` so the structural parser never
/// encounters procedural-language syntax.
pub fn mask_function_bodies(sql: &str) -> String {
    DOLLAR_BODY_RE.replace_all(sql, "''").into_owned()
}

/// Whether a statement is a routine definition already consumed by
/// [`extract_functions`].
pub fn is_routine_statement(statement: &str) -> bool {
    ROUTINE_HEAD_RE.is_match(statement)
}

fn parse_params(raw: &str) -> Vec<SqlFunctionParam> {
    split_top_level(raw)
        .iter()
        .filter_map(|p| parse_param(p))
        .collect()
}

fn parse_param(raw: &str) -> Option<SqlFunctionParam> {
    let mut tokens: Vec<&str> = raw.split_whitespace().collect();
    let mut mode = ParamMode::In;
    if let Some(first) = tokens.first() {
        match first.to_ascii_uppercase().as_str() {
            "IN" => {
                tokens.remove(0);
            }
            "OUT" => {
                mode = ParamMode::Out;
                tokens.remove(0);
            }
            "INOUT" => {
                mode = ParamMode::InOut;
                tokens.remove(0);
            }
            _ => {}
        }
    }
    // only the declared type matters; drop parameter defaults
    if let Some(pos) = tokens
        .iter()
        .position(|t| t.eq_ignore_ascii_case("default") || *t == "=")
    {
        tokens.truncate(pos);
    }
    match tokens.len() {
        0 => None,
        1 => Some(SqlFunctionParam {
            mode,
            name: None,
            sql_type: tokens[0].to_string(),
            generic_type: map_sql_type(tokens[0]),
        }),
        _ => {
            let name = tokens[0].to_string();
            let sql_type = tokens[1..].join(" ");
            Some(SqlFunctionParam {
                mode,
                name: Some(name),
                generic_type: map_sql_type(&sql_type),
                sql_type,
            })
        }
    }
}

/// Split on commas that sit outside any parentheses.
fn split_top_level(raw: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for ch in raw.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                pieces.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        pieces.push(current.trim().to_string());
    }
    pieces.retain(|p| !p.is_empty());
    pieces
}
