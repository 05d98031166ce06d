//! # Schema Validator
//!
//! Checks a parsed [`SqlSchema`](crate::schema::SqlSchema) for problems a
//! generator run would trip over.
//!
//! ## Checks Performed
//!
//! 1. **Dangling foreign keys** - Every FK must reference a known table and column
//! 2. **Missing primary keys** - Entity tables should declare a primary key
//! 3. **Duplicate tables** - The same table name declared twice
//! 4. **Orphan indexes** - `CREATE INDEX` on a table the schema does not contain
//! 5. **Unmapped column types** - Columns whose SQL type fell back to `Object`
//!
//! Issues are plain data for the caller to log or display; nothing here
//! aborts the parse.

use std::collections::HashSet;

use serde::Serialize;

use crate::schema::{GenericType, SqlSchema};

/// Severity level for schema issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IssueSeverity {
    /// Error - Generated code would not compile or would misbehave
    Error,
    /// Warning - May cause issues but won't block generation
    Warning,
    /// Info - Worth a look, generation is unaffected
    Info,
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueSeverity::Error => write!(f, "Error"),
            IssueSeverity::Warning => write!(f, "Warning"),
            IssueSeverity::Info => write!(f, "Info"),
        }
    }
}

/// A validation issue found in a parsed schema
#[derive(Debug, Clone, Serialize)]
pub struct SchemaIssue {
    /// Where the issue occurred (e.g. `table:orders`, `table:orders.user_id`)
    pub location: String,
    pub severity: IssueSeverity,
    /// Type of issue (e.g. `dangling_fk_table`, `missing_primary_key`)
    pub kind: String,
    /// Human-readable description of the problem
    pub message: String,
    /// Optional suggestion for how to fix it
    pub suggestion: Option<String>,
}

impl SchemaIssue {
    pub fn new(
        location: impl Into<String>,
        severity: IssueSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        SchemaIssue {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Validate a parsed schema and return every issue found.
pub fn validate_schema(schema: &SqlSchema) -> Vec<SchemaIssue> {
    let mut issues = Vec::new();

    let mut seen = HashSet::new();
    for table in &schema.tables {
        if !seen.insert(table.name.to_ascii_lowercase()) {
            issues.push(SchemaIssue::new(
                format!("table:{}", table.name),
                IssueSeverity::Warning,
                "duplicate_table",
                format!("Table '{}' is declared more than once", table.name),
            ));
        }
    }

    for table in &schema.tables {
        if table.primary_key_columns.is_empty() && !table.is_junction_table() {
            issues.push(
                SchemaIssue::new(
                    format!("table:{}", table.name),
                    IssueSeverity::Warning,
                    "missing_primary_key",
                    format!("Table '{}' has no primary key", table.name),
                )
                .with_suggestion("Add a PRIMARY KEY column or table constraint"),
            );
        }

        for fk in &table.foreign_keys {
            let location = format!("table:{}.{}", table.name, fk.column);
            match schema.table(&fk.referenced_table) {
                None => {
                    issues.push(
                        SchemaIssue::new(
                            &location,
                            IssueSeverity::Error,
                            "dangling_fk_table",
                            format!(
                                "Foreign key references unknown table '{}'",
                                fk.referenced_table
                            ),
                        )
                        .with_suggestion(format!(
                            "Declare table '{}' or remove the reference",
                            fk.referenced_table
                        )),
                    );
                }
                Some(target) => {
                    if target.column(&fk.referenced_column).is_none() {
                        issues.push(SchemaIssue::new(
                            &location,
                            IssueSeverity::Error,
                            "dangling_fk_column",
                            format!(
                                "Foreign key references unknown column '{}.{}'",
                                fk.referenced_table, fk.referenced_column
                            ),
                        ));
                    }
                }
            }
        }

        for column in &table.columns {
            if column.generic_type == GenericType::Object {
                issues.push(SchemaIssue::new(
                    format!("table:{}.{}", table.name, column.name),
                    IssueSeverity::Info,
                    "unmapped_column_type",
                    format!(
                        "Column type '{}' has no generic mapping and falls back to Object",
                        column.sql_type
                    ),
                ));
            }
        }
    }

    for index in &schema.standalone_indexes {
        issues.push(SchemaIssue::new(
            format!("index:{}", index.name),
            IssueSeverity::Warning,
            "index_unknown_table",
            format!("Index '{}' targets unknown table '{}'", index.name, index.table),
        ));
    }

    issues
}

/// Print issues grouped by severity.
pub fn print_issues(issues: &[SchemaIssue]) {
    if issues.is_empty() {
        println!("✅ No schema issues found!");
        return;
    }

    let errors: Vec<_> = issues
        .iter()
        .filter(|i| i.severity == IssueSeverity::Error)
        .collect();
    let warnings: Vec<_> = issues
        .iter()
        .filter(|i| i.severity == IssueSeverity::Warning)
        .collect();
    let infos: Vec<_> = issues
        .iter()
        .filter(|i| i.severity == IssueSeverity::Info)
        .collect();

    println!(
        "\n📋 Schema validation: {} error(s), {} warning(s), {} info(s)\n",
        errors.len(),
        warnings.len(),
        infos.len()
    );

    for (header, group) in [
        ("❌ Errors (must fix):", &errors),
        ("⚠️  Warnings (should fix):", &warnings),
        ("ℹ️  Info:", &infos),
    ] {
        if group.is_empty() {
            continue;
        }
        println!("{header}");
        for issue in group.iter() {
            println!("   [{}] {}", issue.kind, issue.location);
            println!("      {}", issue.message);
            if let Some(suggestion) = &issue.suggestion {
                println!("      💡 Suggestion: {suggestion}");
            }
        }
        println!();
    }
}

/// Exit with an error code if any error-level issues are present.
pub fn fail_if_errors(issues: &[SchemaIssue]) {
    if issues.iter().any(|i| i.severity == IssueSeverity::Error) {
        print_issues(issues);
        std::process::exit(1);
    }
}
