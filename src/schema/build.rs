use sqlparser::ast::{
    AlterTableOperation, CharacterLength, ColumnDef, ColumnOption, CreateIndex, CreateTable,
    DataType, ExactNumberInfo, Ident, ObjectName, ReferentialAction, Statement, TableConstraint,
};
use tracing::{debug, warn};

use super::type_map::map_sql_type;
use super::types::{
    ForeignKeyAction, IndexMethod, SqlColumn, SqlForeignKey, SqlFunction, SqlIndex, SqlSchema,
    SqlTable,
};

/// Assemble the schema model from the structurally parsed statements plus the
/// routines the regex pass already extracted.
///
/// Statements are processed in file order: `ALTER TABLE` and `CREATE INDEX`
/// resolve only against tables declared earlier (append-only single pass).
pub fn build_schema(
    statements: Vec<Statement>,
    functions: Vec<SqlFunction>,
    warnings: Vec<String>,
    source: &str,
) -> SqlSchema {
    let mut schema = SqlSchema {
        source: source.to_string(),
        functions,
        warnings,
        ..SqlSchema::default()
    };
    for statement in statements {
        match statement {
            Statement::CreateTable(create) => {
                let table = build_table(&create);
                debug!(table = %table.name, columns = table.columns.len(), "parsed table");
                schema.tables.push(table);
            }
            Statement::CreateIndex(create) => attach_index(&mut schema, &create),
            Statement::AlterTable {
                name, operations, ..
            } => apply_alter_table(&mut schema, &name, &operations),
            // routines are handled by the regex pass; DML carries no schema content
            _ => {}
        }
    }
    schema
}

fn build_table(create: &CreateTable) -> SqlTable {
    let (schema_name, name) = split_object_name(&create.name);
    let mut columns = Vec::with_capacity(create.columns.len());
    let mut foreign_keys = Vec::new();
    for def in &create.columns {
        let (column, mut inline_fks) = build_column(def);
        columns.push(column);
        foreign_keys.append(&mut inline_fks);
    }

    let mut table = SqlTable {
        name,
        schema: schema_name,
        columns,
        foreign_keys,
        indexes: Vec::new(),
        primary_key_columns: Vec::new(),
        unique_constraints: Vec::new(),
        check_constraints: Vec::new(),
    };

    for constraint in &create.constraints {
        apply_table_constraint(&mut table, constraint);
    }

    // no table-level PRIMARY KEY: the inline flags are authoritative
    if table.primary_key_columns.is_empty() {
        table.primary_key_columns = table
            .columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.clone())
            .collect();
    }

    table
}

fn build_column(def: &ColumnDef) -> (SqlColumn, Vec<SqlForeignKey>) {
    let sql_type = def.data_type.to_string();
    // SERIAL pseudo-types imply NOT NULL and an implicit sequence default
    let serial = matches!(
        sql_type.to_ascii_uppercase().as_str(),
        "SERIAL" | "BIGSERIAL" | "SMALLSERIAL"
    );
    let (length, precision, scale) = extract_type_params(&def.data_type);

    let mut column = SqlColumn {
        name: def.name.value.clone(),
        generic_type: map_sql_type(&sql_type),
        sql_type,
        nullable: !serial,
        length,
        precision,
        scale,
        primary_key: false,
        unique: false,
        auto_increment: serial,
        default: None,
    };

    let mut foreign_keys = Vec::new();
    for opt in &def.options {
        match &opt.option {
            ColumnOption::NotNull => column.nullable = false,
            ColumnOption::Null => column.nullable = true,
            ColumnOption::Default(expr) => {
                if column.default.is_none() {
                    column.default = Some(expr.to_string());
                }
            }
            ColumnOption::Unique { is_primary, .. } => {
                if *is_primary {
                    column.primary_key = true;
                    column.nullable = false;
                } else {
                    column.unique = true;
                }
            }
            ColumnOption::ForeignKey {
                foreign_table,
                referred_columns,
                on_delete,
                on_update,
                ..
            } => {
                foreign_keys.push(SqlForeignKey {
                    column: column.name.clone(),
                    referenced_table: object_name_tail(foreign_table),
                    referenced_column: referenced_column_or_id(referred_columns.first()),
                    on_delete: on_delete.map(ForeignKeyAction::from),
                    on_update: on_update.map(ForeignKeyAction::from),
                });
            }
            ColumnOption::Generated { .. } => column.auto_increment = true,
            other => {
                // MySQL-style AUTO_INCREMENT surfaces as a dialect-specific token
                if other.to_string().to_ascii_uppercase().contains("AUTO_INCREMENT") {
                    column.auto_increment = true;
                }
            }
        }
    }

    (column, foreign_keys)
}

/// Apply a table-level constraint, back-patching column flags where needed.
///
/// A table-level `PRIMARY KEY(...)` is the last writer: it clears every
/// column-level flag and re-derives the primary-key column list.
fn apply_table_constraint(table: &mut SqlTable, constraint: &TableConstraint) {
    match constraint {
        TableConstraint::PrimaryKey { columns, .. } => {
            let names: Vec<String> = columns.iter().map(|c| c.value.clone()).collect();
            for column in &mut table.columns {
                column.primary_key = names.iter().any(|n| n.eq_ignore_ascii_case(&column.name));
                if column.primary_key {
                    column.nullable = false;
                }
            }
            table.primary_key_columns = names;
        }
        TableConstraint::Unique { columns, .. } => {
            let names: Vec<String> = columns.iter().map(|c| c.value.clone()).collect();
            // only a single-column constraint marks the column itself unique
            if let [single] = names.as_slice() {
                if let Some(column) = table
                    .columns
                    .iter_mut()
                    .find(|c| c.name.eq_ignore_ascii_case(single))
                {
                    column.unique = true;
                }
            }
            table.unique_constraints.push(names);
        }
        TableConstraint::ForeignKey {
            columns,
            foreign_table,
            referred_columns,
            on_delete,
            on_update,
            ..
        } => {
            table.foreign_keys.extend(foreign_key_entries(
                columns,
                foreign_table,
                referred_columns,
                *on_delete,
                *on_update,
            ));
        }
        TableConstraint::Check { expr, .. } => table.check_constraints.push(expr.to_string()),
        _ => {}
    }
}

/// Normalize a (possibly composite) FOREIGN KEY clause into per-column entries.
fn foreign_key_entries(
    columns: &[Ident],
    foreign_table: &ObjectName,
    referred_columns: &[Ident],
    on_delete: Option<ReferentialAction>,
    on_update: Option<ReferentialAction>,
) -> Vec<SqlForeignKey> {
    let target = object_name_tail(foreign_table);
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| SqlForeignKey {
            column: column.value.clone(),
            referenced_table: target.clone(),
            referenced_column: referenced_column_or_id(referred_columns.get(i)),
            on_delete: on_delete.map(ForeignKeyAction::from),
            on_update: on_update.map(ForeignKeyAction::from),
        })
        .collect()
}

fn attach_index(schema: &mut SqlSchema, create: &CreateIndex) {
    let table_name = object_name_tail(&create.table_name);
    let columns: Vec<String> = create.columns.iter().map(|c| c.expr.to_string()).collect();
    let name = create
        .name
        .as_ref()
        .map(object_name_tail)
        .unwrap_or_else(|| format!("{}_{}_idx", table_name, columns.join("_")));
    let method = create
        .using
        .as_ref()
        .map(|u| IndexMethod::parse(&u.value))
        .unwrap_or_default();
    let index = SqlIndex {
        name,
        table: table_name.clone(),
        columns,
        unique: create.unique,
        method,
    };

    match schema
        .tables
        .iter_mut()
        .find(|t| t.name.eq_ignore_ascii_case(&table_name))
    {
        Some(table) => table.indexes.push(index),
        None => {
            debug!(index = %index.name, table = %table_name, "index on unknown table kept standalone");
            schema.standalone_indexes.push(index);
        }
    }
}

/// Resolve an `ALTER TABLE` against the tables parsed so far. An ALTER that
/// names a table declared later in the file (or not at all) is recorded as a
/// warning and dropped; resolution is a single forward pass.
fn apply_alter_table(schema: &mut SqlSchema, name: &ObjectName, operations: &[AlterTableOperation]) {
    let table_name = object_name_tail(name);
    let Some(position) = schema
        .tables
        .iter()
        .position(|t| t.name.eq_ignore_ascii_case(&table_name))
    else {
        let message = format!(
            "ALTER TABLE {table_name} references a table not declared earlier in the input; constraint dropped"
        );
        warn!("{message}");
        schema.warnings.push(message);
        return;
    };

    for operation in operations {
        match operation {
            AlterTableOperation::AddConstraint(constraint) => {
                apply_table_constraint(&mut schema.tables[position], constraint);
            }
            other => {
                debug!(table = %table_name, operation = %other, "ignoring ALTER TABLE operation");
            }
        }
    }
}

fn extract_type_params(data_type: &DataType) -> (Option<u64>, Option<u64>, Option<u64>) {
    match data_type {
        DataType::Char(len)
        | DataType::Character(len)
        | DataType::Varchar(len)
        | DataType::CharacterVarying(len)
        | DataType::Nvarchar(len) => {
            let length = len.as_ref().and_then(|l| match l {
                CharacterLength::IntegerLength { length, .. } => Some(*length),
                CharacterLength::Max => None,
            });
            (length, None, None)
        }
        DataType::Decimal(info) | DataType::Numeric(info) => match info {
            ExactNumberInfo::None => (None, None, None),
            ExactNumberInfo::Precision(p) => (None, Some(*p), None),
            ExactNumberInfo::PrecisionAndScale(p, s) => (None, Some(*p), Some(*s)),
        },
        _ => (None, None, None),
    }
}

/// Split `schema.table` into its qualifier and bare name.
fn split_object_name(name: &ObjectName) -> (Option<String>, String) {
    let parts: Vec<String> = name.0.iter().map(|p| p.value.clone()).collect();
    match parts.as_slice() {
        [] => (None, String::new()),
        [only] => (None, only.clone()),
        [qualifiers @ .., last] => (Some(qualifiers.join(".")), last.clone()),
    }
}

/// Bare name of a possibly schema-qualified object.
fn object_name_tail(name: &ObjectName) -> String {
    name.0.last().map(|p| p.value.clone()).unwrap_or_default()
}

/// `REFERENCES t` with no column list points at the target's `id` by convention.
fn referenced_column_or_id(column: Option<&Ident>) -> String {
    column.map(|c| c.value.clone()).unwrap_or_else(|| "id".to_string())
}
