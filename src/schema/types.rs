use serde::Serialize;
use sqlparser::ast::ReferentialAction;

use super::type_map::GenericType;
use crate::naming::{singularize, to_camel_case};
use crate::relations::{infer_relations, Relation};
use crate::validator::{validate_schema, SchemaIssue};

/// Column names treated as audit fields rather than business data.
const AUDIT_COLUMNS: [&str; 3] = ["created_at", "updated_at", "deleted_at"];

/// Referential action attached to a foreign key's `ON DELETE` / `ON UPDATE` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ForeignKeyAction {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl From<ReferentialAction> for ForeignKeyAction {
    fn from(action: ReferentialAction) -> Self {
        match action {
            ReferentialAction::NoAction => ForeignKeyAction::NoAction,
            ReferentialAction::Restrict => ForeignKeyAction::Restrict,
            ReferentialAction::Cascade => ForeignKeyAction::Cascade,
            ReferentialAction::SetNull => ForeignKeyAction::SetNull,
            ReferentialAction::SetDefault => ForeignKeyAction::SetDefault,
        }
    }
}

impl std::fmt::Display for ForeignKeyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForeignKeyAction::NoAction => write!(f, "NO ACTION"),
            ForeignKeyAction::Restrict => write!(f, "RESTRICT"),
            ForeignKeyAction::Cascade => write!(f, "CASCADE"),
            ForeignKeyAction::SetNull => write!(f, "SET NULL"),
            ForeignKeyAction::SetDefault => write!(f, "SET DEFAULT"),
        }
    }
}

/// Index access method from a `CREATE INDEX ... USING <method>` clause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum IndexMethod {
    #[default]
    Btree,
    Gin,
    Gist,
    Hash,
    Brin,
}

impl IndexMethod {
    /// Case-insensitive parse; unrecognized methods fall back to BTREE.
    pub fn parse(method: &str) -> IndexMethod {
        match method.to_ascii_uppercase().as_str() {
            "GIN" => IndexMethod::Gin,
            "GIST" => IndexMethod::Gist,
            "HASH" => IndexMethod::Hash,
            "BRIN" => IndexMethod::Brin,
            _ => IndexMethod::Btree,
        }
    }
}

impl std::fmt::Display for IndexMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexMethod::Btree => write!(f, "BTREE"),
            IndexMethod::Gin => write!(f, "GIN"),
            IndexMethod::Gist => write!(f, "GIST"),
            IndexMethod::Hash => write!(f, "HASH"),
            IndexMethod::Brin => write!(f, "BRIN"),
        }
    }
}

/// A single column of a parsed table.
#[derive(Debug, Clone, Serialize)]
pub struct SqlColumn {
    pub name: String,
    /// Raw SQL type as written in the DDL (e.g. `VARCHAR(255)`, `NUMERIC(10,2)`).
    pub sql_type: String,
    /// Language-neutral mapped type consumed by the generators.
    pub generic_type: GenericType,
    pub nullable: bool,
    pub length: Option<u64>,
    pub precision: Option<u64>,
    pub scale: Option<u64>,
    pub primary_key: bool,
    pub unique: bool,
    pub auto_increment: bool,
    /// Default expression text, if any (first default wins).
    pub default: Option<String>,
}

/// A normalized foreign key, regardless of whether it was declared inline,
/// as a table-level constraint, or via `ALTER TABLE ... ADD CONSTRAINT`.
#[derive(Debug, Clone, Serialize)]
pub struct SqlForeignKey {
    pub column: String,
    pub referenced_table: String,
    pub referenced_column: String,
    pub on_delete: Option<ForeignKeyAction>,
    pub on_update: Option<ForeignKeyAction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SqlIndex {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub unique: bool,
    pub method: IndexMethod,
}

/// Parameter passing mode of a function/procedure argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ParamMode {
    #[default]
    In,
    Out,
    InOut,
}

impl std::fmt::Display for ParamMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamMode::In => write!(f, "IN"),
            ParamMode::Out => write!(f, "OUT"),
            ParamMode::InOut => write!(f, "INOUT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FunctionKind {
    Function,
    Procedure,
}

#[derive(Debug, Clone, Serialize)]
pub struct SqlFunctionParam {
    pub mode: ParamMode,
    /// `None` for unnamed parameters such as `greet(text)`.
    pub name: Option<String>,
    pub sql_type: String,
    pub generic_type: GenericType,
}

/// A function or procedure pulled out of the raw DDL by the regex pass.
#[derive(Debug, Clone, Serialize)]
pub struct SqlFunction {
    pub name: String,
    pub kind: FunctionKind,
    pub params: Vec<SqlFunctionParam>,
    pub return_type: Option<String>,
    pub return_generic: Option<GenericType>,
    pub language: Option<String>,
    pub body: String,
}

/// A parsed table with its columns, constraints, and attached indexes.
#[derive(Debug, Clone, Serialize)]
pub struct SqlTable {
    pub name: String,
    /// Schema qualifier if the table was declared as `schema.table`.
    pub schema: Option<String>,
    pub columns: Vec<SqlColumn>,
    pub foreign_keys: Vec<SqlForeignKey>,
    pub indexes: Vec<SqlIndex>,
    /// Authoritative primary-key column list; column flags stay consistent
    /// with this after table-level constraints are processed.
    pub primary_key_columns: Vec<String>,
    /// Table-level UNIQUE constraints (each entry is the column list).
    pub unique_constraints: Vec<Vec<String>>,
    /// CHECK constraint expression texts.
    pub check_constraints: Vec<String>,
}

impl SqlTable {
    /// CamelCase singular entity name, e.g. `student_courses` → `StudentCourse`.
    pub fn entity_name(&self) -> String {
        to_camel_case(&singularize(&self.name.to_ascii_lowercase()))
    }

    /// Lower-cased module name used for generated file/package names.
    pub fn module_name(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    /// Case-insensitive column lookup.
    pub fn column(&self, name: &str) -> Option<&SqlColumn> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Whether `name` is the source column of any foreign key on this table.
    pub fn is_foreign_key_column(&self, name: &str) -> bool {
        self.foreign_keys
            .iter()
            .any(|fk| fk.column.eq_ignore_ascii_case(name))
    }

    /// Columns that require explicit representation in generated DTOs:
    /// everything except primary-key, foreign-key, and audit columns.
    pub fn business_columns(&self) -> Vec<&SqlColumn> {
        self.columns
            .iter()
            .filter(|c| {
                !c.primary_key
                    && !self.is_foreign_key_column(&c.name)
                    && !AUDIT_COLUMNS.contains(&c.name.to_ascii_lowercase().as_str())
            })
            .collect()
    }

    /// A pure junction table carries exactly two foreign keys and nothing
    /// a generated entity would need a field for.
    pub fn is_junction_table(&self) -> bool {
        self.foreign_keys.len() == 2
            && !self.foreign_keys[0]
                .column
                .eq_ignore_ascii_case(&self.foreign_keys[1].column)
            && self.business_columns().is_empty()
    }
}

/// Whole-file parse result. Built once per input and never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SqlSchema {
    /// Label of the input the schema was parsed from (file name or caller-supplied).
    pub source: String,
    pub tables: Vec<SqlTable>,
    pub functions: Vec<SqlFunction>,
    /// `CREATE INDEX` statements whose table is not part of this schema.
    pub standalone_indexes: Vec<SqlIndex>,
    /// Non-fatal parse problems, in encounter order.
    pub warnings: Vec<String>,
}

impl SqlSchema {
    /// Case-insensitive table lookup.
    pub fn table(&self, name: &str) -> Option<&SqlTable> {
        self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Tables that map to generated entities (junction tables excluded).
    pub fn entity_tables(&self) -> Vec<&SqlTable> {
        self.tables.iter().filter(|t| !t.is_junction_table()).collect()
    }

    pub fn junction_tables(&self) -> Vec<&SqlTable> {
        self.tables.iter().filter(|t| t.is_junction_table()).collect()
    }

    /// Derive the relationship view (one-to-one, one-to-many, many-to-many).
    pub fn relations(&self) -> Vec<Relation> {
        infer_relations(self)
    }

    /// Check the parsed schema for issues a generator run would trip over.
    pub fn validate(&self) -> Vec<SchemaIssue> {
        validate_schema(self)
    }
}
