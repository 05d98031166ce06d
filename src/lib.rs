//! # sqlschema
//!
//! **sqlschema** is the schema core of a multi-target CRUD code generator: it
//! parses a PostgreSQL-flavored SQL DDL file into an in-memory model and
//! derives the entity/relationship view the per-target generators consume.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`schema`]** - DDL parsing and the `SqlSchema`/`SqlTable`/`SqlColumn`
//!   model, including the SQL → generic type mapping
//! - **[`functions`]** - Regex-based extraction of `CREATE FUNCTION` /
//!   `CREATE PROCEDURE` definitions whose `$$` bodies the structural grammar
//!   cannot parse
//! - **[`relations`]** - Relationship inference (one-to-one, one-to-many,
//!   many-to-many via junction tables)
//! - **[`validator`]** - Schema validation (dangling foreign keys, missing
//!   primary keys, ...)
//! - **[`naming`]** - Pluralization and case-conversion helpers for derived
//!   entity and field names
//!
//! ## Parsing Flow
//!
//! Parsing is a single synchronous pass over one in-memory string:
//!
//! 1. Routines are pulled out of the raw text by a DOTALL regex and their
//!    `$$...$$` bodies are masked to `''`.
//! 2. The masked content is parsed in one batch by the general-purpose SQL
//!    grammar; on failure the content is split on `;` and re-parsed statement
//!    by statement, recording unparseable statements as warnings.
//! 3. CREATE TABLE / CREATE INDEX / ALTER TABLE nodes are folded into the
//!    model in file order; ALTER statements resolve only against tables
//!    declared earlier.
//!
//! ## Quick Start
//!
//! ```
//! use sqlschema::{parse_schema, RelationKind};
//!
//! let schema = parse_schema(
//!     "CREATE TABLE users(id SERIAL PRIMARY KEY, email TEXT UNIQUE NOT NULL);
//!      CREATE TABLE posts(id SERIAL PRIMARY KEY,
//!                         user_id INT REFERENCES users(id) ON DELETE CASCADE,
//!                         title TEXT NOT NULL);",
//!     "blog.sql",
//! );
//!
//! assert_eq!(schema.tables.len(), 2);
//! assert!(schema.warnings.is_empty());
//! let relations = schema.relations();
//! assert!(relations.iter().any(|r| r.kind == RelationKind::ManyToOne));
//! ```

pub mod functions;
pub mod naming;
pub mod relations;
pub mod schema;
pub mod validator;

pub use relations::{infer_relations, Relation, RelationKind};
pub use schema::{
    load_schema, map_sql_type, parse_schema, ForeignKeyAction, FunctionKind, GenericType,
    IndexMethod, ParamMode, SqlColumn, SqlForeignKey, SqlFunction, SqlFunctionParam, SqlIndex,
    SqlSchema, SqlTable,
};
pub use validator::{validate_schema, IssueSeverity, SchemaIssue};
