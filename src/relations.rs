//! Relationship inference over the parsed schema.
//!
//! This is a read-only derived view: a foreign key whose column is also the
//! table's sole primary key or carries a unique constraint implies a
//! one-to-one; any other foreign key is a many-to-one with a mirrored
//! one-to-many on the referenced table; and a pure junction table (two
//! foreign keys, no business columns) collapses into a many-to-many between
//! its two referenced tables.

use serde::Serialize;

use crate::naming::{pluralize, singularize};
use crate::schema::{SqlForeignKey, SqlSchema, SqlTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RelationKind {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationKind::OneToOne => write!(f, "OneToOne"),
            RelationKind::OneToMany => write!(f, "OneToMany"),
            RelationKind::ManyToOne => write!(f, "ManyToOne"),
            RelationKind::ManyToMany => write!(f, "ManyToMany"),
        }
    }
}

/// One directed relationship edge between two tables.
///
/// For `ManyToMany`, `source_column`/`target_column` are the junction table's
/// foreign-key columns pointing at the source and target side respectively,
/// and `junction_table` names the collapsed table.
#[derive(Debug, Clone, Serialize)]
pub struct Relation {
    pub kind: RelationKind,
    pub source_table: String,
    pub source_column: Option<String>,
    pub target_table: String,
    pub target_column: Option<String>,
    pub junction_table: Option<String>,
    /// Field or collection name on the source entity (snake_case; collections
    /// are pluralized from the opposite entity name).
    pub field_name: String,
}

/// Derive every relationship edge in the schema.
pub fn infer_relations(schema: &SqlSchema) -> Vec<Relation> {
    let mut relations = Vec::new();

    for table in schema.entity_tables() {
        for fk in &table.foreign_keys {
            if fk_column_is_unique(table, fk) {
                relations.push(Relation {
                    kind: RelationKind::OneToOne,
                    source_table: table.name.clone(),
                    source_column: Some(fk.column.clone()),
                    target_table: fk.referenced_table.clone(),
                    target_column: Some(fk.referenced_column.clone()),
                    junction_table: None,
                    field_name: singular_field(&fk.referenced_table),
                });
            } else {
                relations.push(Relation {
                    kind: RelationKind::ManyToOne,
                    source_table: table.name.clone(),
                    source_column: Some(fk.column.clone()),
                    target_table: fk.referenced_table.clone(),
                    target_column: Some(fk.referenced_column.clone()),
                    junction_table: None,
                    field_name: singular_field(&fk.referenced_table),
                });
                // the mirrored collection lives on the referenced table, so it
                // needs that table to actually be part of the schema
                if let Some(target) = schema.table(&fk.referenced_table) {
                    relations.push(Relation {
                        kind: RelationKind::OneToMany,
                        source_table: target.name.clone(),
                        source_column: Some(fk.referenced_column.clone()),
                        target_table: table.name.clone(),
                        target_column: Some(fk.column.clone()),
                        junction_table: None,
                        field_name: plural_field(&table.name),
                    });
                }
            }
        }
    }

    for junction in schema.junction_tables() {
        let (left, right) = (&junction.foreign_keys[0], &junction.foreign_keys[1]);
        relations.push(many_to_many(junction, left, right));
        relations.push(many_to_many(junction, right, left));
    }

    relations
}

fn many_to_many(junction: &SqlTable, source: &SqlForeignKey, target: &SqlForeignKey) -> Relation {
    Relation {
        kind: RelationKind::ManyToMany,
        source_table: source.referenced_table.clone(),
        source_column: Some(source.column.clone()),
        target_table: target.referenced_table.clone(),
        target_column: Some(target.column.clone()),
        junction_table: Some(junction.name.clone()),
        field_name: plural_field(&target.referenced_table),
    }
}

/// A foreign key participates in a one-to-one when its column is the table's
/// sole primary key or carries a unique constraint.
fn fk_column_is_unique(table: &SqlTable, fk: &SqlForeignKey) -> bool {
    let sole_primary_key = table.primary_key_columns.len() == 1
        && table.primary_key_columns[0].eq_ignore_ascii_case(&fk.column);
    let unique = table.column(&fk.column).map(|c| c.unique).unwrap_or(false);
    sole_primary_key || unique
}

fn singular_field(table_name: &str) -> String {
    singularize(&table_name.to_ascii_lowercase())
}

fn plural_field(table_name: &str) -> String {
    pluralize(&singularize(&table_name.to_ascii_lowercase()))
}
