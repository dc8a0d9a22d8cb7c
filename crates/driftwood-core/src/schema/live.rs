//! The "is" side of reconciliation: structure read back from the
//! database's own catalog.
//!
//! Structurally analogous to the expected-schema types but sourced from
//! catalog queries, so types are the catalog's normalized names rather
//! than the semantic [`FieldType`](crate::schema::ty::FieldType)
//! vocabulary.

use serde::{Deserialize, Serialize};

/// Actual structure of every base table in the working schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LiveSchema {
    pub tables: Vec<LiveTable>,
}

impl LiveSchema {
    pub fn table(&self, name: &str) -> Option<&LiveTable> {
        self.tables.iter().find(|table| table.name == name)
    }
}

/// Actual structure of one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveTable {
    pub name: String,

    pub fields: Vec<LiveField>,

    /// Secondary indexes; the implicit primary-key index is excluded and
    /// surfaced through `constraints` instead.
    pub indexes: Vec<LiveIndex>,

    pub constraints: Vec<LiveConstraint>,
}

impl LiveTable {
    pub fn field(&self, name: &str) -> Option<&LiveField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn index(&self, name: &str) -> Option<&LiveIndex> {
        self.indexes.iter().find(|index| index.name == name)
    }

    pub fn primary_key(&self) -> Option<&LiveConstraint> {
        self.constraints.iter().find(|c| c.is_primary_key())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveField {
    pub name: String,

    /// Normalized column type (see
    /// [`NativeTypeMap`](crate::schema::ty::NativeTypeMap)).
    pub ty: String,

    pub nullable: bool,

    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveIndex {
    pub name: String,

    /// Member columns in catalog-defined ordinal position.
    pub fields: Vec<String>,

    pub unique: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveConstraint {
    pub name: String,

    /// Catalog constraint type: `PRIMARY KEY`, `UNIQUE`, `FOREIGN KEY`.
    pub kind: String,

    /// Member columns in catalog-defined ordinal position.
    pub fields: Vec<String>,
}

impl LiveConstraint {
    pub fn is_primary_key(&self) -> bool {
        self.kind == "PRIMARY KEY"
    }

    pub fn is_unique(&self) -> bool {
        self.kind == "UNIQUE"
    }
}

/// A catalog-declared foreign key with its referential actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub constraint_name: String,

    pub column: String,

    pub referenced_table: String,

    pub referenced_column: String,

    /// ON DELETE rule: `NO ACTION`, `CASCADE`, `SET NULL`, ...
    pub on_delete: String,

    /// ON UPDATE rule.
    pub on_update: String,
}

/// Per-table size statistics.
///
/// `row_estimate` comes from planner statistics and may be inexact; it is
/// not a live count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStats {
    pub row_estimate: i64,

    pub total_bytes: i64,

    pub table_bytes: i64,

    pub index_bytes: i64,
}
