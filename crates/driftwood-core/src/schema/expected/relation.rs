use serde::{Deserialize, Serialize};

/// An inferred inter-table relation.
///
/// Emitted only when the pluralized target of a foreign-key-shaped column
/// exists among the tables generated in the same batch; relation inference
/// therefore depends on the full table set, not on one table alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationDefinition {
    pub name: String,

    pub kind: RelationKind,

    pub target_table: String,

    pub source_field: String,

    /// Always the target table's `id` column.
    pub target_field: String,

    /// Always `false`; deletes are never cascaded by inference.
    pub cascade_delete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationKind {
    ManyToOne,
}
