use serde::{Deserialize, Serialize};
use std::fmt;

/// Expected index on a table.
///
/// Names are derived deterministically from table + column + purpose, so
/// reruns of the generator are idempotent. A column may appear in several
/// entries when it matches several inference rules; no deduplication is
/// performed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Index name is unique within the schema.
    pub name: String,

    pub fields: Vec<String>,

    /// When `true`, indexed entries are unique.
    pub unique: bool,

    pub kind: IndexKind,
}

/// Storage-engine index kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    BTree,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BTree => f.write_str("btree"),
        }
    }
}
