use serde::{Deserialize, Serialize};
use std::fmt;

/// One enforced rule on a table.
///
/// Multiple unique columns yield multiple single-column unique
/// constraints; no composite-unique inference is performed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintDefinition {
    pub name: String,

    pub kind: ConstraintKind,

    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    PrimaryKey,
    Unique,
    NotNull,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrimaryKey => f.write_str("primary_key"),
            Self::Unique => f.write_str("unique"),
            Self::NotNull => f.write_str("not_null"),
        }
    }
}
