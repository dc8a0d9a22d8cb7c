use super::{ConstraintDefinition, FieldDefinition, IndexDefinition, RelationDefinition};

use serde::{Deserialize, Serialize};

/// Expected structure of one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Normalized relational identifier for the declared type.
    pub name: String,

    pub fields: Vec<FieldDefinition>,

    pub indexes: Vec<IndexDefinition>,

    pub constraints: Vec<ConstraintDefinition>,

    pub relations: Vec<RelationDefinition>,
}

impl TableDefinition {
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Columns marked primary, in declaration order.
    pub fn primary_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|field| field.primary)
    }
}
