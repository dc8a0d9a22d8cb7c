use crate::schema::ty::FieldType;

use serde::{Deserialize, Serialize};

/// Expected structure of one column.
///
/// Invariant: `required == !nullable`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,

    pub ty: FieldType,

    pub required: bool,

    pub nullable: bool,

    /// True only for the literal primary-key naming convention (`id`).
    pub primary: bool,

    pub unique: bool,

    /// SQL default expression, when one is inferred.
    pub default: Option<String>,

    pub length: Option<u32>,

    pub precision: Option<u32>,

    pub scale: Option<u32>,
}

impl FieldDefinition {
    /// Base column type in the normalized SQL vocabulary, without
    /// arguments. This is what live catalog types are compared against.
    pub fn base_type(&self) -> &'static str {
        self.ty.sql_base()
    }

    /// Full column type rendering, with length or precision arguments.
    pub fn column_type(&self) -> String {
        match (self.length, self.precision, self.scale) {
            (Some(length), _, _) => format!("{}({})", self.base_type(), length),
            (None, Some(precision), Some(scale)) => {
                format!("{}({},{})", self.base_type(), precision, scale)
            }
            _ => self.base_type().to_string(),
        }
    }
}
