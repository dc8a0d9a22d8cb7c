//! The "should be" side of reconciliation: the relational structure
//! derived from declared types.

mod constraint;
mod field;
mod index;
mod relation;
mod schema;
mod table;

pub use constraint::{ConstraintDefinition, ConstraintKind};
pub use field::FieldDefinition;
pub use index::{IndexDefinition, IndexKind};
pub use relation::{RelationDefinition, RelationKind};
pub use schema::{ExpectedSchema, DEFAULT_VERSION};
pub use table::TableDefinition;
