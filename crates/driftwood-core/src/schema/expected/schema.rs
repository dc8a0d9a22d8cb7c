use super::TableDefinition;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The static version tag used when content-addressed versioning is off.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// The expected relational schema derived from a set of declared types.
///
/// Produced fresh on every generation call and immutable once returned.
/// Table names are unique within a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedSchema {
    pub tables: Vec<TableDefinition>,
    pub version: String,
}

impl ExpectedSchema {
    pub fn table(&self, name: &str) -> Option<&TableDefinition> {
        self.tables.iter().find(|table| table.name == name)
    }

    /// Deterministic content hash of the table list.
    ///
    /// Table, field, index, constraint, and relation ordering is fixed by
    /// generation order, so the same input declarations always hash to the
    /// same digest.
    pub fn checksum(&self) -> String {
        let bytes = serde_json::to_vec(&self.tables).expect("schema serialization is infallible");
        hex::encode(Sha256::digest(&bytes))
    }
}
