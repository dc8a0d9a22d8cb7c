//! Pure comparison of an [`ExpectedSchema`] against a [`LiveSchema`].
//!
//! The output is a flat drift report, not a migration plan: this engine
//! detects and describes discrepancies, it never corrects them.

use super::expected::{ConstraintKind, ExpectedSchema, TableDefinition};
use super::live::{LiveSchema, LiveTable};
use super::name;

use serde::{Deserialize, Serialize};
use std::fmt;

/// One discrepancy between the expected and the live schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DriftEntry {
    MissingTable {
        table: String,
    },
    UnexpectedTable {
        table: String,
    },
    MissingField {
        table: String,
        field: String,
    },
    UnexpectedField {
        table: String,
        field: String,
    },
    FieldTypeMismatch {
        table: String,
        field: String,
        expected: String,
        actual: String,
    },
    NullabilityMismatch {
        table: String,
        field: String,
        expected_nullable: bool,
        actual_nullable: bool,
    },
    MissingIndex {
        table: String,
        index: String,
    },
    UnexpectedIndex {
        table: String,
        index: String,
    },
    IndexUniquenessMismatch {
        table: String,
        index: String,
        expected_unique: bool,
    },
    MissingPrimaryKey {
        table: String,
        fields: Vec<String>,
    },
    MissingUniqueEnforcement {
        table: String,
        field: String,
    },
}

impl fmt::Display for DriftEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTable { table } => write!(f, "table `{table}` is missing"),
            Self::UnexpectedTable { table } => {
                write!(f, "table `{table}` exists but is not declared")
            }
            Self::MissingField { table, field } => {
                write!(f, "column `{table}.{field}` is missing")
            }
            Self::UnexpectedField { table, field } => {
                write!(f, "column `{table}.{field}` exists but is not declared")
            }
            Self::FieldTypeMismatch {
                table,
                field,
                expected,
                actual,
            } => write!(
                f,
                "column `{table}.{field}` has type {actual}, expected {expected}"
            ),
            Self::NullabilityMismatch {
                table,
                field,
                expected_nullable,
                actual_nullable,
            } => write!(
                f,
                "column `{table}.{field}` is {}, expected {}",
                nullability(*actual_nullable),
                nullability(*expected_nullable),
            ),
            Self::MissingIndex { table, index } => {
                write!(f, "index `{index}` on `{table}` is missing")
            }
            Self::UnexpectedIndex { table, index } => {
                write!(f, "index `{index}` on `{table}` exists but is not declared")
            }
            Self::IndexUniquenessMismatch {
                table,
                index,
                expected_unique,
            } => write!(
                f,
                "index `{index}` on `{table}` should {}be unique",
                if *expected_unique { "" } else { "not " }
            ),
            Self::MissingPrimaryKey { table, fields } => write!(
                f,
                "table `{table}` has no primary key on ({})",
                fields.join(", ")
            ),
            Self::MissingUniqueEnforcement { table, field } => write!(
                f,
                "column `{table}.{field}` has no unique constraint or index"
            ),
        }
    }
}

fn nullability(nullable: bool) -> &'static str {
    if nullable {
        "nullable"
    } else {
        "not null"
    }
}

/// Compares the expected schema against the live one.
///
/// Pure over its inputs; output order is deterministic (expected-schema
/// order first, live-only entries after).
pub fn diff(expected: &ExpectedSchema, actual: &LiveSchema) -> Vec<DriftEntry> {
    let mut entries = Vec::new();

    for table in &expected.tables {
        match actual.table(&table.name) {
            Some(live) => diff_table(table, live, &mut entries),
            None => entries.push(DriftEntry::MissingTable {
                table: table.name.clone(),
            }),
        }
    }

    for live in &actual.tables {
        if expected.table(&live.name).is_none() {
            entries.push(DriftEntry::UnexpectedTable {
                table: live.name.clone(),
            });
        }
    }

    entries
}

fn diff_table(expected: &TableDefinition, live: &LiveTable, entries: &mut Vec<DriftEntry>) {
    diff_fields(expected, live, entries);
    diff_indexes(expected, live, entries);
    diff_constraints(expected, live, entries);
}

fn diff_fields(expected: &TableDefinition, live: &LiveTable, entries: &mut Vec<DriftEntry>) {
    for field in &expected.fields {
        let Some(live_field) = live.field(&field.name) else {
            entries.push(DriftEntry::MissingField {
                table: expected.name.clone(),
                field: field.name.clone(),
            });
            continue;
        };

        // Length and precision arguments are not visible in the
        // normalized catalog vocabulary, so only base types compare.
        if live_field.ty != field.base_type() {
            entries.push(DriftEntry::FieldTypeMismatch {
                table: expected.name.clone(),
                field: field.name.clone(),
                expected: field.base_type().to_string(),
                actual: live_field.ty.clone(),
            });
        }

        if live_field.nullable != field.nullable {
            entries.push(DriftEntry::NullabilityMismatch {
                table: expected.name.clone(),
                field: field.name.clone(),
                expected_nullable: field.nullable,
                actual_nullable: live_field.nullable,
            });
        }
    }

    for live_field in &live.fields {
        if expected.field(&live_field.name).is_none() {
            entries.push(DriftEntry::UnexpectedField {
                table: expected.name.clone(),
                field: live_field.name.clone(),
            });
        }
    }
}

fn diff_indexes(expected: &TableDefinition, live: &LiveTable, entries: &mut Vec<DriftEntry>) {
    // The live index list excludes the implicit primary-key index, so the
    // expected `<table>_pkey` entry is compared via constraints instead.
    let pkey = name::primary_key_name(&expected.name);

    for index in &expected.indexes {
        if index.name == pkey {
            continue;
        }

        match live.index(&index.name) {
            Some(live_index) => {
                if live_index.unique != index.unique {
                    entries.push(DriftEntry::IndexUniquenessMismatch {
                        table: expected.name.clone(),
                        index: index.name.clone(),
                        expected_unique: index.unique,
                    });
                }
            }
            None => entries.push(DriftEntry::MissingIndex {
                table: expected.name.clone(),
                index: index.name.clone(),
            }),
        }
    }

    for live_index in &live.indexes {
        let declared = expected
            .indexes
            .iter()
            .any(|index| index.name == live_index.name);
        if !declared {
            entries.push(DriftEntry::UnexpectedIndex {
                table: expected.name.clone(),
                index: live_index.name.clone(),
            });
        }
    }
}

fn diff_constraints(expected: &TableDefinition, live: &LiveTable, entries: &mut Vec<DriftEntry>) {
    for constraint in &expected.constraints {
        match constraint.kind {
            ConstraintKind::PrimaryKey => {
                let satisfied = live
                    .primary_key()
                    .is_some_and(|pk| pk.fields == constraint.fields);
                if !satisfied {
                    entries.push(DriftEntry::MissingPrimaryKey {
                        table: expected.name.clone(),
                        fields: constraint.fields.clone(),
                    });
                }
            }
            ConstraintKind::Unique => {
                // A UNIQUE constraint or a unique index on the same column
                // both enforce the expectation.
                let column = &constraint.fields[0];
                let by_constraint = live
                    .constraints
                    .iter()
                    .any(|c| c.is_unique() && c.fields == constraint.fields);
                let by_index = live
                    .indexes
                    .iter()
                    .any(|index| index.unique && index.fields == constraint.fields);
                if !by_constraint && !by_index {
                    entries.push(DriftEntry::MissingUniqueEnforcement {
                        table: expected.name.clone(),
                        field: column.clone(),
                    });
                }
            }
            // Covered by the field-level nullability comparison; catalog
            // NOT NULL constraint names are system-generated and cannot be
            // matched by name.
            ConstraintKind::NotNull => {}
        }
    }
}
