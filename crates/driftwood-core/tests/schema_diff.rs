use driftwood_core::schema::diff::{diff, DriftEntry};
use driftwood_core::schema::generate::{generate_schema, Declarations};
use driftwood_core::schema::live::{LiveConstraint, LiveField, LiveIndex, LiveSchema, LiveTable};

use pretty_assertions::assert_eq;
use serde_json::json;

fn expected() -> driftwood_core::ExpectedSchema {
    let decls: Declarations = serde_json::from_value(json!({
        "AdminUser": {
            "id": { "type": "string" },
            "email": { "type": "string" },
            "created_at": { "type": "Date" }
        }
    }))
    .unwrap();
    generate_schema(&decls)
}

/// A live table that exactly matches what the generator expects for
/// `AdminUser`.
fn matching_live_table() -> LiveTable {
    LiveTable {
        name: "admin_users".to_string(),
        fields: vec![
            LiveField {
                name: "id".to_string(),
                ty: "VARCHAR".to_string(),
                nullable: false,
                default: None,
            },
            LiveField {
                name: "email".to_string(),
                ty: "VARCHAR".to_string(),
                nullable: false,
                default: None,
            },
            LiveField {
                name: "created_at".to_string(),
                ty: "TIMESTAMP".to_string(),
                nullable: false,
                default: Some("CURRENT_TIMESTAMP".to_string()),
            },
        ],
        indexes: vec![LiveIndex {
            name: "admin_users_email_key".to_string(),
            fields: vec!["email".to_string()],
            unique: true,
        }],
        constraints: vec![
            LiveConstraint {
                name: "admin_users_pkey".to_string(),
                kind: "PRIMARY KEY".to_string(),
                fields: vec!["id".to_string()],
            },
            LiveConstraint {
                name: "admin_users_email_key".to_string(),
                kind: "UNIQUE".to_string(),
                fields: vec!["email".to_string()],
            },
        ],
    }
}

fn live(tables: Vec<LiveTable>) -> LiveSchema {
    LiveSchema { tables }
}

#[test]
fn matching_schemas_have_no_drift() {
    let entries = diff(&expected(), &live(vec![matching_live_table()]));
    assert_eq!(entries, vec![]);
}

#[test]
fn missing_and_unexpected_tables() {
    let entries = diff(
        &expected(),
        &live(vec![LiveTable {
            name: "stray".to_string(),
            fields: vec![],
            indexes: vec![],
            constraints: vec![],
        }]),
    );

    assert_eq!(
        entries,
        vec![
            DriftEntry::MissingTable {
                table: "admin_users".to_string()
            },
            DriftEntry::UnexpectedTable {
                table: "stray".to_string()
            },
        ]
    );
}

#[test]
fn missing_and_unexpected_fields() {
    let mut table = matching_live_table();
    table.fields.retain(|f| f.name != "email");
    table.fields.push(LiveField {
        name: "legacy_flag".to_string(),
        ty: "BOOLEAN".to_string(),
        nullable: true,
        default: None,
    });
    // drop the enforcement entries that referenced the missing column
    table.indexes.clear();
    table.constraints.retain(|c| c.is_primary_key());

    let entries = diff(&expected(), &live(vec![table]));

    assert!(entries.contains(&DriftEntry::MissingField {
        table: "admin_users".to_string(),
        field: "email".to_string(),
    }));
    assert!(entries.contains(&DriftEntry::UnexpectedField {
        table: "admin_users".to_string(),
        field: "legacy_flag".to_string(),
    }));
}

#[test]
fn type_and_nullability_mismatches() {
    let mut table = matching_live_table();
    table.fields[1].ty = "TEXT".to_string();
    table.fields[2].nullable = true;

    let entries = diff(&expected(), &live(vec![table]));

    assert!(entries.contains(&DriftEntry::FieldTypeMismatch {
        table: "admin_users".to_string(),
        field: "email".to_string(),
        expected: "VARCHAR".to_string(),
        actual: "TEXT".to_string(),
    }));
    assert!(entries.contains(&DriftEntry::NullabilityMismatch {
        table: "admin_users".to_string(),
        field: "created_at".to_string(),
        expected_nullable: false,
        actual_nullable: true,
    }));
}

#[test]
fn index_drift() {
    let mut table = matching_live_table();
    table.indexes[0].unique = false;
    table.indexes.push(LiveIndex {
        name: "admin_users_manual_idx".to_string(),
        fields: vec!["created_at".to_string()],
        unique: false,
    });

    let entries = diff(&expected(), &live(vec![table]));

    assert!(entries.contains(&DriftEntry::IndexUniquenessMismatch {
        table: "admin_users".to_string(),
        index: "admin_users_email_key".to_string(),
        expected_unique: true,
    }));
    assert!(entries.contains(&DriftEntry::UnexpectedIndex {
        table: "admin_users".to_string(),
        index: "admin_users_manual_idx".to_string(),
    }));

    let mut table = matching_live_table();
    table.indexes.clear();

    let entries = diff(&expected(), &live(vec![table]));
    assert!(entries.contains(&DriftEntry::MissingIndex {
        table: "admin_users".to_string(),
        index: "admin_users_email_key".to_string(),
    }));
}

#[test]
fn missing_primary_key_and_unique_enforcement() {
    let mut table = matching_live_table();
    table.constraints.clear();
    table.indexes.clear();

    let entries = diff(&expected(), &live(vec![table]));

    assert!(entries.contains(&DriftEntry::MissingPrimaryKey {
        table: "admin_users".to_string(),
        fields: vec!["id".to_string()],
    }));
    assert!(entries.contains(&DriftEntry::MissingUniqueEnforcement {
        table: "admin_users".to_string(),
        field: "email".to_string(),
    }));
}

#[test]
fn a_unique_index_satisfies_a_unique_constraint_expectation() {
    let mut table = matching_live_table();
    // enforcement comes from the index alone
    table.constraints.retain(|c| c.is_primary_key());

    let entries = diff(&expected(), &live(vec![table]));
    assert_eq!(entries, vec![]);
}
