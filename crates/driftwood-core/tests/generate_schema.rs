use driftwood_core::schema::expected::{ConstraintKind, ExpectedSchema, DEFAULT_VERSION};
use driftwood_core::schema::generate::{generate_schema, Builder, Declarations};
use driftwood_core::schema::ty::FieldType;
use driftwood_core::schema::DictionaryPluralizer;

use pretty_assertions::assert_eq;
use serde_json::json;

fn declarations(value: serde_json::Value) -> Declarations {
    serde_json::from_value(value).unwrap()
}

fn admin_user() -> Declarations {
    declarations(json!({
        "AdminUser": {
            "id": { "type": "string" },
            "email": { "type": "string" },
            "created_at": { "type": "Date" }
        }
    }))
}

#[test]
fn scenario_admin_user() {
    let schema = generate_schema(&admin_user());

    assert_eq!(schema.version, DEFAULT_VERSION);
    assert_eq!(schema.tables.len(), 1);

    let table = schema.table("admin_users").expect("table admin_users");

    let id = table.field("id").unwrap();
    assert!(id.primary);
    assert!(!id.unique);
    assert_eq!(id.ty, FieldType::String);
    assert_eq!(id.column_type(), "VARCHAR(255)");

    let email = table.field("email").unwrap();
    assert!(!email.primary);
    assert!(email.unique);
    assert_eq!(email.column_type(), "VARCHAR(255)");

    let created_at = table.field("created_at").unwrap();
    assert_eq!(created_at.ty, FieldType::Timestamp);
    assert_eq!(created_at.default.as_deref(), Some("CURRENT_TIMESTAMP"));

    let index_names: Vec<&str> = table.indexes.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(index_names, ["admin_users_pkey", "admin_users_email_key"]);
    assert!(table.indexes.iter().all(|i| i.unique));

    let unique: Vec<&str> = table
        .constraints
        .iter()
        .filter(|c| c.kind == ConstraintKind::Unique)
        .flat_map(|c| c.fields.iter().map(String::as_str))
        .collect();
    assert_eq!(unique, ["email"]);

    let not_null: Vec<&str> = table
        .constraints
        .iter()
        .filter(|c| c.kind == ConstraintKind::NotNull)
        .flat_map(|c| c.fields.iter().map(String::as_str))
        .collect();
    assert_eq!(not_null, ["id", "email", "created_at"]);
}

#[test]
fn generation_is_deterministic() {
    let decls = declarations(json!({
        "User": { "id": "string", "email": "string", "displayName": "string" },
        "Post": {
            "id": "string",
            "user_id": "string",
            "title": "string",
            "body": { "type": "text", "optional": true }
        }
    }));

    let first = generate_schema(&decls);
    let second = generate_schema(&decls);

    assert_eq!(first, second);
    assert_eq!(first.checksum(), second.checksum());
}

#[test]
fn required_is_always_the_negation_of_nullable() {
    let decls = declarations(json!({
        "Thing": {
            "id": "string",
            "maybe": { "type": "number", "optional": true },
            "must": { "type": "number", "required": true },
            "loose": { "type": "number", "required": false }
        }
    }));

    let schema = generate_schema(&decls);
    for table in &schema.tables {
        for field in &table.fields {
            assert_eq!(field.required, !field.nullable, "field {}", field.name);
        }
    }

    let table = schema.table("things").unwrap();
    assert!(table.field("maybe").unwrap().nullable);
    assert!(!table.field("must").unwrap().nullable);
    assert!(table.field("loose").unwrap().nullable);
}

#[test]
fn primary_key_constraint_iff_primary_field() {
    let with_id = generate_schema(&declarations(json!({
        "User": { "id": "string", "email": "string" }
    })));
    let with_pk: Vec<_> = with_id.tables[0]
        .constraints
        .iter()
        .filter(|c| c.kind == ConstraintKind::PrimaryKey)
        .collect();
    assert_eq!(with_pk.len(), 1);
    assert_eq!(with_pk[0].fields, ["id"]);

    let without_id = generate_schema(&declarations(json!({
        "Tag": { "label": "string" }
    })));
    assert!(without_id.tables[0]
        .constraints
        .iter()
        .all(|c| c.kind != ConstraintKind::PrimaryKey));
}

#[test]
fn foreign_key_round_trip() {
    let schema = generate_schema(&declarations(json!({
        "User": { "id": "string" },
        "Post": { "id": "string", "user_id": "string" }
    })));

    let posts = schema.table("posts").unwrap();
    assert_eq!(posts.relations.len(), 1);

    let relation = &posts.relations[0];
    assert_eq!(relation.target_table, "users");
    assert_eq!(relation.source_field, "user_id");
    assert_eq!(relation.target_field, "id");
    assert!(!relation.cascade_delete);

    // the foreign-key column gets an index but is NOT a primary key
    let user_id = posts.field("user_id").unwrap();
    assert!(!user_id.primary);
    assert!(posts.indexes.iter().any(|i| i.name == "posts_user_id_idx" && !i.unique));

    let users = schema.table("users").unwrap();
    assert!(users.relations.is_empty());
}

#[test]
fn relation_to_unknown_target_is_dropped() {
    let schema = generate_schema(&declarations(json!({
        "Post": { "id": "string", "author_id": "string" }
    })));

    assert!(schema.table("posts").unwrap().relations.is_empty());
}

#[test]
fn union_type_resolves_to_first_significant_member() {
    let schema = generate_schema(&declarations(json!({
        "Doc": {
            "id": "string",
            "plain": "string",
            "with_undefined": ["string", "undefined"],
            "leading_undefined": ["undefined", "number"],
            "only_absent": ["undefined"]
        }
    })));

    let table = schema.table("docs").unwrap();
    assert_eq!(
        table.field("with_undefined").unwrap().ty,
        table.field("plain").unwrap().ty
    );
    assert_eq!(table.field("leading_undefined").unwrap().ty, FieldType::Integer);
    assert_eq!(table.field("only_absent").unwrap().ty, FieldType::String);
}

#[test]
fn unknown_constructs_degrade_to_string() {
    let schema = generate_schema(&declarations(json!({
        "Odd": {
            "id": "string",
            "custom": "Widget",
            "numeric_literal": 42,
            "empty_descriptor": {}
        }
    })));

    let table = schema.table("odds").unwrap();
    for name in ["custom", "numeric_literal", "empty_descriptor"] {
        let field = table.field(name).unwrap();
        assert_eq!(field.ty, FieldType::String, "field {name}");
        assert_eq!(field.length, Some(255));
    }
}

#[test]
fn transient_types_and_reserved_properties_are_skipped() {
    let schema = generate_schema(&declarations(json!({
        "ApiResponse": { "data": "object" },
        "QueryOptions": { "limit": "number" },
        "User": { "id": "string", "constructor": "string" }
    })));

    assert_eq!(schema.tables.len(), 1);
    let users = schema.table("users").unwrap();
    assert!(users.field("constructor").is_none());
}

#[test]
fn duplicate_table_names_keep_the_first_declaration() {
    let schema = generate_schema(&declarations(json!({
        "AdminUser": { "id": "string", "email": "string" },
        "admin_user": { "id": "string" }
    })));

    assert_eq!(schema.tables.len(), 1);
    assert!(schema.table("admin_users").unwrap().field("email").is_some());
}

#[test]
fn inference_knobs_can_be_disabled() {
    let schema = Builder::new()
        .indexes(false)
        .constraints(false)
        .generate(&admin_user());

    let table = schema.table("admin_users").unwrap();
    assert!(table.indexes.is_empty());
    assert!(table.constraints.is_empty());
    // field inference still runs
    assert_eq!(table.fields.len(), 3);
}

#[test]
fn configurable_lengths_and_decimals() {
    let schema = Builder::new()
        .default_string_length(100)
        .decimal_defaults(12, 4)
        .generate(&declarations(json!({
            "Item": { "id": "string", "price": "decimal" }
        })));

    let table = schema.table("items").unwrap();
    assert_eq!(table.field("id").unwrap().length, Some(100));

    let price = table.field("price").unwrap();
    assert_eq!(price.precision, Some(12));
    assert_eq!(price.scale, Some(4));
    assert_eq!(price.column_type(), "DECIMAL(12,4)");
}

#[test]
fn dictionary_pluralizer_aligns_tables_and_relations() {
    let schema = Builder::new()
        .pluralizer(DictionaryPluralizer)
        .generate(&declarations(json!({
            "Person": { "id": "string" },
            "Badge": { "id": "string", "person_id": "string" }
        })));

    assert!(schema.table("people").is_some());
    let badges = schema.table("badges").unwrap();
    assert_eq!(badges.relations[0].target_table, "people");
}

#[test]
fn searchable_columns_get_a_search_index_without_dedup() {
    let schema = generate_schema(&declarations(json!({
        "Article": { "id": "string", "title": "string", "text_id": "string" }
    })));

    let table = schema.table("articles").unwrap();
    assert!(table
        .indexes
        .iter()
        .any(|i| i.name == "articles_title_search_idx" && !i.unique));

    // `text_id` matches both the foreign-key rule and the searchable rule
    let text_id: Vec<&str> = table
        .indexes
        .iter()
        .filter(|i| i.fields == ["text_id"])
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(
        text_id,
        ["articles_text_id_idx", "articles_text_id_search_idx"]
    );
}

#[test]
fn content_version_wires_the_checksum_in() {
    let decls = admin_user();

    let static_version = generate_schema(&decls);
    assert_eq!(static_version.version, DEFAULT_VERSION);

    let content_version = Builder::new().content_version(true).generate(&decls);
    assert_eq!(content_version.version, content_version.checksum());
    assert_eq!(content_version.version, static_version.checksum());
}

#[test]
fn checksum_tracks_content() {
    let base = generate_schema(&admin_user());
    let changed = generate_schema(&declarations(json!({
        "AdminUser": {
            "id": { "type": "string" },
            "email": { "type": "string" }
        }
    })));

    assert_ne!(base.checksum(), changed.checksum());
}

#[test]
fn schema_round_trips_through_serde() {
    let schema = generate_schema(&admin_user());
    let json = serde_json::to_string(&schema).unwrap();
    let back: ExpectedSchema = serde_json::from_str(&json).unwrap();
    assert_eq!(schema, back);
}
