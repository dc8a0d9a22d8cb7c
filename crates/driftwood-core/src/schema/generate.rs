//! Schema generation: declared types in, [`ExpectedSchema`] out.
//!
//! Generation never fails. Malformed or unrecognized declarations degrade
//! to a generic string column rather than raising an error, because a
//! best-effort schema is always more useful to the downstream comparison
//! step than no schema at all.

use super::expected::{
    ConstraintDefinition, ConstraintKind, ExpectedSchema, FieldDefinition, IndexDefinition,
    IndexKind, RelationDefinition, RelationKind, TableDefinition, DEFAULT_VERSION,
};
use super::name::{self, Pluralize, SuffixPluralizer};
use super::ty::{FieldType, TypeMap};

use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Declared types by name, in declaration order.
pub type Declarations = IndexMap<String, TypeSpec>;

/// Declared properties of one type, in declaration order.
pub type TypeSpec = IndexMap<String, PropertySpec>;

/// One declared property.
///
/// Deserializes from the JSON shapes application declarations arrive in: a
/// bare type-name string, a union (ordered list, first significant member
/// wins), a nested descriptor carrying `type` and optionality flags, or
/// anything else (degrades to a string column).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PropertySpec {
    Name(String),
    Union(Vec<PropertySpec>),
    Nested(NestedSpec),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NestedSpec {
    #[serde(rename = "type")]
    pub ty: Option<Box<PropertySpec>>,

    pub optional: Option<bool>,

    pub required: Option<bool>,
}

/// Declared interface names that never persist: response envelopes,
/// pagination wrappers, query-option bags.
const TRANSIENT_TYPES: &[&str] = &[
    "ApiResponse",
    "ErrorResponse",
    "PaginatedResponse",
    "Pagination",
    "QueryOptions",
    "ListOptions",
    "SearchOptions",
    "RequestContext",
];

/// Property names that collide with constructor-like members.
const RESERVED_PROPERTIES: &[&str] = &["constructor", "prototype", "__proto__"];

/// A column whose name contains one of these is treated as unique.
const UNIQUE_TOKENS: &[&str] = &["email", "username", "key", "token", "uuid"];

/// A column whose name contains one of these gets a search index.
const SEARCHABLE_TOKENS: &[&str] = &["name", "title", "description", "content", "text"];

/// Generates an [`ExpectedSchema`] with default configuration.
pub fn generate_schema(declarations: &Declarations) -> ExpectedSchema {
    Builder::new().generate(declarations)
}

/// Generator configuration.
pub struct Builder {
    default_string_length: u32,
    default_decimal_precision: u32,
    default_decimal_scale: u32,
    indexes: bool,
    constraints: bool,
    content_version: bool,
    pluralizer: Box<dyn Pluralize>,
    type_map: TypeMap,
    transient_types: HashSet<String>,
    reserved_properties: HashSet<String>,
}

impl Default for Builder {
    fn default() -> Builder {
        Builder {
            default_string_length: 255,
            default_decimal_precision: 10,
            default_decimal_scale: 2,
            indexes: true,
            constraints: true,
            content_version: false,
            pluralizer: Box::new(SuffixPluralizer),
            type_map: TypeMap::default(),
            transient_types: TRANSIENT_TYPES.iter().map(|s| s.to_string()).collect(),
            reserved_properties: RESERVED_PROPERTIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Length applied to string-like columns without an explicit length.
    pub fn default_string_length(&mut self, length: u32) -> &mut Self {
        self.default_string_length = length;
        self
    }

    /// Precision and scale applied to decimal columns.
    pub fn decimal_defaults(&mut self, precision: u32, scale: u32) -> &mut Self {
        self.default_decimal_precision = precision;
        self.default_decimal_scale = scale;
        self
    }

    /// Whether index inference runs.
    pub fn indexes(&mut self, enabled: bool) -> &mut Self {
        self.indexes = enabled;
        self
    }

    /// Whether constraint inference runs.
    pub fn constraints(&mut self, enabled: bool) -> &mut Self {
        self.constraints = enabled;
        self
    }

    /// When on, `version` is the schema checksum instead of the static
    /// tag.
    pub fn content_version(&mut self, enabled: bool) -> &mut Self {
        self.content_version = enabled;
        self
    }

    /// Pluralization strategy for table names and relation targets.
    pub fn pluralizer(&mut self, pluralizer: impl Pluralize + 'static) -> &mut Self {
        self.pluralizer = Box::new(pluralizer);
        self
    }

    /// Replaces the declared-type-name dictionary.
    pub fn type_map(&mut self, type_map: TypeMap) -> &mut Self {
        self.type_map = type_map;
        self
    }

    /// Adds a declaration name to the non-persistent deny-list.
    pub fn transient_type(&mut self, type_name: impl Into<String>) -> &mut Self {
        self.transient_types.insert(type_name.into());
        self
    }

    /// Adds a property name to the reserved set.
    pub fn reserved_property(&mut self, property: impl Into<String>) -> &mut Self {
        self.reserved_properties.insert(property.into());
        self
    }

    /// Derives the expected schema from the given declarations.
    ///
    /// Deterministic: the same declarations yield a structurally identical
    /// schema, including field, index, constraint, and relation order.
    pub fn generate(&self, declarations: &Declarations) -> ExpectedSchema {
        let mut tables: Vec<TableDefinition> = Vec::new();
        let mut seen = HashSet::new();

        for (decl_name, properties) in declarations {
            if self.transient_types.contains(decl_name) {
                debug!(declaration = %decl_name, "skipping non-persistent type");
                continue;
            }

            let table_name = self
                .pluralizer
                .pluralize(&name::normalize_ident(decl_name));

            if !seen.insert(table_name.clone()) {
                warn!(
                    declaration = %decl_name,
                    table = %table_name,
                    "duplicate table name, skipping declaration"
                );
                continue;
            }

            tables.push(self.build_table(table_name, properties));
        }

        self.link_relations(&mut tables);

        let mut schema = ExpectedSchema {
            tables,
            version: DEFAULT_VERSION.to_string(),
        };
        if self.content_version {
            schema.version = schema.checksum();
        }
        schema
    }

    fn build_table(&self, table_name: String, properties: &TypeSpec) -> TableDefinition {
        let mut fields = Vec::new();

        for (prop_name, spec) in properties {
            if self.reserved_properties.contains(prop_name) {
                continue;
            }
            fields.push(self.build_field(&table_name, prop_name, spec));
        }

        let indexes = if self.indexes {
            self.infer_indexes(&table_name, &fields)
        } else {
            Vec::new()
        };

        let constraints = if self.constraints {
            self.infer_constraints(&table_name, &fields)
        } else {
            Vec::new()
        };

        TableDefinition {
            name: table_name,
            fields,
            indexes,
            constraints,
            relations: Vec::new(),
        }
    }

    fn build_field(&self, table: &str, prop_name: &str, spec: &PropertySpec) -> FieldDefinition {
        let column = name::normalize_ident(prop_name);
        let ty = self.resolve_type(spec);

        let nullable = is_optional(spec);
        let primary = name::is_primary_key_name(&column);
        if name::is_foreign_key_name(&column) {
            // The legacy rule marked these primary as well; see DESIGN.md.
            debug!(
                table,
                column = %column,
                "foreign-key-shaped column is not treated as a primary key"
            );
        }

        let unique = UNIQUE_TOKENS.iter().any(|token| column.contains(token));

        let length = ty.is_string_like().then_some(self.default_string_length);
        let (precision, scale) = if ty.is_decimal() {
            (
                Some(self.default_decimal_precision),
                Some(self.default_decimal_scale),
            )
        } else {
            (None, None)
        };

        let default = (ty.is_timestamp() && matches!(column.as_str(), "created_at" | "updated_at"))
            .then(|| "CURRENT_TIMESTAMP".to_string());

        FieldDefinition {
            name: column,
            ty,
            required: !nullable,
            nullable,
            primary,
            unique,
            default,
            length,
            precision,
            scale,
        }
    }

    fn resolve_type(&self, spec: &PropertySpec) -> FieldType {
        match spec {
            PropertySpec::Name(type_name) => self
                .type_map
                .resolve(type_name)
                .unwrap_or(FieldType::String),
            PropertySpec::Union(members) => members
                .iter()
                .find(|member| !is_absent_member(member))
                .map(|member| self.resolve_type(member))
                .unwrap_or(FieldType::String),
            PropertySpec::Nested(nested) => nested
                .ty
                .as_deref()
                .map(|inner| self.resolve_type(inner))
                .unwrap_or(FieldType::String),
            PropertySpec::Other(_) => FieldType::String,
        }
    }

    fn infer_indexes(&self, table: &str, fields: &[FieldDefinition]) -> Vec<IndexDefinition> {
        let mut indexes = Vec::new();

        for field in fields {
            if field.primary {
                indexes.push(IndexDefinition {
                    name: name::primary_key_name(table),
                    fields: vec![field.name.clone()],
                    unique: true,
                    kind: IndexKind::BTree,
                });
            }
            if field.unique {
                indexes.push(IndexDefinition {
                    name: name::unique_index_name(table, &field.name),
                    fields: vec![field.name.clone()],
                    unique: true,
                    kind: IndexKind::BTree,
                });
            }
            if name::is_foreign_key_name(&field.name) {
                indexes.push(IndexDefinition {
                    name: name::index_name(table, &field.name),
                    fields: vec![field.name.clone()],
                    unique: false,
                    kind: IndexKind::BTree,
                });
            }
            if SEARCHABLE_TOKENS
                .iter()
                .any(|token| field.name.contains(token))
            {
                indexes.push(IndexDefinition {
                    name: name::search_index_name(table, &field.name),
                    fields: vec![field.name.clone()],
                    unique: false,
                    kind: IndexKind::BTree,
                });
            }
        }

        indexes
    }

    fn infer_constraints(
        &self,
        table: &str,
        fields: &[FieldDefinition],
    ) -> Vec<ConstraintDefinition> {
        let mut constraints = Vec::new();

        let primary: Vec<String> = fields
            .iter()
            .filter(|field| field.primary)
            .map(|field| field.name.clone())
            .collect();
        if !primary.is_empty() {
            constraints.push(ConstraintDefinition {
                name: name::primary_key_name(table),
                kind: ConstraintKind::PrimaryKey,
                fields: primary,
            });
        }

        for field in fields {
            if field.unique {
                constraints.push(ConstraintDefinition {
                    name: name::unique_index_name(table, &field.name),
                    kind: ConstraintKind::Unique,
                    fields: vec![field.name.clone()],
                });
            }
        }

        for field in fields {
            if !field.nullable {
                constraints.push(ConstraintDefinition {
                    name: name::not_null_constraint_name(table, &field.name),
                    kind: ConstraintKind::NotNull,
                    fields: vec![field.name.clone()],
                });
            }
        }

        constraints
    }

    /// Second pass over the full batch: a foreign-key-shaped column whose
    /// pluralized stem names a table in this batch becomes a many-to-one
    /// relation. Anything else is dropped; no partial declarations.
    fn link_relations(&self, tables: &mut [TableDefinition]) {
        let table_names: HashSet<String> =
            tables.iter().map(|table| table.name.clone()).collect();

        for table in tables.iter_mut() {
            let mut relations = Vec::new();

            for field in &table.fields {
                let Some(stem) = field.name.strip_suffix("_id") else {
                    continue;
                };
                if !name::is_foreign_key_name(&field.name) {
                    continue;
                }

                let target = self.pluralizer.pluralize(stem);
                if table_names.contains(&target) {
                    relations.push(RelationDefinition {
                        name: name::foreign_key_name(&table.name, &field.name),
                        kind: RelationKind::ManyToOne,
                        target_table: target,
                        source_field: field.name.clone(),
                        target_field: "id".to_string(),
                        cascade_delete: false,
                    });
                } else {
                    debug!(
                        table = %table.name,
                        column = %field.name,
                        target = %target,
                        "relation target not in batch, dropping"
                    );
                }
            }

            table.relations = relations;
        }
    }
}

fn is_optional(spec: &PropertySpec) -> bool {
    match spec {
        PropertySpec::Nested(nested) => nested
            .optional
            .or_else(|| nested.required.map(|required| !required))
            .unwrap_or(false),
        _ => false,
    }
}

/// Union members that only signal absence, never a column type.
fn is_absent_member(member: &PropertySpec) -> bool {
    matches!(member, PropertySpec::Name(name) if name == "undefined" || name == "null")
}
