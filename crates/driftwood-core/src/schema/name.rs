//! Identifier conventions.
//!
//! Declared type and property names arrive in mixed case; everything that
//! reaches the database is lower snake_case. Index, constraint, and
//! relation names are derived deterministically from table + column +
//! purpose so that regenerating a schema is idempotent.

use std::fmt::Debug;

/// Converts a mixed-case identifier to lower snake_case.
///
/// An underscore is inserted before each uppercase letter, the result is
/// lowercased, a leading underscore is stripped, and repeated underscores
/// collapse to one. The function is idempotent:
/// `normalize_ident(normalize_ident(x)) == normalize_ident(x)`.
pub fn normalize_ident(src: &str) -> String {
    let mut out = String::with_capacity(src.len() + 4);

    for ch in src.chars() {
        if ch.is_uppercase() {
            out.push('_');
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }

    let mut collapsed = String::with_capacity(out.len());
    let mut prev_underscore = false;

    for ch in out.chars() {
        if ch == '_' {
            if prev_underscore {
                continue;
            }
            prev_underscore = true;
        } else {
            prev_underscore = false;
        }
        collapsed.push(ch);
    }

    collapsed.trim_start_matches('_').to_string()
}

/// `true` iff the column name denotes the table's primary key.
///
/// Only the literal `id` qualifies. Foreign-key-shaped names (`user_id`)
/// are deliberately NOT primary; see DESIGN.md for the divergence from the
/// legacy rule that conflated the two.
pub fn is_primary_key_name(column: &str) -> bool {
    column == "id"
}

/// `true` iff the column name is foreign-key-shaped (`*_id`, not `id`).
pub fn is_foreign_key_name(column: &str) -> bool {
    column != "id" && column.ends_with("_id")
}

pub fn primary_key_name(table: &str) -> String {
    format!("{table}_pkey")
}

pub fn unique_index_name(table: &str, column: &str) -> String {
    format!("{table}_{column}_key")
}

pub fn index_name(table: &str, column: &str) -> String {
    format!("{table}_{column}_idx")
}

pub fn search_index_name(table: &str, column: &str) -> String {
    format!("{table}_{column}_search_idx")
}

pub fn not_null_constraint_name(table: &str, column: &str) -> String {
    format!("{table}_{column}_not_null")
}

pub fn foreign_key_name(table: &str, column: &str) -> String {
    format!("{table}_{column}_fkey")
}

/// Strategy for deriving a plural table name from a singular stem.
///
/// The generator uses one strategy for both table naming and
/// relation-target inference, which is what keeps the two aligned.
pub trait Pluralize: Debug + Send + Sync {
    fn pluralize(&self, word: &str) -> String;
}

/// Naive suffix pluralization: appends `s` unless the word already ends
/// in `s`. This is the historical behavior; irregular plurals come out
/// wrong (`person` -> `persons`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SuffixPluralizer;

impl Pluralize for SuffixPluralizer {
    fn pluralize(&self, word: &str) -> String {
        if word.ends_with('s') {
            word.to_string()
        } else {
            format!("{word}s")
        }
    }
}

/// Dictionary-backed pluralization for callers that need irregular
/// plurals (`person` -> `people`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DictionaryPluralizer;

impl Pluralize for DictionaryPluralizer {
    fn pluralize(&self, word: &str) -> String {
        pluralizer::pluralize(word, 2, false)
    }
}
