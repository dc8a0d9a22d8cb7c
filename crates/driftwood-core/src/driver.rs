use crate::{async_trait, Error, Result};

use std::fmt::Debug;

/// A scalar value crossing the connection boundary.
///
/// This is the reduced value vocabulary a catalog or row-count query can
/// produce; drivers are responsible for translating their native column
/// types into it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Null value
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed 64-bit integer
    I64(i64),

    /// 64-bit floating point value
    F64(f64),

    /// String value
    String(String),
}

impl Value {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the value's type, for diagnostics.
    pub const fn ty_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::I64(_) => "i64",
            Self::F64(_) => "f64",
            Self::String(_) => "string",
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::I64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::F64(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// A single row returned by [`Connection::query`].
///
/// Columns are addressed by name; the typed getters fail with a
/// type-conversion error when the column holds a different variant and
/// with an invalid-result error when the column is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Row {
        assert_eq!(
            columns.len(),
            values.len(),
            "row columns and values must have the same length"
        );
        Row { columns, values }
    }

    /// Returns the raw value of the named column, if present.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|name| name == column)
            .map(|index| &self.values[index])
    }

    fn require(&self, column: &str) -> Result<&Value> {
        self.get(column)
            .ok_or_else(|| Error::invalid_result(format!("missing column `{column}`")))
    }

    pub fn str(&self, column: &str) -> Result<&str> {
        match self.require(column)? {
            Value::String(value) => Ok(value),
            other => Err(Error::type_conversion(other.clone(), "string")),
        }
    }

    pub fn string(&self, column: &str) -> Result<String> {
        self.str(column).map(String::from)
    }

    /// Like [`Row::str`], but maps a SQL NULL to `None`.
    pub fn opt_str(&self, column: &str) -> Result<Option<&str>> {
        match self.require(column)? {
            Value::Null => Ok(None),
            Value::String(value) => Ok(Some(value)),
            other => Err(Error::type_conversion(other.clone(), "string")),
        }
    }

    pub fn i64(&self, column: &str) -> Result<i64> {
        match self.require(column)? {
            Value::I64(value) => Ok(*value),
            other => Err(Error::type_conversion(other.clone(), "i64")),
        }
    }

    pub fn bool(&self, column: &str) -> Result<bool> {
        match self.require(column)? {
            Value::Bool(value) => Ok(*value),
            other => Err(Error::type_conversion(other.clone(), "bool")),
        }
    }
}

/// A read-only database connection.
///
/// The engine issues plain SELECT-class statements with positional
/// parameters. Cancellation and timeouts are the responsibility of the
/// implementation; the engine imposes none itself and propagates whatever
/// failure the implementation raises.
#[async_trait]
pub trait Connection: Debug + Send + Sync + 'static {
    /// Executes a query and returns the full result set.
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Row {
        Row::new(
            vec!["name".into(), "count".into(), "active".into(), "note".into()],
            vec![
                Value::from("users"),
                Value::from(3_i64),
                Value::from(true),
                Value::Null,
            ],
        )
    }

    #[test]
    fn typed_getters() {
        let row = sample();
        assert_eq!(row.str("name").unwrap(), "users");
        assert_eq!(row.i64("count").unwrap(), 3);
        assert!(row.bool("active").unwrap());
        assert_eq!(row.opt_str("note").unwrap(), None);
    }

    #[test]
    fn missing_column_is_invalid_result() {
        let err = sample().str("nope").unwrap_err();
        assert_eq!(err.to_string(), "invalid result set: missing column `nope`");
    }

    #[test]
    fn wrong_variant_is_type_conversion() {
        let err = sample().bool("count").unwrap_err();
        assert_eq!(err.to_string(), "cannot convert i64 to bool");
    }
}
