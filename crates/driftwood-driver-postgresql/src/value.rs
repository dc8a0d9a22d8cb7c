use postgres::types::{accepts, private::BytesMut, to_sql_checked, IsNull, Kind, ToSql, Type};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use driftwood_core::driver::{Row, Value};
use driftwood_core::{err, Error, Result};

/// [`ToSql`] adapter for the core value model.
#[derive(Debug)]
pub(crate) struct SqlValue(Value);

impl From<Value> for SqlValue {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl ToSql for SqlValue {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> std::result::Result<IsNull, Box<dyn std::error::Error + Sync + Send>>
    where
        Self: Sized,
    {
        match &self.0 {
            Value::Bool(value) => value.to_sql(ty, out),
            Value::I64(value) => match *ty {
                Type::INT2 => {
                    let value = *value as i16;
                    value.to_sql(ty, out)
                }
                Type::INT4 => {
                    let value = *value as i32;
                    value.to_sql(ty, out)
                }
                Type::INT8 => value.to_sql(ty, out),
                Type::NUMERIC => Decimal::from(*value).to_sql(ty, out),
                _ => Err(unsupported("i64", ty)),
            },
            Value::F64(value) => match *ty {
                Type::FLOAT4 => {
                    let value = *value as f32;
                    value.to_sql(ty, out)
                }
                Type::FLOAT8 => value.to_sql(ty, out),
                _ => Err(unsupported("f64", ty)),
            },
            Value::String(value) => value.to_sql(ty, out),
            Value::Null => Ok(IsNull::Yes),
        }
    }

    accepts!(BOOL, INT2, INT4, INT8, FLOAT4, FLOAT8, NUMERIC, TEXT, VARCHAR, NAME, UNKNOWN);
    to_sql_checked!();
}

fn unsupported(from: &str, ty: &Type) -> Box<dyn std::error::Error + Sync + Send> {
    Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        format!("cannot bind {from} as {ty}"),
    ))
}

/// Translates one database row into the core row model, dispatching on
/// the column's storage type.
pub(crate) fn row_from_postgres(row: &tokio_postgres::Row) -> Result<Row> {
    let mut columns = Vec::with_capacity(row.len());
    let mut values = Vec::with_capacity(row.len());

    for (index, column) in row.columns().iter().enumerate() {
        columns.push(column.name().to_string());
        values.push(value_at(row, index, column.type_())?);
    }

    Ok(Row::new(columns, values))
}

fn value_at(row: &tokio_postgres::Row, index: usize, ty: &Type) -> Result<Value> {
    // Catalog views expose identifier columns through domain types
    // (`sql_identifier` over `name`); dispatch on the base type.
    let base = base_type(ty);

    let value = match *base {
        Type::BOOL => row
            .try_get::<_, Option<bool>>(index)
            .map_err(Error::driver)?
            .map(Value::Bool),
        Type::INT2 => row
            .try_get::<_, Option<i16>>(index)
            .map_err(Error::driver)?
            .map(|value| Value::I64(value as i64)),
        Type::INT4 => row
            .try_get::<_, Option<i32>>(index)
            .map_err(Error::driver)?
            .map(|value| Value::I64(value as i64)),
        Type::INT8 => row
            .try_get::<_, Option<i64>>(index)
            .map_err(Error::driver)?
            .map(Value::I64),
        Type::OID => row
            .try_get::<_, Option<u32>>(index)
            .map_err(Error::driver)?
            .map(|value| Value::I64(value as i64)),
        Type::FLOAT4 => row
            .try_get::<_, Option<f32>>(index)
            .map_err(Error::driver)?
            .map(|value| Value::F64(value as f64)),
        Type::FLOAT8 => row
            .try_get::<_, Option<f64>>(index)
            .map_err(Error::driver)?
            .map(Value::F64),
        Type::NUMERIC => row
            .try_get::<_, Option<Decimal>>(index)
            .map_err(Error::driver)?
            .map(|value| {
                value
                    .to_f64()
                    .map(Value::F64)
                    .ok_or_else(|| err!("NUMERIC value out of f64 range at index {index}"))
            })
            .transpose()?,
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => row
            .try_get::<_, Option<String>>(index)
            .map_err(Error::driver)?
            .map(Value::String),
        _ => {
            return Err(err!(
                "unsupported column type `{ty}` at index {index} of the result row"
            ))
        }
    };

    Ok(value.unwrap_or(Value::Null))
}

fn base_type(ty: &Type) -> &Type {
    match ty.kind() {
        Kind::Domain(inner) => base_type(inner),
        _ => ty,
    }
}
