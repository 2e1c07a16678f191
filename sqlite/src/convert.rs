//! Conversion between model [`Value`]s and SQLite storage values.
//!
//! Outbound, every value maps to one SQLite storage class: booleans become
//! `0`/`1`, date-times become text in [`DATETIME_FORMAT`], and `u64`
//! values must fit in a signed 64-bit integer. Inbound, the column's
//! [`LogicalType`] decides how the stored value is read back.

use chrono::NaiveDateTime;
use rowbind_core::{FieldDescriptor, LogicalType, Value};
use rusqlite::Row;
use rusqlite::types::{Value as SqlValue, ValueRef};

use crate::error::{Result, SqliteError};

/// Text layout of stored DATETIME values.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Converts a model value into an SQLite parameter.
pub(crate) fn to_sql(value: &Value) -> Result<SqlValue> {
    let sql = match value {
        Value::Null => SqlValue::Null,
        Value::Int(v) => SqlValue::Integer(*v),
        Value::Uint64(v) => SqlValue::Integer(i64::try_from(*v).map_err(|_| {
            SqliteError::ConversionError(format!("u64 value {v} exceeds the INTEGER range"))
        })?),
        Value::Float(v) => SqlValue::Real(*v),
        Value::Text(v) => SqlValue::Text(v.clone()),
        Value::Bool(v) => SqlValue::Integer(i64::from(*v)),
        Value::DateTime(v) => SqlValue::Text(v.format(DATETIME_FORMAT).to_string()),
    };
    Ok(sql)
}

/// Converts a parameter list, preserving order.
pub(crate) fn to_sql_params(values: &[Value]) -> Result<Vec<SqlValue>> {
    values.iter().map(to_sql).collect()
}

/// Reads a stored value back as the field's logical type.
pub(crate) fn from_sql(field: &FieldDescriptor, raw: ValueRef<'_>) -> Result<Value> {
    let value = match (field.logical_type(), raw) {
        (_, ValueRef::Null) => Value::Null,
        (LogicalType::Int, ValueRef::Integer(v)) => Value::Int(v),
        (LogicalType::Uint64, ValueRef::Integer(v)) => {
            Value::Uint64(u64::try_from(v).map_err(|_| {
                SqliteError::ConversionError(format!(
                    "column '{}' holds negative value {v}",
                    field.name()
                ))
            })?)
        }
        (LogicalType::Float, ValueRef::Real(v)) => Value::Float(v),
        (LogicalType::Float, ValueRef::Integer(v)) => Value::Float(v as f64),
        (LogicalType::Bool, ValueRef::Integer(v)) => Value::Bool(v != 0),
        (LogicalType::Char, ValueRef::Text(bytes)) => Value::Text(utf8(field, bytes)?.to_string()),
        (LogicalType::DateTime, ValueRef::Text(bytes)) => {
            Value::DateTime(parse_datetime(field, utf8(field, bytes)?)?)
        }
        (logical_type, other) => {
            return Err(SqliteError::ConversionError(format!(
                "column '{}' of type {logical_type} cannot hold {:?}",
                field.name(),
                other.data_type()
            )));
        }
    };
    Ok(value)
}

/// Reads one result row positionally against the given fields.
pub(crate) fn row_to_values(fields: &[FieldDescriptor], row: &Row<'_>) -> Result<Vec<Value>> {
    fields
        .iter()
        .enumerate()
        .map(|(idx, field)| from_sql(field, row.get_ref(idx)?))
        .collect()
}

fn utf8<'a>(field: &FieldDescriptor, bytes: &'a [u8]) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|e| {
        SqliteError::ConversionError(format!("column '{}' is not valid UTF-8: {e}", field.name()))
    })
}

fn parse_datetime(field: &FieldDescriptor, text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f"))
        .map_err(|e| {
            SqliteError::ConversionError(format!(
                "column '{}' holds invalid datetime '{text}': {e}",
                field.name()
            ))
        })
}
