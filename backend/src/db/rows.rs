//! JSON encoding for rows of arbitrary shape.
//!
//! Caller-supplied queries can return any column set, so values are decoded by
//! the type name the server reports rather than through `FromRow`.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Map, Number, Value};
use sqlx::{
    mysql::{MySql, MySqlRow},
    Column, Decode, Row, Type, TypeInfo,
};

pub type JsonRow = Map<String, Value>;

/// Encodes one row as an object keyed by column name, in column order.
/// A repeated column name keeps the last value.
pub fn row_to_json(row: &MySqlRow) -> Result<JsonRow, sqlx::Error> {
    let mut object = Map::with_capacity(row.columns().len());
    for column in row.columns() {
        let value = column_value(row, column.ordinal(), column.type_info().name())?;
        object.insert(column.name().to_string(), value);
    }
    Ok(object)
}

pub fn rows_to_json(rows: &[MySqlRow]) -> Result<Vec<JsonRow>, sqlx::Error> {
    rows.iter().map(row_to_json).collect()
}

fn column_value(row: &MySqlRow, idx: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    let kind = ColumnKind::from_type_name(type_name);
    match typed_value(row, idx, kind) {
        Ok(value) => Ok(value),
        // Zero dates and out-of-range numbers come back verbatim.
        Err(_) if kind != ColumnKind::Bytes => text_value(row, idx),
        Err(err) => Err(err),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Null,
    Signed,
    Unsigned,
    Float,
    Date,
    DateTime,
    Json,
    Bytes,
    Text,
}

impl ColumnKind {
    fn from_type_name(name: &str) -> Self {
        match name {
            "NULL" => ColumnKind::Null,
            "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
                ColumnKind::Signed
            }
            n if n.ends_with(" UNSIGNED") => ColumnKind::Unsigned,
            "FLOAT" | "DOUBLE" => ColumnKind::Float,
            "DATE" => ColumnKind::Date,
            "DATETIME" | "TIMESTAMP" => ColumnKind::DateTime,
            "JSON" => ColumnKind::Json,
            "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT"
            | "GEOMETRY" => ColumnKind::Bytes,
            _ => ColumnKind::Text,
        }
    }
}

fn decode<'r, T>(row: &'r MySqlRow, idx: usize) -> Result<Option<T>, sqlx::Error>
where
    T: Decode<'r, MySql> + Type<MySql>,
{
    row.try_get_unchecked::<Option<T>, _>(idx)
}

fn typed_value(row: &MySqlRow, idx: usize, kind: ColumnKind) -> Result<Value, sqlx::Error> {
    let value = match kind {
        ColumnKind::Null => Some(Value::Null),
        ColumnKind::Signed => decode::<i64>(row, idx)?.map(Value::from),
        ColumnKind::Unsigned => decode::<u64>(row, idx)?.map(Value::from),
        ColumnKind::Float => decode::<f64>(row, idx)?.map(float_value),
        ColumnKind::Date => decode::<NaiveDate>(row, idx)?.map(|d| Value::String(format_date(d))),
        ColumnKind::DateTime => {
            decode::<NaiveDateTime>(row, idx)?.map(|dt| Value::String(format_datetime(dt)))
        }
        ColumnKind::Json => decode::<String>(row, idx)?
            .map(|raw| serde_json::from_str(&raw).unwrap_or(Value::String(raw))),
        ColumnKind::Bytes => decode::<Vec<u8>>(row, idx)?.map(bytes_value),
        ColumnKind::Text => decode::<String>(row, idx)?.map(Value::String),
    };
    Ok(value.unwrap_or(Value::Null))
}

fn text_value(row: &MySqlRow, idx: usize) -> Result<Value, sqlx::Error> {
    match decode::<String>(row, idx) {
        Ok(text) => Ok(text.map(Value::String).unwrap_or(Value::Null)),
        Err(_) => Ok(decode::<Vec<u8>>(row, idx)?
            .map(bytes_value)
            .unwrap_or(Value::Null)),
    }
}

/// NaN and infinities have no JSON form.
fn float_value(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

fn bytes_value(bytes: Vec<u8>) -> Value {
    Value::Array(bytes.into_iter().map(Value::from).collect())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
