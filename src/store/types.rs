//! Conversion from generated values to DuckDB parameter values.

use bookstore_gen::SqlValue;
use chrono::NaiveDate;
use duckdb::types::Value;

/// Convert a generated value into a bindable DuckDB value
pub fn to_duckdb_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Int(n) => Value::BigInt(*n),
        SqlValue::Float(f) => Value::Double(*f),
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Date(d) => Value::Date32(days_since_epoch(*d)),
    }
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    (date - epoch).num_days() as i32
}
