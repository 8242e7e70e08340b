//! Raw field and driver values.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

/// Value held by a field, bound as a statement parameter, or read from a row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for values a driver would compare equal to the literal `0`.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Integer(v) => *v == 0,
            Value::Real(v) => *v == 0.0,
            _ => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Blob(_) => "blob",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(v) => write!(f, "{}", if *v { "True" } else { "False" }),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
            Value::Blob(v) => write!(f, "<{} bytes>", v.len()),
            Value::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Value::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

/// Failure converting a [`Value`] into a Rust type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Type conversion error: {0}")]
pub struct ConversionError(pub String);

/// Row data from a query result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Create a new row with column names and values.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Get a value by column index.
    pub fn get<T: FromValue>(&self, index: usize) -> Result<T, ConversionError> {
        self.values
            .get(index)
            .ok_or_else(|| ConversionError(format!("Column index {} out of bounds", index)))
            .and_then(|v| T::from_value(v))
    }

    /// Get a value by column name.
    pub fn get_by_name<T: FromValue>(&self, name: &str) -> Result<T, ConversionError> {
        let index = self
            .columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| ConversionError(format!("Column '{}' not found", name)))?;
        self.get(index)
    }

    /// Get the number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Get the raw value at an index.
    pub fn get_raw(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Iterate `(column, value)` pairs in result-set order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let (columns, values) = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self { columns, values }
    }
}

/// Trait for converting from a [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, ConversionError>;
}

fn null_error(ty: &str) -> ConversionError {
    ConversionError(format!(
        "{ty} field is NULL - use Option<{ty}> for nullable columns"
    ))
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Integer(v) => Ok(*v),
            Value::Null => Err(null_error("i64")),
            _ => Err(ConversionError("Expected integer".to_string())),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Integer(v) => {
                i32::try_from(*v).map_err(|_| ConversionError("Expected i32".to_string()))
            }
            Value::Null => Err(null_error("i32")),
            _ => Err(ConversionError("Expected integer".to_string())),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Real(v) => Ok(*v),
            Value::Integer(v) => Ok(*v as f64),
            Value::Null => Err(null_error("f64")),
            _ => Err(ConversionError("Expected real".to_string())),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Text(v) => Ok(v.clone()),
            Value::Null => Err(null_error("String")),
            _ => Err(ConversionError("Expected text".to_string())),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Bool(v) => Ok(*v),
            Value::Integer(v) => Ok(*v != 0),
            Value::Null => Err(null_error("bool")),
            _ => Err(ConversionError("Expected boolean".to_string())),
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Date(v) => Ok(*v),
            Value::DateTime(v) => Ok(v.date()),
            Value::Null => Err(null_error("NaiveDate")),
            _ => Err(ConversionError("Expected date".to_string())),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::DateTime(v) => Ok(*v),
            Value::Date(v) => Ok(v.and_time(chrono::NaiveTime::MIN)),
            Value::Null => Err(null_error("NaiveDateTime")),
            _ => Err(ConversionError("Expected datetime".to_string())),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(None),
            _ => T::from_value(value).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_access_by_name() {
        let row: Row = [("id", Value::from(5)), ("Name", Value::from("beta"))]
            .into_iter()
            .collect();

        assert_eq!(row.get_by_name::<i64>("id").unwrap(), 5);
        assert_eq!(row.get_by_name::<String>("Name").unwrap(), "beta");
        assert!(row.get_by_name::<i64>("missing").is_err());
        assert_eq!(row.columns(), &["id".to_string(), "Name".to_string()]);
    }

    #[test]
    fn test_nullable_conversion() {
        let row = Row::new(vec!["recDate".into()], vec![Value::Null]);
        assert_eq!(row.get::<Option<NaiveDateTime>>(0).unwrap(), None);
        assert!(row.get::<NaiveDateTime>(0).is_err());
    }

    #[test]
    fn test_is_zero() {
        assert!(Value::Integer(0).is_zero());
        assert!(Value::Real(0.0).is_zero());
        assert!(!Value::Integer(3).is_zero());
        assert!(!Value::Text("0".into()).is_zero());
        assert!(!Value::Null.is_zero());
    }

    #[test]
    fn test_display_matches_operator_input() {
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Null.to_string(), "NULL");
        let dt = NaiveDate::from_ymd_opt(2021, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap();
        assert_eq!(Value::DateTime(dt).to_string(), "2021-03-04 05:06:07");
    }
}
