//! Typed column fields.
//!
//! A [`TypedField`] couples a column's [`FieldKind`], its nullability and key
//! role with the value currently held for it. Values are stored as given;
//! [`TypedField::is_value_valid`] is the explicit domain check and
//! [`TypedField::storage_value`] the form handed to the driver.

use crate::value::Value;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const INT32_LOWER: i64 = -(1 << 31);
const INT32_UPPER: i64 = (1 << 31) - 1;

const DATE_INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y"];
const DATETIME_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Column type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Text shorter than `max_len` characters
    Varchar { max_len: usize },
    Int32,
    Int64,
    /// Boolean stored as 0/1
    Bit,
    /// Date or date-time; dates are widened to midnight for storage
    DateTime,
}

impl FieldKind {
    /// Human-readable type label.
    pub fn descriptor(&self) -> String {
        match self {
            Self::Varchar { max_len } => format!("VARCHAR({})", max_len),
            Self::Int32 => "INT".to_string(),
            Self::Int64 => "BIG INT".to_string(),
            Self::Bit => "BOOL".to_string(),
            Self::DateTime => "DATETIME".to_string(),
        }
    }

    /// Domain predicate for non-null values.
    ///
    /// Integer bounds are exclusive on both ends, so the largest
    /// representable value of each width is rejected.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Varchar { max_len }, Value::Text(s)) => s.chars().count() < *max_len,
            (Self::Int32, Value::Integer(v)) => *v > INT32_LOWER && *v < INT32_UPPER,
            (Self::Int64, Value::Integer(v)) => *v > i64::MIN && *v < i64::MAX,
            (Self::Bit, v) => bit_flag(v).is_some(),
            (Self::DateTime, Value::Date(_) | Value::DateTime(_)) => true,
            _ => false,
        }
    }

    /// Serialization-ready form of `value`.
    ///
    /// Bit values outside `{true, false, "True", "False", 1, 0}` have no
    /// storage form and become `Null`.
    pub fn to_storage(&self, value: &Value) -> Value {
        match self {
            Self::Bit => match bit_flag(value) {
                Some(flag) => Value::Integer(flag as i64),
                None => Value::Null,
            },
            Self::DateTime => match value {
                Value::Date(d) => Value::DateTime(d.and_time(NaiveTime::MIN)),
                other => other.clone(),
            },
            Self::Varchar { .. } | Self::Int32 | Self::Int64 => value.clone(),
        }
    }

    /// Convert operator-entered text into a value of this kind.
    ///
    /// Text that does not parse is kept as [`Value::Text`] so the field
    /// reports itself invalid instead of failing here.
    pub fn parse_input(&self, input: &str) -> Value {
        let trimmed = input.trim();
        match self {
            Self::Varchar { .. } => Value::Text(input.to_string()),
            Self::Int32 | Self::Int64 => trimmed
                .parse::<i64>()
                .map(Value::Integer)
                .unwrap_or_else(|_| Value::Text(input.to_string())),
            Self::Bit => match trimmed {
                "True" | "true" => Value::Bool(true),
                "False" | "false" => Value::Bool(false),
                "1" => Value::Integer(1),
                "0" => Value::Integer(0),
                _ => Value::Text(input.to_string()),
            },
            Self::DateTime => parse_datetime(trimmed)
                .map(Value::DateTime)
                .or_else(|| parse_date(trimmed).map(Value::Date))
                .unwrap_or_else(|| Value::Text(input.to_string())),
        }
    }
}

fn bit_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Text(s) if s == "True" => Some(true),
        Value::Text(s) if s == "False" => Some(false),
        Value::Integer(1) => Some(true),
        Value::Integer(0) => Some(false),
        _ => None,
    }
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
}

fn parse_datetime(input: &str) -> Option<NaiveDateTime> {
    DATETIME_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
}

/// One column's declaration plus its current value.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedField {
    kind: FieldKind,
    nullable: bool,
    primary_key: bool,
    foreign_key: bool,
    value: Value,
}

impl TypedField {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            nullable: false,
            primary_key: false,
            foreign_key: false,
            value: Value::Null,
        }
    }

    pub fn varchar(max_len: usize) -> Self {
        Self::new(FieldKind::Varchar { max_len })
    }

    pub fn int32() -> Self {
        Self::new(FieldKind::Int32)
    }

    pub fn int64() -> Self {
        Self::new(FieldKind::Int64)
    }

    pub fn bit() -> Self {
        Self::new(FieldKind::Bit)
    }

    pub fn datetime() -> Self {
        Self::new(FieldKind::DateTime)
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn foreign_key(mut self) -> Self {
        self.foreign_key = true;
        self
    }

    /// Initial value carried by the declaration.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_foreign_key(&self) -> bool {
        self.foreign_key
    }

    pub fn descriptor(&self) -> String {
        self.kind.descriptor()
    }

    /// Store `value` without checking it.
    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn storage_value(&self) -> Value {
        self.kind.to_storage(&self.value)
    }

    pub fn is_value_valid(&self) -> bool {
        (self.nullable && self.value.is_null()) || self.kind.accepts(&self.value)
    }
}
