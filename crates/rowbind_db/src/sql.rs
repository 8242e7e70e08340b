//! SQL statement construction for schema objects.
//!
//! Identifiers are emitted as declared; table and column names come from
//! schema definitions, never from row data. All values travel as positional
//! parameters except the zero-key delete literal.

use crate::value::Value;

/// Positional parameter token of the target driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placeholder {
    /// `%s` (pyformat drivers, e.g. SQL Server via TDS bridges)
    #[default]
    Format,
    /// `?` (DuckDB, SQLite)
    Question,
}

impl Placeholder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Format => "%s",
            Self::Question => "?",
        }
    }
}

/// One SQL statement with its ordered parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    /// Leading SQL keyword, used as the span's `op` field.
    pub fn op(&self) -> &str {
        sql_op_name(&self.sql)
    }
}

/// `INSERT INTO t (a,b) VALUES (%s,%s)`
pub fn insert(table: &str, columns: &[&str], values: Vec<Value>, ph: Placeholder) -> Statement {
    let placeholders = vec![ph.as_str(); columns.len()].join(",");
    Statement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(","),
            placeholders
        ),
        params: values,
    }
}

/// `UPDATE t SET a=%s,b=%s WHERE pk=%s`; `key` is appended last.
pub fn update(
    table: &str,
    columns: &[&str],
    values: Vec<Value>,
    pk: &str,
    key: Value,
    ph: Placeholder,
) -> Statement {
    let assignments = columns
        .iter()
        .map(|c| format!("{}={}", c, ph.as_str()))
        .collect::<Vec<_>>()
        .join(",");
    let mut params = values;
    params.push(key);
    Statement {
        sql: format!(
            "UPDATE {} SET {} WHERE {}={}",
            table,
            assignments,
            pk,
            ph.as_str()
        ),
        params,
    }
}

/// `DELETE FROM t WHERE pk=%s`, or `WHERE pk=0` without parameters when the
/// key is zero (some drivers mis-bind a zero parameter).
pub fn delete(table: &str, pk: &str, key: Value, ph: Placeholder) -> Statement {
    if key.is_zero() {
        return Statement {
            sql: format!("DELETE FROM {} WHERE {}=0", table, pk),
            params: Vec::new(),
        };
    }
    Statement {
        sql: format!("DELETE FROM {} WHERE {}={}", table, pk, ph.as_str()),
        params: vec![key],
    }
}

/// `SELECT * FROM t`
pub fn select_all(table: &str) -> Statement {
    Statement {
        sql: format!("SELECT * FROM {}", table),
        params: Vec::new(),
    }
}

/// `SELECT * FROM t WHERE a=%s AND b=%s`, in filter order.
///
/// No filters selects every row.
pub fn select_where(table: &str, filters: &[(&str, Value)], ph: Placeholder) -> Statement {
    if filters.is_empty() {
        return select_all(table);
    }
    let predicate = filters
        .iter()
        .map(|(c, _)| format!("{}={}", c, ph.as_str()))
        .collect::<Vec<_>>()
        .join(" AND ");
    Statement {
        sql: format!("SELECT * FROM {} WHERE {}", table, predicate),
        params: filters.iter().map(|(_, v)| v.clone()).collect(),
    }
}

pub(crate) fn sql_op_name(sql: &str) -> &str {
    sql.split_whitespace().next().unwrap_or("unknown")
}

pub(crate) fn hash_sql(sql: &str) -> String {
    // FNV-1a 64-bit hash for low-cardinality, stable identification.
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in sql.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    format!("{:016x}", hash)
}
