//! DuckDB connection boundary.
//!
//! - One connection per operation, opened inside an explicit transaction
//! - Single-writer enforced via file lock for the connection's lifetime
//! - Closing without commit rolls the transaction back

use crate::connection::{ConnectionParams, Connection, Connector, ExecOutcome};
use crate::error::{DatabaseError, Result};
use crate::lock::DbLock;
use crate::sql::{sql_op_name, Placeholder};
use crate::value::{Row, Value};
use chrono::{Datelike, NaiveDate, NaiveTime};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Days between 0001-01-01 (CE day 1) and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Opens connections to one DuckDB database file.
#[derive(Debug, Clone)]
pub struct DuckDbConnector {
    path: PathBuf,
}

impl DuckDbConnector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use `params.database` as the database file path.
    ///
    /// Host and credentials are not used by an embedded database.
    pub fn from_params(params: &ConnectionParams) -> Self {
        Self::new(&params.database)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run a multi-statement script (table setup, fixtures) in one connection.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        let mut conn = self.open()?;
        let result = conn.execute_batch(sql).and_then(|()| conn.commit());
        let closed = conn.close();
        result.and(closed)
    }
}

impl Connector for DuckDbConnector {
    type Conn = DuckDbConnection;

    fn open(&self) -> Result<DuckDbConnection> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::connection(format!("{}: {}", parent.display(), e))
            })?;
        }

        let lock = DbLock::acquire(&self.path)
            .map_err(|e| DatabaseError::connection(e.to_string()))?;
        let conn = duckdb::Connection::open(&self.path)
            .map_err(|e| DatabaseError::connection(e.to_string()))?;
        conn.execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DatabaseError::connection(e.to_string()))?;
        info!(path = %self.path.display(), "Opened DuckDB connection");

        Ok(DuckDbConnection {
            conn,
            committed: false,
            lock,
        })
    }

    fn placeholder(&self) -> Placeholder {
        Placeholder::Question
    }
}

/// An open DuckDB connection with a pending transaction.
pub struct DuckDbConnection {
    // dropped before the lock
    conn: duckdb::Connection,
    committed: bool,
    lock: DbLock,
}

impl std::fmt::Debug for DuckDbConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDbConnection")
            .field("committed", &self.committed)
            .field("lock", &self.lock)
            .finish()
    }
}

impl DuckDbConnection {
    fn execute_batch(&mut self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql).map_err(statement_error)?;
        Ok(())
    }

    fn query_rows(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let mut stmt = self.conn.prepare(sql).map_err(statement_error)?;
        let duckdb_params = to_duckdb_params(params);
        let param_refs: Vec<&dyn duckdb::ToSql> = duckdb_params
            .iter()
            .map(|v| v as &dyn duckdb::ToSql)
            .collect();

        let mut rows_iter = stmt.query(param_refs.as_slice()).map_err(statement_error)?;

        let (column_count, columns) = if let Some(stmt_ref) = rows_iter.as_ref() {
            let count = stmt_ref.column_count();
            let cols: Vec<String> = (0..count)
                .map(|i| {
                    stmt_ref
                        .column_name(i)
                        .map(|s| s.to_string())
                        .unwrap_or_else(|_| format!("col{}", i))
                })
                .collect();
            (count, cols)
        } else {
            return Ok(Vec::new());
        };

        let mut result = Vec::new();
        while let Some(row) = rows_iter.next().map_err(statement_error)? {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                values.push(from_duckdb_value(row, i).map_err(statement_error)?);
            }
            result.push(Row::new(columns.clone(), values));
        }
        Ok(result)
    }
}

impl Connection for DuckDbConnection {
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecOutcome> {
        if returns_rows(sql) {
            let rows = self.query_rows(sql, params)?;
            return Ok(ExecOutcome {
                rows_affected: rows.len() as u64,
                rows,
            });
        }

        let mut stmt = self.conn.prepare(sql).map_err(statement_error)?;
        let duckdb_params = to_duckdb_params(params);
        let param_refs: Vec<&dyn duckdb::ToSql> = duckdb_params
            .iter()
            .map(|v| v as &dyn duckdb::ToSql)
            .collect();
        let affected = stmt
            .execute(param_refs.as_slice())
            .map_err(statement_error)?;
        Ok(ExecOutcome {
            rows_affected: affected as u64,
            rows: Vec::new(),
        })
    }

    fn commit(&mut self) -> Result<()> {
        self.conn
            .execute_batch("COMMIT")
            .map_err(statement_error)?;
        self.committed = true;
        Ok(())
    }

    fn close(self) -> Result<()> {
        let DuckDbConnection {
            conn,
            committed,
            lock,
        } = self;
        if !committed {
            if let Err(e) = conn.execute_batch("ROLLBACK") {
                debug!(error = %e, "Rollback on close failed");
            }
        }
        conn.close()
            .map_err(|(_, e)| DatabaseError::connection(e.to_string()))?;
        drop(lock);
        Ok(())
    }
}

fn statement_error(err: duckdb::Error) -> DatabaseError {
    DatabaseError::classified(err.to_string())
}

fn returns_rows(sql: &str) -> bool {
    let op = sql_op_name(sql);
    ["SELECT", "WITH", "FROM", "PRAGMA", "SHOW", "DESCRIBE"]
        .iter()
        .any(|kw| op.eq_ignore_ascii_case(kw))
}

fn to_duckdb_params(params: &[Value]) -> Vec<duckdb::types::Value> {
    params
        .iter()
        .map(|p| match p {
            Value::Null => duckdb::types::Value::Null,
            Value::Bool(v) => duckdb::types::Value::Boolean(*v),
            Value::Integer(v) => duckdb::types::Value::BigInt(*v),
            Value::Real(v) => duckdb::types::Value::Double(*v),
            Value::Text(v) => duckdb::types::Value::Text(v.clone()),
            Value::Blob(v) => duckdb::types::Value::Blob(v.clone()),
            Value::Date(d) => {
                duckdb::types::Value::Date32(d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
            }
            Value::DateTime(v) => {
                let micros = v.and_utc().timestamp_micros();
                duckdb::types::Value::Timestamp(duckdb::types::TimeUnit::Microsecond, micros)
            }
        })
        .collect()
}

fn to_micros(unit: duckdb::types::TimeUnit, v: i64) -> i64 {
    match unit {
        duckdb::types::TimeUnit::Second => v * 1_000_000,
        duckdb::types::TimeUnit::Millisecond => v * 1_000,
        duckdb::types::TimeUnit::Microsecond => v,
        duckdb::types::TimeUnit::Nanosecond => v / 1_000,
    }
}

/// Integers wider than `i64` keep their digits as text instead of wrapping.
fn wide_integer<T>(v: T) -> Value
where
    T: TryInto<i64> + ToString + Copy,
{
    v.try_into()
        .map(Value::Integer)
        .unwrap_or_else(|_| Value::Text(v.to_string()))
}

fn from_duckdb_value(row: &duckdb::Row, index: usize) -> std::result::Result<Value, duckdb::Error> {
    use duckdb::types::ValueRef;

    match row.get_ref(index)? {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Boolean(v) => Ok(Value::Bool(v)),
        ValueRef::TinyInt(v) => Ok(Value::Integer(v as i64)),
        ValueRef::SmallInt(v) => Ok(Value::Integer(v as i64)),
        ValueRef::Int(v) => Ok(Value::Integer(v as i64)),
        ValueRef::BigInt(v) => Ok(Value::Integer(v)),
        ValueRef::HugeInt(v) => Ok(wide_integer(v)),
        ValueRef::UTinyInt(v) => Ok(Value::Integer(v as i64)),
        ValueRef::USmallInt(v) => Ok(Value::Integer(v as i64)),
        ValueRef::UInt(v) => Ok(Value::Integer(v as i64)),
        ValueRef::UBigInt(v) => Ok(wide_integer(v)),
        ValueRef::Float(v) => Ok(Value::Real(v as f64)),
        ValueRef::Double(v) => Ok(Value::Real(v)),
        ValueRef::Text(v) => Ok(Value::Text(String::from_utf8_lossy(v).to_string())),
        ValueRef::Blob(v) => Ok(Value::Blob(v.to_vec())),
        ValueRef::Timestamp(unit, v) => {
            let micros = to_micros(unit, v);
            let secs = micros.div_euclid(1_000_000);
            let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
            match chrono::DateTime::from_timestamp(secs, nanos) {
                Some(dt) => Ok(Value::DateTime(dt.naive_utc())),
                None => Ok(Value::Integer(micros)),
            }
        }
        ValueRef::Date32(days) => {
            match NaiveDate::from_num_days_from_ce_opt(UNIX_EPOCH_DAYS_FROM_CE + days) {
                Some(date) => Ok(Value::Date(date)),
                None => Ok(Value::Integer(days as i64)),
            }
        }
        ValueRef::Time64(unit, v) => {
            let micros = to_micros(unit, v);
            let secs = (micros / 1_000_000) as u32;
            let nanos = ((micros % 1_000_000) * 1_000) as u32;
            match NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos) {
                Some(time) => Ok(Value::Text(time.format("%H:%M:%S%.6f").to_string())),
                None => Ok(Value::Integer(micros)),
            }
        }
        other => {
            tracing::warn!(
                "DuckDB type {:?} at column {} mapped to debug string",
                std::mem::discriminant(&other),
                index
            );
            Ok(Value::Text(format!("{:?}", other)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{ping, run_statement};
    use crate::error::DatabaseErrorKind;
    use crate::sql::{self, Statement};
    use tempfile::TempDir;

    fn connector(tmp: &TempDir) -> DuckDbConnector {
        let connector = DuckDbConnector::new(tmp.path().join("exchange.duckdb"));
        connector
            .execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, name VARCHAR(20), seen TIMESTAMP)")
            .unwrap();
        connector
    }

    #[test]
    fn test_params_round_trip_through_duckdb() {
        let tmp = TempDir::new().unwrap();
        let connector = connector(&tmp);
        let seen = NaiveDate::from_ymd_opt(2022, 2, 3)
            .unwrap()
            .and_hms_opt(4, 5, 6)
            .unwrap();

        let insert = sql::insert(
            "t",
            &["id", "name", "seen"],
            vec![Value::from(1), Value::from("one"), Value::DateTime(seen)],
            connector.placeholder(),
        );
        assert_eq!(run_statement(&connector, &insert).unwrap().rows_affected, 1);

        let rows = run_statement(&connector, &sql::select_all("t")).unwrap().rows;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].columns(), &["id", "name", "seen"]);
        assert_eq!(rows[0].get_raw(0), Some(&Value::Integer(1)));
        assert_eq!(rows[0].get_raw(1), Some(&Value::from("one")));
        assert_eq!(rows[0].get_raw(2), Some(&Value::DateTime(seen)));
    }

    #[test]
    fn test_uncommitted_work_is_rolled_back_on_close() {
        let tmp = TempDir::new().unwrap();
        let connector = connector(&tmp);

        let mut conn = connector.open().unwrap();
        conn.execute("INSERT INTO t (id, name) VALUES (?, ?)", &[Value::from(9), Value::from("x")])
            .unwrap();
        conn.close().unwrap();

        let rows = run_statement(&connector, &sql::select_all("t")).unwrap().rows;
        assert!(rows.is_empty());
    }

    #[test]
    fn test_duplicate_key_is_classified() {
        let tmp = TempDir::new().unwrap();
        let connector = connector(&tmp);
        let insert = sql::insert(
            "t",
            &["id", "name"],
            vec![Value::from(1), Value::from("one")],
            connector.placeholder(),
        );
        run_statement(&connector, &insert).unwrap();

        let err = run_statement(&connector, &insert).unwrap_err();
        assert_eq!(
            err.database_kind(),
            Some(DatabaseErrorKind::DuplicatePrimaryKey)
        );
    }

    #[test]
    fn test_bad_statement_is_statement_failure() {
        let tmp = TempDir::new().unwrap();
        let connector = connector(&tmp);
        let err = run_statement(&connector, &sql::select_all("missing_table")).unwrap_err();
        assert_eq!(err.database_kind(), Some(DatabaseErrorKind::StatementFailure));
        // the failed statement released the connection and its lock
        assert!(ping(&connector).is_ok());
    }

    #[test]
    fn test_locked_database_is_connection_failure() {
        let tmp = TempDir::new().unwrap();
        let connector = connector(&tmp);
        let _held = connector.open().unwrap();

        let err = ping(&connector).unwrap_err();
        assert_eq!(err.database_kind(), Some(DatabaseErrorKind::ConnectionFailure));
    }

    #[test]
    fn test_wide_integers_do_not_wrap() {
        assert_eq!(wide_integer(42_i128), Value::Integer(42));
        assert_eq!(wide_integer(u64::MAX), Value::Text("18446744073709551615".into()));
        assert_eq!(
            wide_integer(i128::from(i64::MIN) - 1),
            Value::Text("-9223372036854775809".into())
        );

        let tmp = TempDir::new().unwrap();
        let connector = connector(&tmp);
        let stmt = Statement {
            sql: "SELECT 7::HUGEINT AS small, 18446744073709551615::UBIGINT AS big".into(),
            params: Vec::new(),
        };
        let rows = run_statement(&connector, &stmt).unwrap().rows;
        assert_eq!(rows[0].get_raw(0), Some(&Value::Integer(7)));
        assert_eq!(
            rows[0].get_raw(1),
            Some(&Value::Text("18446744073709551615".into()))
        );
    }

    #[test]
    fn test_date_param_conversion() {
        let d = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        let params = to_duckdb_params(&[Value::Date(d)]);
        assert!(matches!(params[0], duckdb::types::Value::Date32(1)));
    }
}
