//! Connection boundary consumed by schema objects.
//!
//! Every operation runs exactly one statement inside one connection
//! lifetime: open, execute, commit, close. The connection is closed on
//! every exit path; closing without a commit rolls the statement back.

use crate::error::Result;
use crate::sql::{hash_sql, Placeholder, Statement};
use crate::value::{Row, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug_span, warn};

/// Opaque connection settings.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    pub host: String,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Result of executing one statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecOutcome {
    pub rows_affected: u64,
    pub rows: Vec<Row>,
}

/// An open connection.
pub trait Connection {
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecOutcome>;

    fn commit(&mut self) -> Result<()>;

    /// Release the connection. Uncommitted work is discarded.
    fn close(self) -> Result<()>;
}

/// Factory for connections to one database.
pub trait Connector {
    type Conn: Connection;

    fn open(&self) -> Result<Self::Conn>;

    fn placeholder(&self) -> Placeholder;
}

/// Run one statement in its own connection lifetime.
pub fn run_statement<C: Connector>(connector: &C, statement: &Statement) -> Result<ExecOutcome> {
    let sql_hash = hash_sql(&statement.sql);
    let span = debug_span!(
        "db.exec",
        op = statement.op(),
        sql_hash = %sql_hash,
        params = statement.params.len(),
        duration_ms = tracing::field::Empty
    );
    let _guard = span.enter();
    let start = Instant::now();

    let mut conn = connector.open()?;
    let result = conn
        .execute(&statement.sql, &statement.params)
        .and_then(|outcome| conn.commit().map(|()| outcome));

    match result {
        Ok(outcome) => {
            // committed work stands even if the release fails
            if let Err(close_err) = conn.close() {
                warn!(error = %close_err, "Failed to close connection after commit");
            }
            span.record("duration_ms", start.elapsed().as_millis() as u64);
            Ok(outcome)
        }
        Err(err) => {
            if let Err(close_err) = conn.close() {
                warn!(error = %close_err, "Failed to close connection after error");
            }
            Err(err)
        }
    }
}

/// Open and immediately close a connection.
pub fn ping<C: Connector>(connector: &C) -> Result<()> {
    connector.open()?.close()
}
