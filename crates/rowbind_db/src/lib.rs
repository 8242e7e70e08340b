//! Typed schema objects bound to relational table rows.
//!
//! A [`SchemaDef`] describes a table: its name and an ordered list of
//! [`TypedField`] declarations. A [`SchemaObject`] is one entity built from
//! that description; it validates values on request, generates the SQL for
//! its own insert/update/delete, and tracks the last persisted state so a
//! changed primary key still addresses the original row.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rowbind_db::{tables, DuckDbConnector, SchemaObject, Value};
//!
//! let db = DuckDbConnector::new("exchange.duckdb");
//! let schema = tables::tron_pos_web_classifications();
//!
//! let mut obj = SchemaObject::new(&schema);
//! obj.set_field("id", 1)?;
//! obj.set_field("tpfirm_id", 10)?;
//! obj.set_field("TopWebClassificationGUID", "9f1c")?;
//! obj.ensure_valid()?;
//! obj.insert(&db)?;
//!
//! let rows = SchemaObject::fetch_where(&db, &schema, &[("tpfirm_id", Value::from(10))])?;
//! ```

mod connection;
mod error;
mod field;
mod field_set;
mod object;
mod schema;
pub mod sql;
pub mod tables;
mod value;

#[cfg(feature = "duckdb")]
mod backend;
#[cfg(feature = "duckdb")]
pub mod lock;

#[cfg(test)]
mod testing;

pub use connection::{ping, run_statement, Connection, ConnectionParams, Connector, ExecOutcome};
pub use error::{
    DatabaseError, DatabaseErrorKind, Error, Result, SchemaError, ValidationError,
};
pub use field::{FieldKind, TypedField};
pub use field_set::FieldSet;
pub use object::{CascadeOutcome, SchemaObject};
pub use schema::{Reference, SchemaBuilder, SchemaDef};
pub use sql::{Placeholder, Statement};
pub use value::{ConversionError, FromValue, Row, Value};

#[cfg(feature = "duckdb")]
pub use backend::{DuckDbConnection, DuckDbConnector};
