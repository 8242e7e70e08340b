//! Command implementations for the `rowbind` binary.
//!
//! Commands are thin: they resolve a table definition, turn operator text
//! into typed values and call the schema object operations in `rowbind_db`.

pub mod check;
pub mod config;
pub mod context;
pub mod delete;
pub mod error;
pub mod input;
pub mod insert;
pub mod list;
pub mod output;
pub mod tables;
pub mod update;

use error::HelpfulError;
use rowbind_db::SchemaDef;
use std::sync::Arc;
use tracing::error;

/// Log a core error in full and turn it into an operator report.
pub fn report(err: impl Into<rowbind_db::Error>, table: Option<&str>) -> anyhow::Error {
    let err = err.into();
    error!(table = table.unwrap_or("-"), error = %err, "Operation failed");
    anyhow::Error::new(HelpfulError::from_db(&err, table))
}

/// Table definition for a name typed on the command line.
pub fn lookup_table(name: &str) -> anyhow::Result<Arc<SchemaDef>> {
    rowbind_db::tables::by_name(name).map_err(|e| report(e, None))
}
