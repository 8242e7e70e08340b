//! Operator-facing error reports.
//!
//! Every report carries what went wrong, optional context (usually the raw
//! driver message) and suggestions for a next step.

use rowbind_db::{DatabaseErrorKind, Error, SchemaError, SchemaObject};
use std::fmt;

#[derive(Debug)]
pub struct HelpfulError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Report for a failed core operation on `table`.
    pub fn from_db(err: &Error, table: Option<&str>) -> Self {
        let report = Self::new(err.user_message());
        let list_hint = table
            .map(|t| format!("TRY: Inspect existing rows: rowbind list {}", t))
            .unwrap_or_else(|| "TRY: List known tables: rowbind tables".to_string());

        match err {
            Error::Database(db) => {
                let report = report.with_context(db.message.clone());
                match db.kind {
                    DatabaseErrorKind::DuplicatePrimaryKey => report
                        .with_suggestion("TRY: Choose a primary key value that is not in use")
                        .with_suggestion(list_hint),
                    DatabaseErrorKind::ForeignKeyViolation => report
                        .with_suggestion("TRY: Check that the referenced record exists")
                        .with_suggestion("TRY: Remove referencing rows before deleting a parent"),
                    DatabaseErrorKind::ConnectionFailure | DatabaseErrorKind::StatementFailure => {
                        report
                            .with_suggestion("TRY: Test the connection: rowbind check")
                            .with_suggestion("TRY: Review the settings: rowbind config")
                    }
                }
            }
            Error::Schema(SchemaError::UnknownTable(_)) => {
                report.with_suggestion("TRY: List known tables: rowbind tables")
            }
            Error::Schema(SchemaError::FieldNotFound { .. }) => {
                report.with_suggestion("TRY: Show the columns of each table: rowbind tables")
            }
            Error::Schema(_) => report,
            Error::Validation(_) => report.with_suggestion(list_hint),
        }
    }

    /// Per-field report for an object whose values fail validation.
    ///
    /// Returns `None` when every field is valid.
    pub fn invalid_fields(obj: &SchemaObject) -> Option<Self> {
        let invalid = obj.validate_all();
        if invalid.is_empty() {
            return None;
        }

        let mut report = Self::new(format!("Invalid values for {}", obj.table()))
            .with_context(format!("{} field(s) failed validation", invalid.len()));
        for name in &invalid {
            if let Ok(field) = obj.typed_field(name) {
                let expected = if field.is_nullable() {
                    format!("{} or NULL", field.descriptor())
                } else {
                    field.descriptor()
                };
                report = report.with_suggestion(format!(
                    "{}: expected {}, got {}",
                    name,
                    expected,
                    field.value()
                ));
            }
        }
        Some(report)
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}
