//! Error types for the schema object layer.

use thiserror::Error;

/// Schema object operation result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for every core operation.
#[derive(Error, Debug)]
pub enum Error {
    /// One or more field values are outside their kind's domain
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Schema definition or field lookup problem
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Driver failure while connecting, executing or committing
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Fields whose current values fail their kind's predicate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid value for {table}: {}", fields.join(", "))]
pub struct ValidationError {
    pub table: String,
    pub fields: Vec<String>,
}

/// Contract errors in schema definitions or field access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Primary key not defined for table {table}")]
    MissingPrimaryKey { table: String },

    #[error("Field '{field}' not found in table {table}")]
    FieldNotFound { table: String, field: String },

    #[error("Field '{field}' declared twice in table {table}")]
    DuplicateField { table: String, field: String },

    #[error("Unknown table: {0}")]
    UnknownTable(String),
}

/// Classification of driver failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseErrorKind {
    /// A row with the same primary key already exists
    DuplicatePrimaryKey,
    /// The row references (or is referenced by) a missing/related row
    ForeignKeyViolation,
    /// The database could not be reached or opened
    ConnectionFailure,
    /// Any other failure while executing or committing a statement
    StatementFailure,
}

impl DatabaseErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuplicatePrimaryKey => "duplicate_primary_key",
            Self::ForeignKeyViolation => "foreign_key_violation",
            Self::ConnectionFailure => "connection_failure",
            Self::StatementFailure => "statement_failure",
        }
    }

    /// Classify a driver error message.
    ///
    /// Used for statement and commit failures; connection failures are
    /// classified at the point the connection is opened.
    pub fn classify_message(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("foreign key") {
            Self::ForeignKeyViolation
        } else if lower.contains("primary key")
            || lower.contains("duplicate key")
            || lower.contains("unique constraint")
        {
            Self::DuplicatePrimaryKey
        } else {
            Self::StatementFailure
        }
    }

    /// Classify a SQL Server error number (2627 = PK violation, 547 = FK conflict).
    pub fn from_sqlserver_code(code: i32) -> Self {
        match code {
            2627 | 2601 => Self::DuplicatePrimaryKey,
            547 => Self::ForeignKeyViolation,
            _ => Self::StatementFailure,
        }
    }

    pub fn is_constraint(&self) -> bool {
        matches!(self, Self::DuplicatePrimaryKey | Self::ForeignKeyViolation)
    }
}

impl std::fmt::Display for DatabaseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Wrapped driver failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Database error ({kind}): {message}")]
pub struct DatabaseError {
    pub kind: DatabaseErrorKind,
    pub message: String,
}

impl DatabaseError {
    pub fn new(kind: DatabaseErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create a connection failure.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(DatabaseErrorKind::ConnectionFailure, message)
    }

    /// Create an error whose kind is derived from the driver message.
    pub fn classified(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(DatabaseErrorKind::classify_message(&message), message)
    }
}

impl Error {
    pub fn missing_primary_key(table: impl Into<String>) -> Self {
        Self::Schema(SchemaError::MissingPrimaryKey {
            table: table.into(),
        })
    }

    pub fn field_not_found(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Schema(SchemaError::FieldNotFound {
            table: table.into(),
            field: field.into(),
        })
    }

    /// Driver classification, if this is a database error.
    pub fn database_kind(&self) -> Option<DatabaseErrorKind> {
        match self {
            Self::Database(e) => Some(e.kind),
            _ => None,
        }
    }

    /// Operator-facing message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(e) => match e.kind {
                DatabaseErrorKind::DuplicatePrimaryKey => {
                    "An object with this primary key already exists".to_string()
                }
                DatabaseErrorKind::ForeignKeyViolation => {
                    "The object does not reference an existing record".to_string()
                }
                DatabaseErrorKind::ConnectionFailure | DatabaseErrorKind::StatementFailure => {
                    "Cannot reach the database".to_string()
                }
            },
            Self::Validation(e) => format!("Invalid values: {}", e.fields.join(", ")),
            Self::Schema(e) => e.to_string(),
        }
    }
}
