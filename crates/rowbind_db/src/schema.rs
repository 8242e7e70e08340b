//! Immutable table descriptors.

use crate::error::{Error, Result, SchemaError};
use crate::field::TypedField;
use crate::field_set::FieldSet;
use std::sync::Arc;

/// Table name plus the prototype field layout every instance starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDef {
    table: String,
    prototype: FieldSet,
}

impl SchemaDef {
    pub fn builder(table: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            table: table.into(),
            fields: Vec::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Declared fields, in column order.
    pub fn fields(&self) -> &FieldSet {
        &self.prototype
    }

    /// Primary key field name.
    pub fn primary_key(&self) -> Result<&str> {
        self.prototype
            .primary_key()
            .map(|(name, _)| name)
            .ok_or_else(|| Error::missing_primary_key(&self.table))
    }

    /// Fresh field set holding the declared default values.
    pub fn instantiate(&self) -> FieldSet {
        self.prototype.clone()
    }
}

/// A column of another table that holds this table's primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub schema: Arc<SchemaDef>,
    pub column: String,
}

impl Reference {
    pub fn new(schema: Arc<SchemaDef>, column: impl Into<String>) -> Self {
        Self {
            schema,
            column: column.into(),
        }
    }
}

/// Builder for [`SchemaDef`].
#[derive(Debug)]
pub struct SchemaBuilder {
    table: String,
    fields: Vec<(String, TypedField)>,
}

impl SchemaBuilder {
    pub fn field(mut self, name: impl Into<String>, field: TypedField) -> Self {
        self.fields.push((name.into(), field));
        self
    }

    /// Finish the descriptor. A missing primary key is not an error here;
    /// it surfaces from the operations that need one.
    pub fn build(self) -> std::result::Result<Arc<SchemaDef>, SchemaError> {
        let mut prototype = FieldSet::new();
        for (name, field) in self.fields {
            prototype
                .push(name, field)
                .map_err(|field| SchemaError::DuplicateField {
                    table: self.table.clone(),
                    field,
                })?;
        }
        Ok(Arc::new(SchemaDef {
            table: self.table,
            prototype,
        }))
    }
}
