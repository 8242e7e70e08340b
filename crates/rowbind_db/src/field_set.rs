//! Insertion-ordered collection of a table's fields.

use crate::field::TypedField;
use crate::value::Value;
use std::collections::HashMap;

/// Ordered mapping of field name to [`TypedField`].
///
/// Order determines column order in generated SQL and value order in
/// parameter lists. Cloning produces fully independent storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    entries: Vec<(String, TypedField)>,
    index: HashMap<String, usize>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. Fails with the name if it is already taken.
    pub(crate) fn push(&mut self, name: impl Into<String>, field: TypedField) -> Result<(), String> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(name);
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, field));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TypedField> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut TypedField> {
        match self.index.get(name) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Storage values in field order.
    pub fn storage_values(&self) -> Vec<Value> {
        self.entries.iter().map(|(_, f)| f.storage_value()).collect()
    }

    /// The first field flagged as primary key.
    pub fn primary_key(&self) -> Option<(&str, &TypedField)> {
        self.entries
            .iter()
            .find(|(_, f)| f.is_primary_key())
            .map(|(n, f)| (n.as_str(), f))
    }

    /// Names of fields whose values fail their kind's predicate, in field order.
    pub fn invalid_fields(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, f)| !f.is_value_valid())
            .map(|(n, _)| n.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedField)> {
        self.entries.iter().map(|(n, f)| (n.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
