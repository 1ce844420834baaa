//! Schema - one complete snapshot of the store's structure.

use super::Table;
use crate::error::Error;
use crate::migration::MigrationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A snapshot of every top-level table, keyed by storage key.
///
/// The key is expected to equal the table's name. The map is ordered, so
/// iteration is lexicographic by key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Table definitions keyed by name.
    #[serde(default)]
    pub tables: BTreeMap<String, Table>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table, keyed by its own name.
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.insert(table.name.clone(), table);
        self
    }

    /// Insert a table under an explicit storage key.
    ///
    /// Returns the table previously stored under the key, if any.
    pub fn insert(&mut self, key: impl Into<String>, table: Table) -> Option<Table> {
        self.tables.insert(key.into(), table)
    }

    /// Get a table by name.
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Number of top-level tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if the schema has no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Check that every storage key equals the name of the table it holds.
    pub fn validate_keys(&self) -> Result<(), MigrationError> {
        match self.tables.iter().find(|(key, table)| **key != table.name) {
            Some((key, table)) => Err(MigrationError::SchemaKeyMismatch {
                key: key.clone(),
                name: table.name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Parse a schema from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Deserialization(e.to_string()))
    }

    /// Render the schema as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Read a schema from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize the schema to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        serde_json::to_vec(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize a schema from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(bytes).map_err(|e| Error::Deserialization(e.to_string()))
    }
}
