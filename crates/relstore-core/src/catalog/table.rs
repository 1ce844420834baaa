//! Table definitions.

use super::field::Field;
use super::join::Join;
use serde::{Deserialize, Serialize};

/// A table definition: fields, joins to other tables, and owned sub-tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name (unique among siblings).
    pub name: String,
    /// Field definitions.
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Joins to other tables.
    #[serde(default)]
    pub joins: Vec<Join>,
    /// Nested tables owned by this table.
    #[serde(default)]
    pub tables: Vec<Table>,
    /// Whether rows of this table must be unique.
    #[serde(default)]
    pub unique: bool,
}

impl Table {
    /// Create an empty table definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            joins: Vec::new(),
            tables: Vec::new(),
            unique: false,
        }
    }

    /// Add a field to the table.
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a join to the table.
    pub fn with_join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// Add a nested table.
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Enforce row uniqueness.
    pub fn with_unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get the join pointing at the given table.
    pub fn get_join(&self, table: &str) -> Option<&Join> {
        self.joins.iter().find(|j| j.table == table)
    }

    /// Get a nested table by name.
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}
