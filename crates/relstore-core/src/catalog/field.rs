//! Field definitions for tables.

use super::types::FieldType;
use serde::{Deserialize, Serialize};

/// A field definition within a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name (identity key within its table).
    pub name: String,
    /// Field data type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether values of this field must be unique across rows.
    #[serde(default)]
    pub unique: bool,
}

impl Field {
    /// Create a new non-unique field.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            unique: false,
        }
    }

    /// Create a unique field.
    pub fn unique(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            unique: true,
        }
    }

    /// Set whether the field is unique.
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::ScalarType;

    #[test]
    fn test_field_builder() {
        let field = Field::new("version", FieldType::scalar(ScalarType::String));

        assert_eq!(field.name, "version");
        assert!(!field.unique);

        let field = field.with_unique(true);
        assert!(field.unique);
        assert_eq!(field.field_type, FieldType::scalar(ScalarType::String));
    }

    #[test]
    fn test_field_json_shape() {
        let field: Field = serde_json::from_str(r#"{"name": "sha", "type": "string"}"#).unwrap();

        assert_eq!(field, Field::new("sha", FieldType::scalar(ScalarType::String)));
    }
}
