//! Migration-specific error types.

use thiserror::Error;

/// Migration-specific errors.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A schema stores a table under a key other than its name.
    #[error("map key '{key}' and table name '{name}' do not match")]
    SchemaKeyMismatch {
        /// The storage key.
        key: String,
        /// The name declared by the table.
        name: String,
    },

    /// A requested schema version is not in the catalog.
    #[error("schema version {version} not found")]
    VersionNotFound {
        /// The missing version.
        version: u64,
    },

    /// The catalog moved to another version between planning and commit.
    #[error("schema version conflict: expected {expected}, found {found}")]
    VersionConflict {
        /// Version the plan was computed against.
        expected: u64,
        /// Version recorded in the catalog.
        found: u64,
    },

    /// The changelog drops data and destructive changes were not allowed.
    #[error("changelog contains {count} destructive change(s)")]
    DestructiveChanges {
        /// Number of destructive entries.
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MigrationError::SchemaKeyMismatch {
            key: "foo".to_string(),
            name: "bar".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("foo"));
        assert!(msg.contains("bar"));

        let err = MigrationError::VersionNotFound { version: 7 };
        assert_eq!(err.to_string(), "schema version 7 not found");

        let err = MigrationError::VersionConflict {
            expected: 2,
            found: 3,
        };
        assert_eq!(
            err.to_string(),
            "schema version conflict: expected 2, found 3"
        );
    }
}
