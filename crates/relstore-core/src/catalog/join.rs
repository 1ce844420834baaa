//! Join definitions between tables.

use serde::{Deserialize, Serialize};

/// A reference from one table to another.
///
/// Joins are identified by the table they point at, so a table holds at most
/// one join per target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Join {
    /// Name of the referenced table.
    pub table: String,
    /// One-to-one when set, one-to-many otherwise.
    #[serde(default)]
    pub unique: bool,
}

impl Join {
    /// Create a one-to-many join.
    pub fn one_to_many(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            unique: false,
        }
    }

    /// Create a one-to-one join.
    pub fn one_to_one(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            unique: true,
        }
    }
}
