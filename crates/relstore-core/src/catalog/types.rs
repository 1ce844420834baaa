//! Core type definitions for the catalog.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scalar data types a field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarType {
    /// Boolean value.
    Bool,
    /// Signed integer.
    Int,
    /// Floating point number.
    Float,
    /// UTF-8 string.
    String,
    /// Timestamp.
    Time,
    /// Arbitrary JSON document.
    Json,
}

/// Field types - flat representation without recursion.
///
/// Serialized as its textual form (`"string"`, `"list(int)"`), which is also
/// how a type appears in a rendered changelog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    /// A single scalar value.
    Scalar(ScalarType),
    /// A list of scalar values.
    List(ScalarType),
}

impl ScalarType {
    /// Canonical lowercase name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Int => "int",
            ScalarType::Float => "float",
            ScalarType::String => "string",
            ScalarType::Time => "time",
            ScalarType::Json => "json",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScalarType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bool" => Ok(ScalarType::Bool),
            "int" => Ok(ScalarType::Int),
            "float" => Ok(ScalarType::Float),
            "string" => Ok(ScalarType::String),
            "time" => Ok(ScalarType::Time),
            "json" => Ok(ScalarType::Json),
            other => Err(Error::InvalidData(format!("unknown scalar type '{other}'"))),
        }
    }
}

impl FieldType {
    /// Create a scalar field type.
    pub fn scalar(scalar: ScalarType) -> Self {
        FieldType::Scalar(scalar)
    }

    /// Create a list field type.
    pub fn list(scalar: ScalarType) -> Self {
        FieldType::List(scalar)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar(s) => write!(f, "{s}"),
            FieldType::List(s) => write!(f, "list({s})"),
        }
    }
}

impl FromStr for FieldType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.strip_prefix("list(").and_then(|rest| rest.strip_suffix(')')) {
            Some(inner) => Ok(FieldType::List(inner.trim().parse()?)),
            None => Ok(FieldType::Scalar(s.parse()?)),
        }
    }
}

impl TryFrom<String> for FieldType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.to_string()
    }
}
