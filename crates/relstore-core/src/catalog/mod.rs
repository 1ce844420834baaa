//! Schema catalog for relstore.
//!
//! The catalog holds the table/field/join model that the diff engine works
//! on, and the versioned store of applied schema snapshots.

mod config;
mod field;
mod join;
mod schema;
mod store;
mod table;
mod types;

pub use config::{CatalogConfig, DEFAULT_DATA_PATH};
pub use field::Field;
pub use join::Join;
pub use schema::Schema;
pub use store::{AppliedSchema, SchemaCatalog};
pub use table::Table;
pub use types::{FieldType, ScalarType};
