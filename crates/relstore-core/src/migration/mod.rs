//! Migration planning for relstore.
//!
//! Given the schema currently applied to the store and the schema a new
//! release declares, the diff engine produces an ordered [`Changelog`] of
//! create/update/delete entries. Applying that changelog to a live store is
//! the job of a migration executor; nothing in this module touches storage.
//!
//! # Matching rules
//!
//! | Element | Identity key | Update when |
//! |---------|--------------|-------------|
//! | table | name | any nested element differs |
//! | field | name | type or uniqueness differs |
//! | join | referenced table | cardinality differs |
//! | unique | owning table / field | flag differs |
//!
//! Renames are not detected: a renamed element shows up as a delete plus a
//! create.
//!
//! # Example
//!
//! ```ignore
//! use relstore_core::migration::compare_schema;
//!
//! let changelog = compare_schema(&current, &next)?;
//! println!("{}", changelog.summary());
//! ```

pub mod changelog;
pub mod diff;
pub mod error;

pub use changelog::{ChangeValue, Changelog, DiffAction, ElementType, Entry, TableInfo};
pub use diff::{calculate_diff, compare_fields, compare_joins, compare_schema, compare_tables};
pub use error::MigrationError;
