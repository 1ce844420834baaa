//! Relstore Core - schema model, schema diff engine, and versioned catalog.
//!
//! The store's shape (tables, fields, joins, nested tables) is declared in
//! configuration and changes release over release. This crate computes, from
//! two snapshots of that shape, the ordered [`Changelog`] needed to migrate
//! the store from one to the other, and keeps applied snapshots in a
//! versioned [`SchemaCatalog`].

pub mod catalog;
pub mod error;
pub mod migration;

pub use catalog::{
    AppliedSchema, CatalogConfig, Field, FieldType, Join, ScalarType, Schema, SchemaCatalog,
    Table,
};
pub use error::Error;
pub use migration::{
    compare_schema, ChangeValue, Changelog, DiffAction, ElementType, Entry, MigrationError,
    TableInfo,
};
