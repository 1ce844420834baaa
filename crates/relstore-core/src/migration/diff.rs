//! Schema diffing algorithm.
//!
//! Compares two [`Schema`] snapshots and produces the [`Changelog`] that
//! migrates the first into the second. Elements are matched by identity key
//! (table name, field name, join target) before their values are compared, so
//! two structurally equal elements with different keys are still distinct.
//!
//! A table that exists on one side only yields a single create or delete
//! entry; its fields, joins, and nested tables are implied and not listed.

use super::changelog::{Changelog, ElementType, Entry, TableInfo};
use super::error::MigrationError;
use crate::catalog::{Schema, Table};
use std::collections::HashMap;

/// Compute the changelog that migrates `old` into `new`.
///
/// Tables are visited in lexicographic order: tables present in `old` first
/// (updated or deleted), then tables only present in `new` (created).
///
/// Fails without producing a changelog if either schema stores a table under
/// a key other than its name.
pub fn compare_schema(old: &Schema, new: &Schema) -> Result<Changelog, MigrationError> {
    for schema in [old, new] {
        if let Err(err) = schema.validate_keys() {
            tracing::warn!(error = %err, "refusing to diff malformed schema");
            return Err(err);
        }
    }

    tracing::debug!(
        old_tables = old.len(),
        new_tables = new.len(),
        "computing schema diff"
    );

    let mut changelog = Changelog::new();

    for (name, old_table) in &old.tables {
        match new.tables.get(name) {
            Some(new_table) => calculate_diff(old_table, new_table, &mut changelog),
            None => changelog.push(Entry::delete(
                TableInfo::new(&old_table.name, &old_table.name, ElementType::Table),
                old_table.clone(),
            )),
        }
    }

    for (name, new_table) in &new.tables {
        if !old.tables.contains_key(name) {
            changelog.push(Entry::create(
                TableInfo::new(&new_table.name, &new_table.name, ElementType::Table),
                new_table.clone(),
            ));
        }
    }

    tracing::debug!(entries = changelog.len(), "schema diff computed");

    Ok(changelog)
}

/// Diff one matched table pair into `changelog`.
///
/// Runs the field, join, and nested table comparators in that order, then
/// checks the table's own uniqueness flag.
pub fn calculate_diff(t1: &Table, t2: &Table, changelog: &mut Changelog) {
    tracing::trace!(table = %t2.name, "diffing table");

    compare_fields(t1, t2, changelog);
    compare_joins(t1, t2, changelog);
    compare_tables(t1, t2, changelog);

    if t1.unique != t2.unique {
        changelog.push(Entry::update(
            TableInfo::new(&t2.name, &t2.name, ElementType::Unique),
            t1.unique,
            t2.unique,
        ));
    }
}

/// Compare the fields of a matched table pair, keyed by field name.
///
/// A type change and a uniqueness change on the same field are reported as
/// two separate entries.
pub fn compare_fields(t1: &Table, t2: &Table, changelog: &mut Changelog) {
    let new_fields = index_by(&t2.fields, |f| f.name.as_str());

    for old_field in &t1.fields {
        let Some(new_field) = new_fields.get(old_field.name.as_str()) else {
            changelog.push(Entry::delete(
                TableInfo::new(&t1.name, &old_field.name, ElementType::Field),
                old_field.clone(),
            ));
            continue;
        };

        if old_field == *new_field {
            continue;
        }

        if old_field.field_type != new_field.field_type {
            changelog.push(Entry::update(
                TableInfo::new(&t2.name, &new_field.name, ElementType::Field),
                old_field.field_type,
                new_field.field_type,
            ));
        }

        if old_field.unique != new_field.unique {
            changelog.push(Entry::update(
                TableInfo::new(&t2.name, &new_field.name, ElementType::Unique),
                old_field.unique,
                new_field.unique,
            ));
        }
    }

    let old_fields = index_by(&t1.fields, |f| f.name.as_str());

    for new_field in &t2.fields {
        if !old_fields.contains_key(new_field.name.as_str()) {
            changelog.push(Entry::create(
                TableInfo::new(&t2.name, &new_field.name, ElementType::Field),
                new_field.clone(),
            ));
        }
    }
}

/// Compare the joins of a matched table pair, keyed by referenced table.
pub fn compare_joins(t1: &Table, t2: &Table, changelog: &mut Changelog) {
    let new_joins = index_by(&t2.joins, |j| j.table.as_str());

    for old_join in &t1.joins {
        match new_joins.get(old_join.table.as_str()) {
            Some(new_join) if new_join.unique != old_join.unique => {
                changelog.push(Entry::update(
                    TableInfo::new(&t2.name, &new_join.table, ElementType::Join),
                    old_join.unique,
                    new_join.unique,
                ));
            }
            Some(_) => {}
            None => changelog.push(Entry::delete(
                TableInfo::new(&t1.name, &old_join.table, ElementType::Join),
                old_join.clone(),
            )),
        }
    }

    let old_joins = index_by(&t1.joins, |j| j.table.as_str());

    for new_join in &t2.joins {
        if !old_joins.contains_key(new_join.table.as_str()) {
            changelog.push(Entry::create(
                TableInfo::new(&t2.name, &new_join.table, ElementType::Join),
                new_join.clone(),
            ));
        }
    }
}

/// Compare the nested tables of a matched table pair, keyed by name.
///
/// Matched sub-tables are diffed recursively; their entries are appended in
/// place, so a sub-table's changes appear right after the point where the
/// parent reached it.
pub fn compare_tables(t1: &Table, t2: &Table, changelog: &mut Changelog) {
    let new_tables = index_by(&t2.tables, |t| t.name.as_str());

    for old_table in &t1.tables {
        match new_tables.get(old_table.name.as_str()) {
            Some(new_table) => {
                let mut sub_changelog = Changelog::new();
                calculate_diff(old_table, new_table, &mut sub_changelog);
                changelog.combine(sub_changelog);
            }
            None => changelog.push(Entry::delete(
                TableInfo::new(&old_table.name, &old_table.name, ElementType::Table),
                old_table.clone(),
            )),
        }
    }

    let old_tables = index_by(&t1.tables, |t| t.name.as_str());

    for new_table in &t2.tables {
        if !old_tables.contains_key(new_table.name.as_str()) {
            changelog.push(Entry::create(
                TableInfo::new(&new_table.name, &new_table.name, ElementType::Table),
                new_table.clone(),
            ));
        }
    }
}

/// Index elements by identity key. The first element wins on duplicate keys.
fn index_by<'a, T, F>(items: &'a [T], key: F) -> HashMap<&'a str, &'a T>
where
    F: Fn(&'a T) -> &'a str,
{
    let mut index = HashMap::with_capacity(items.len());
    for item in items {
        index.entry(key(item)).or_insert(item);
    }
    index
}
