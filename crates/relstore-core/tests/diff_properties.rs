//! Property tests for the schema diff engine over generated nested schemas.

use proptest::prelude::*;
use relstore_core::catalog::{Field, FieldType, Join, ScalarType, Schema, Table};
use relstore_core::migration::{compare_schema, DiffAction, Entry};

const TABLE_NAMES: [&str; 4] = ["branch", "commit", "project", "release"];
const CHILD_NAMES: [&str; 3] = ["entry", "stage", "step"];
const FIELD_NAMES: [&str; 5] = ["name", "version", "sha", "result", "tags"];
const JOIN_TARGETS: [&str; 3] = ["project", "branch", "commit"];

fn arb_field_type() -> impl Strategy<Value = FieldType> {
    let scalar = prop_oneof![
        Just(ScalarType::Bool),
        Just(ScalarType::Int),
        Just(ScalarType::String),
    ];
    (scalar, any::<bool>()).prop_map(|(scalar, list)| {
        if list {
            FieldType::list(scalar)
        } else {
            FieldType::scalar(scalar)
        }
    })
}

fn arb_fields() -> impl Strategy<Value = Vec<Field>> {
    prop::sample::subsequence(FIELD_NAMES.to_vec(), 0..=FIELD_NAMES.len())
        .prop_flat_map(|names| {
            let attrs = prop::collection::vec((arb_field_type(), any::<bool>()), names.len());
            (Just(names), attrs)
        })
        .prop_map(|(names, attrs)| {
            names
                .into_iter()
                .zip(attrs)
                .map(|(name, (field_type, unique))| {
                    Field::new(name, field_type).with_unique(unique)
                })
                .collect()
        })
}

fn arb_joins() -> impl Strategy<Value = Vec<Join>> {
    prop::sample::subsequence(JOIN_TARGETS.to_vec(), 0..=JOIN_TARGETS.len())
        .prop_flat_map(|targets| {
            let flags = prop::collection::vec(any::<bool>(), targets.len());
            (Just(targets), flags)
        })
        .prop_map(|(targets, flags)| {
            targets
                .into_iter()
                .zip(flags)
                .map(|(table, unique)| Join {
                    table: table.to_string(),
                    unique,
                })
                .collect()
        })
}

/// A table with up to `depth` levels of nested tables below it.
fn arb_table(name: String, depth: u32) -> BoxedStrategy<Table> {
    let children = if depth == 0 {
        Just(Vec::new()).boxed()
    } else {
        prop::sample::subsequence(CHILD_NAMES.to_vec(), 0..=2)
            .prop_flat_map(move |names| {
                names
                    .into_iter()
                    .map(|child| arb_table(child.to_string(), depth - 1))
                    .collect::<Vec<_>>()
            })
            .boxed()
    };

    (arb_fields(), arb_joins(), children, any::<bool>())
        .prop_map(move |(fields, joins, tables, unique)| Table {
            name: name.clone(),
            fields,
            joins,
            tables,
            unique,
        })
        .boxed()
}

fn arb_schema() -> impl Strategy<Value = Schema> {
    prop::sample::subsequence(TABLE_NAMES.to_vec(), 0..=TABLE_NAMES.len())
        .prop_flat_map(|names| {
            names
                .into_iter()
                .map(|name| arb_table(name.to_string(), 2))
                .collect::<Vec<_>>()
        })
        .prop_map(|tables| tables.into_iter().fold(Schema::new(), Schema::with_table))
}

fn invert(entry: &Entry) -> Entry {
    let action = match entry.action {
        DiffAction::Create => DiffAction::Delete,
        DiffAction::Delete => DiffAction::Create,
        DiffAction::Update => DiffAction::Update,
    };
    Entry {
        action,
        table_info: entry.table_info.clone(),
        from: entry.to.clone(),
        to: entry.from.clone(),
    }
}

/// Entries as sorted JSON, so payloads are compared in full.
fn sorted_json(entries: impl IntoIterator<Item = Entry>) -> Vec<String> {
    let mut encoded: Vec<String> = entries
        .into_iter()
        .map(|e| serde_json::to_string(&e).unwrap())
        .collect();
    encoded.sort();
    encoded
}

proptest! {
    #[test]
    fn identical_schemas_have_no_changes(schema in arb_schema()) {
        let changelog = compare_schema(&schema, &schema.clone()).unwrap();
        prop_assert!(changelog.is_empty());
    }

    #[test]
    fn reverse_diff_is_the_inverse(old in arb_schema(), new in arb_schema()) {
        let forward = compare_schema(&old, &new).unwrap();
        let backward = compare_schema(&new, &old).unwrap();

        prop_assert_eq!(forward.len(), backward.len());
        prop_assert_eq!(
            sorted_json(forward.iter().map(invert)),
            sorted_json(backward)
        );
    }

    #[test]
    fn empty_changelog_means_equal_schemas(old in arb_schema(), new in arb_schema()) {
        let changelog = compare_schema(&old, &new).unwrap();
        prop_assert_eq!(changelog.is_empty(), old == new);
    }

    #[test]
    fn diff_is_deterministic(old in arb_schema(), new in arb_schema()) {
        let first = compare_schema(&old, &new).unwrap();
        let second = compare_schema(&old.clone(), &new.clone()).unwrap();
        prop_assert_eq!(first, second);
    }
}
