//! Changelog - the ordered result of diffing two schemas.

use crate::catalog::{Field, FieldType, Join, Table};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of structural change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffAction {
    /// The element is new.
    Create,
    /// The element exists on both sides but changed.
    Update,
    /// The element no longer exists.
    Delete,
}

impl DiffAction {
    /// All actions, in reporting order.
    pub const ALL: [DiffAction; 3] = [DiffAction::Create, DiffAction::Update, DiffAction::Delete];

    /// Lowercase name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffAction::Create => "create",
            DiffAction::Update => "update",
            DiffAction::Delete => "delete",
        }
    }
}

impl fmt::Display for DiffAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of element a change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// A whole table, including everything nested in it.
    Table,
    /// A field of a table.
    Field,
    /// A join from one table to another.
    Join,
    /// The uniqueness flag of a table or field.
    Unique,
}

impl ElementType {
    /// All element types, in reporting order.
    pub const ALL: [ElementType; 4] = [
        ElementType::Table,
        ElementType::Field,
        ElementType::Join,
        ElementType::Unique,
    ];

    /// Lowercase name of the element type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Table => "table",
            ElementType::Field => "field",
            ElementType::Join => "join",
            ElementType::Unique => "unique",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which element of which table a change targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    /// Table the element belongs to.
    pub table_name: String,
    /// Name of the element instance.
    pub element_name: String,
    /// Kind of element.
    pub element_type: ElementType,
}

impl TableInfo {
    /// Create table info.
    pub fn new(
        table_name: impl Into<String>,
        element_name: impl Into<String>,
        element_type: ElementType,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            element_name: element_name.into(),
            element_type,
        }
    }
}

/// Old or new value carried by an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ChangeValue {
    /// A whole table.
    Table(Table),
    /// A whole field.
    Field(Field),
    /// A whole join.
    Join(Join),
    /// A field type.
    Type(FieldType),
    /// A uniqueness flag.
    Unique(bool),
}

impl fmt::Display for ChangeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeValue::Table(t) => write!(f, "{}", t.name),
            ChangeValue::Field(field) if field.unique => {
                write!(f, "{} {} unique", field.name, field.field_type)
            }
            ChangeValue::Field(field) => write!(f, "{} {}", field.name, field.field_type),
            ChangeValue::Join(j) if j.unique => write!(f, "{} (one-to-one)", j.table),
            ChangeValue::Join(j) => write!(f, "{} (one-to-many)", j.table),
            ChangeValue::Type(t) => write!(f, "{t}"),
            ChangeValue::Unique(u) => write!(f, "{u}"),
        }
    }
}

impl From<Table> for ChangeValue {
    fn from(value: Table) -> Self {
        ChangeValue::Table(value)
    }
}

impl From<Field> for ChangeValue {
    fn from(value: Field) -> Self {
        ChangeValue::Field(value)
    }
}

impl From<Join> for ChangeValue {
    fn from(value: Join) -> Self {
        ChangeValue::Join(value)
    }
}

impl From<FieldType> for ChangeValue {
    fn from(value: FieldType) -> Self {
        ChangeValue::Type(value)
    }
}

impl From<bool> for ChangeValue {
    fn from(value: bool) -> Self {
        ChangeValue::Unique(value)
    }
}

/// One atomic structural change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// What happens to the element.
    pub action: DiffAction,
    /// Which element is affected.
    pub table_info: TableInfo,
    /// Prior value, absent for creates.
    pub from: Option<ChangeValue>,
    /// New value, absent for deletes.
    pub to: Option<ChangeValue>,
}

impl Entry {
    /// An element that only exists in the new schema.
    pub fn create(table_info: TableInfo, to: impl Into<ChangeValue>) -> Self {
        Self {
            action: DiffAction::Create,
            table_info,
            from: None,
            to: Some(to.into()),
        }
    }

    /// An element present on both sides whose value changed.
    pub fn update(
        table_info: TableInfo,
        from: impl Into<ChangeValue>,
        to: impl Into<ChangeValue>,
    ) -> Self {
        Self {
            action: DiffAction::Update,
            table_info,
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }

    /// An element that only exists in the old schema.
    pub fn delete(table_info: TableInfo, from: impl Into<ChangeValue>) -> Self {
        Self {
            action: DiffAction::Delete,
            table_info,
            from: Some(from.into()),
            to: None,
        }
    }

    /// Kind of element this entry targets.
    pub fn element_type(&self) -> ElementType {
        self.table_info.element_type
    }

    /// Whether applying this entry can discard stored data.
    ///
    /// Deletes drop data outright; a field type update rewrites every stored
    /// value of the field.
    pub fn is_destructive(&self) -> bool {
        match self.action {
            DiffAction::Delete => true,
            DiffAction::Update => self.table_info.element_type == ElementType::Field,
            DiffAction::Create => false,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = &self.table_info;
        write!(f, "{} {} ", self.action, info.element_type)?;
        let table_level = match info.element_type {
            ElementType::Table => true,
            ElementType::Unique => info.table_name == info.element_name,
            ElementType::Field | ElementType::Join => false,
        };
        if table_level {
            write!(f, "{}", info.table_name)?;
        } else {
            write!(f, "{}.{}", info.table_name, info.element_name)?;
        }
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => write!(f, ": {from} -> {to}"),
            (None, Some(to)) => write!(f, ": {to}"),
            (Some(from), None) => write!(f, ": {from}"),
            (None, None) => Ok(()),
        }
    }
}

/// Ordered list of changes, in the order the diff discovered them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Changelog(Vec<Entry>);

impl Changelog {
    /// Create an empty changelog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry.
    pub fn push(&mut self, entry: Entry) {
        self.0.push(entry);
    }

    /// Append every entry of another changelog, keeping its order.
    pub fn combine(&mut self, other: Changelog) {
        self.0.extend(other.0);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.0.iter()
    }

    /// The entries as a slice.
    pub fn entries(&self) -> &[Entry] {
        &self.0
    }

    /// Count entries with the given action and element type.
    pub fn count(&self, action: DiffAction, element_type: ElementType) -> usize {
        self.0
            .iter()
            .filter(|e| e.action == action && e.table_info.element_type == element_type)
            .count()
    }

    /// Entries that can discard stored data.
    pub fn destructive(&self) -> impl Iterator<Item = &Entry> {
        self.0.iter().filter(|e| e.is_destructive())
    }

    /// Check if any entry can discard stored data.
    pub fn has_destructive(&self) -> bool {
        self.destructive().next().is_some()
    }

    /// Get a human-readable summary of the changelog.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        for action in DiffAction::ALL {
            for element_type in ElementType::ALL {
                let count = self.count(action, element_type);
                if count > 0 {
                    let mut label = action.as_str().to_string();
                    label[..1].make_ascii_uppercase();
                    parts.push(format!("{label} {count} {element_type}(s)"));
                }
            }
        }

        if parts.is_empty() {
            "No changes".to_string()
        } else {
            parts.join(", ")
        }
    }
}

impl From<Vec<Entry>> for Changelog {
    fn from(entries: Vec<Entry>) -> Self {
        Self(entries)
    }
}

impl IntoIterator for Changelog {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Changelog {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ScalarType;

    fn type_update() -> Entry {
        Entry::update(
            TableInfo::new("release", "version", ElementType::Field),
            FieldType::scalar(ScalarType::String),
            FieldType::scalar(ScalarType::Int),
        )
    }

    #[test]
    fn test_combine_preserves_order() {
        let mut parent = Changelog::new();
        parent.push(Entry::create(
            TableInfo::new("project", "project", ElementType::Table),
            Table::new("project"),
        ));

        let mut child = Changelog::new();
        child.push(type_update());
        child.push(Entry::delete(
            TableInfo::new("release", "project", ElementType::Join),
            Join::one_to_many("project"),
        ));

        parent.combine(child);

        let actions: Vec<_> = parent.iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![DiffAction::Create, DiffAction::Update, DiffAction::Delete]
        );
    }

    #[test]
    fn test_destructive() {
        let create = Entry::create(
            TableInfo::new("release", "sha", ElementType::Field),
            Field::new("sha", FieldType::scalar(ScalarType::String)),
        );
        let unique = Entry::update(
            TableInfo::new("release", "release", ElementType::Unique),
            false,
            true,
        );

        assert!(!create.is_destructive());
        assert!(!unique.is_destructive());
        assert!(type_update().is_destructive());

        let changelog = Changelog::from(vec![create, unique]);
        assert!(!changelog.has_destructive());

        let changelog = Changelog::from(vec![type_update()]);
        assert_eq!(changelog.destructive().count(), 1);
    }

    #[test]
    fn test_summary() {
        assert_eq!(Changelog::new().summary(), "No changes");

        let changelog = Changelog::from(vec![
            Entry::create(
                TableInfo::new("project", "project", ElementType::Table),
                Table::new("project"),
            ),
            type_update(),
            type_update(),
        ]);
        assert_eq!(changelog.summary(), "Create 1 table(s), Update 2 field(s)");
    }

    #[test]
    fn test_entry_display() {
        assert_eq!(
            type_update().to_string(),
            "update field release.version: string -> int"
        );

        let entry = Entry::delete(
            TableInfo::new("project", "project", ElementType::Table),
            Table::new("project"),
        );
        assert_eq!(entry.to_string(), "delete table project: project");

        let entry = Entry::update(
            TableInfo::new("release", "release", ElementType::Unique),
            false,
            true,
        );
        assert_eq!(entry.to_string(), "update unique release: false -> true");
    }

    #[test]
    fn test_entry_display_field_named_after_table() {
        let entry = Entry::update(
            TableInfo::new("release", "release", ElementType::Field),
            FieldType::scalar(ScalarType::String),
            FieldType::scalar(ScalarType::Int),
        );
        assert_eq!(entry.to_string(), "update field release.release: string -> int");

        let entry = Entry::create(
            TableInfo::new("project", "project", ElementType::Join),
            Join::one_to_one("project"),
        );
        assert_eq!(entry.to_string(), "create join project.project: project (one-to-one)");
    }

    #[test]
    fn test_entry_json_shape() {
        let json = serde_json::to_value(type_update()).unwrap();

        assert_eq!(json["action"], "update");
        assert_eq!(json["table_info"]["element_type"], "field");
        assert_eq!(json["from"]["kind"], "type");
        assert_eq!(json["from"]["value"], "string");
        assert_eq!(json["to"]["value"], "int");
    }
}
