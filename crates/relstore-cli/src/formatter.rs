//! Output formatters for changelogs and schemas.

use clap::ValueEnum;
use comfy_table::Table;
use relstore_core::{Changelog, Schema};

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    /// Format a changelog.
    fn format_changelog(&self, changelog: &Changelog) -> String;

    /// Format the outcome of applying a schema.
    fn format_applied(&self, version: u64, changelog: &Changelog) -> String;

    /// Format a list of stored versions, marking the current one.
    fn format_versions(&self, versions: &[u64], current: u64) -> String;

    /// Format a schema.
    fn format_schema(&self, schema: &Schema) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_changelog(&self, changelog: &Changelog) -> String {
        if changelog.is_empty() {
            return "No changes".to_string();
        }

        let mut table = Table::new();
        table.set_header(vec!["#", "Action", "Element", "Table", "Name", "From", "To"]);

        for (i, entry) in changelog.iter().enumerate() {
            table.add_row(vec![
                (i + 1).to_string(),
                entry.action.to_string(),
                entry.table_info.element_type.to_string(),
                entry.table_info.table_name.clone(),
                entry.table_info.element_name.clone(),
                optional(entry.from.as_ref()),
                optional(entry.to.as_ref()),
            ]);
        }

        format!("{table}\n{}", changelog.summary())
    }

    fn format_applied(&self, version: u64, changelog: &Changelog) -> String {
        format!(
            "{}\nSchema version {version} is current",
            self.format_changelog(changelog)
        )
    }

    fn format_versions(&self, versions: &[u64], current: u64) -> String {
        if versions.is_empty() {
            return "No schema versions".to_string();
        }

        let mut table = Table::new();
        table.set_header(vec!["Version", "Current"]);

        for version in versions {
            let marker = if *version == current { "*" } else { "" };
            table.add_row(vec![version.to_string(), marker.to_string()]);
        }

        table.to_string()
    }

    fn format_schema(&self, schema: &Schema) -> String {
        schema.to_json().unwrap_or_else(|e| format!("Error: {e}"))
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_changelog(&self, changelog: &Changelog) -> String {
        serde_json::to_string_pretty(changelog).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_applied(&self, version: u64, changelog: &Changelog) -> String {
        serde_json::json!({
            "version": version,
            "changelog": changelog,
        })
        .to_string()
    }

    fn format_versions(&self, versions: &[u64], current: u64) -> String {
        serde_json::json!({
            "current": current,
            "versions": versions,
        })
        .to_string()
    }

    fn format_schema(&self, schema: &Schema) -> String {
        schema.to_json().unwrap_or_else(|_| "{}".to_string())
    }
}

fn optional(value: Option<&impl ToString>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use relstore_core::{compare_schema, Field, FieldType, ScalarType, Table as SchemaTable};

    fn sample_changelog() -> Changelog {
        let old = Schema::new().with_table(
            SchemaTable::new("release")
                .with_field(Field::new("version", FieldType::scalar(ScalarType::String))),
        );
        let new = Schema::new().with_table(
            SchemaTable::new("release")
                .with_field(Field::new("version", FieldType::scalar(ScalarType::Int))),
        );
        compare_schema(&old, &new).unwrap()
    }

    #[test]
    fn test_table_changelog() {
        let output = TableFormatter.format_changelog(&sample_changelog());

        assert!(output.contains("update"));
        assert!(output.contains("version"));
        assert!(output.contains("string"));
        assert!(output.ends_with("Update 1 field(s)"));
    }

    #[test]
    fn test_table_empty_changelog() {
        assert_eq!(TableFormatter.format_changelog(&Changelog::new()), "No changes");
    }

    #[test]
    fn test_json_changelog() {
        let output = JsonFormatter.format_changelog(&sample_changelog());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value[0]["action"], "update");
        assert_eq!(value[0]["to"]["value"], "int");
    }

    #[test]
    fn test_versions() {
        let output = TableFormatter.format_versions(&[1, 2], 2);
        assert!(output.contains('*'));

        let output = JsonFormatter.format_versions(&[1, 2], 2);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["current"], 2);
        assert_eq!(value["versions"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
