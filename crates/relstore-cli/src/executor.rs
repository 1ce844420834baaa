//! Command execution.

use crate::config::{CliConfig, Command};
use crate::formatter::Formatter;
use relstore_core::{compare_schema, MigrationError, Schema, SchemaCatalog};
use thiserror::Error;

/// Errors from executing a command.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// Core library error.
    #[error(transparent)]
    Core(#[from] relstore_core::Error),

    /// Schema diff error.
    #[error(transparent)]
    Migration(#[from] MigrationError),

    /// The changelog would drop data and was not allowed to.
    #[error("changelog contains {count} destructive change(s); rerun with --allow-destructive")]
    Destructive {
        /// Number of destructive entries.
        count: usize,
    },

    /// Nothing has been applied to the catalog yet.
    #[error("no schema has been applied")]
    EmptyCatalog,

    /// The requested version is not stored.
    #[error("schema version {0} not found")]
    VersionNotFound(u64),
}

/// Execute a command and return its rendered output.
pub fn execute(
    config: &CliConfig,
    command: &Command,
    formatter: &dyn Formatter,
) -> Result<String, ExecuteError> {
    match command {
        Command::Diff { old, new } => {
            let old = Schema::from_path(old)?;
            let new = Schema::from_path(new)?;
            let changelog = compare_schema(&old, &new)?;
            Ok(formatter.format_changelog(&changelog))
        }

        Command::Plan { schema } => {
            let schema = Schema::from_path(schema)?;
            let catalog = open_catalog(config)?;
            let changelog = catalog.plan(&schema)?;
            Ok(formatter.format_changelog(&changelog))
        }

        Command::Apply {
            schema,
            allow_destructive,
        } => {
            let schema = Schema::from_path(schema)?;
            let catalog = open_catalog(config)?;

            let applied = match catalog.apply_schema_checked(schema, *allow_destructive) {
                Ok(applied) => applied,
                Err(relstore_core::Error::Migration(MigrationError::DestructiveChanges {
                    count,
                })) => return Err(ExecuteError::Destructive { count }),
                Err(e) => return Err(e.into()),
            };
            catalog.flush()?;
            Ok(formatter.format_applied(applied.version, &applied.changelog))
        }

        Command::History => {
            let catalog = open_catalog(config)?;
            let versions = catalog.list_versions()?;
            Ok(formatter.format_versions(&versions, catalog.current_version()))
        }

        Command::Show { version } => {
            let catalog = open_catalog(config)?;
            let schema = match version {
                Some(v) => catalog
                    .schema_at_version(*v)?
                    .ok_or(ExecuteError::VersionNotFound(*v))?,
                None => catalog.current_schema().ok_or(ExecuteError::EmptyCatalog)?,
            };
            Ok(formatter.format_schema(&schema))
        }
    }
}

fn open_catalog(config: &CliConfig) -> Result<SchemaCatalog, ExecuteError> {
    tracing::debug!(data_path = %config.catalog.data_path.display(), "opening schema catalog");
    let db = config.catalog.open_db()?;
    Ok(SchemaCatalog::open(&db)?)
}
