//! Command-line arguments and client configuration.

use clap::{Parser, Subcommand};
use relstore_core::catalog::DEFAULT_DATA_PATH;
use relstore_core::CatalogConfig;
use std::path::PathBuf;

use crate::formatter::OutputFormat;

/// Default log filter when neither `RUST_LOG` nor `--log-level` is set.
pub const DEFAULT_LOG_FILTER: &str = "relstore=info,relstore_core=info";

/// Relstore schema migration planner
#[derive(Parser, Debug)]
#[command(name = "relstore")]
#[command(version, about = "Plan and apply relstore schema migrations")]
pub struct Args {
    /// Path to the schema catalog
    #[arg(short, long, global = true, default_value = DEFAULT_DATA_PATH)]
    pub data_path: PathBuf,

    /// Output format
    #[arg(long, global = true, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Log level for relstore crates (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Diff two schema files
    Diff {
        /// Schema currently applied
        old: PathBuf,
        /// Schema to migrate to
        new: PathBuf,
    },
    /// Diff the catalog's current schema against a schema file
    Plan {
        /// Schema to migrate to
        schema: PathBuf,
    },
    /// Apply a schema file to the catalog
    Apply {
        /// Schema to migrate to
        schema: PathBuf,
        /// Apply even if the changelog deletes tables, fields, or joins
        #[arg(long)]
        allow_destructive: bool,
    },
    /// List stored schema versions
    History,
    /// Print a stored schema
    Show {
        /// Version to print (defaults to the current one)
        #[arg(long)]
        version: Option<u64>,
    },
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Catalog configuration.
    pub catalog: CatalogConfig,
    /// Output format.
    pub format: OutputFormat,
    /// Tracing filter directives.
    pub log_filter: Option<String>,
}

impl CliConfig {
    /// Create a configuration for the given catalog path.
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog: CatalogConfig::new(data_path),
            format: OutputFormat::Table,
            log_filter: None,
        }
    }

    /// Set the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the log level for relstore crates.
    pub fn with_log_level(mut self, level: &str) -> Self {
        self.log_filter = Some(format!("relstore={level},relstore_core={level}"));
        self
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            format: OutputFormat::Table,
            log_filter: None,
        }
    }
}

impl Args {
    /// Split the arguments into client configuration and the command to run.
    pub fn into_config(self) -> (CliConfig, Command) {
        let mut config = CliConfig::new(self.data_path).with_format(self.format);
        if let Some(level) = &self.log_level {
            config = config.with_log_level(level);
        }
        (config, self.command)
    }
}
