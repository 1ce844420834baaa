//! Schema catalog for storing applied schema versions.

use super::Schema;
use crate::error::Error;
use crate::migration::{compare_schema, Changelog, MigrationError};
use parking_lot::{Mutex, RwLock};
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::{Db, Transactional, Tree};
use std::sync::atomic::{AtomicU64, Ordering};

/// Tree name for schema snapshots.
const SCHEMA_TREE: &str = "catalog:schemas";

/// Tree name for catalog metadata.
const META_TREE: &str = "catalog:meta";

/// Key for current schema version in meta tree.
const CURRENT_VERSION_KEY: &[u8] = b"current_version";

/// Outcome of applying a schema to the catalog.
#[derive(Debug, Clone)]
pub struct AppliedSchema {
    /// Version now current. Unchanged when the changelog is empty.
    pub version: u64,
    /// Changes between the previously current schema and the applied one.
    pub changelog: Changelog,
}

/// Versioned store of applied schema snapshots.
///
/// The current schema is the `old` side of every plan; a release's schema is
/// the `new` side.
pub struct SchemaCatalog {
    /// Schema snapshots tree.
    schema_tree: Tree,
    /// Metadata tree.
    meta_tree: Tree,
    /// Current schema version (cached).
    current_version: AtomicU64,
    /// Current schema (cached).
    current_schema: RwLock<Option<Schema>>,
    /// Serializes plan-then-persist in `apply_schema`.
    apply_lock: Mutex<()>,
}

impl SchemaCatalog {
    /// Open or create a catalog using the given sled database.
    pub fn open(db: &Db) -> Result<Self, Error> {
        let schema_tree = db.open_tree(SCHEMA_TREE)?;
        let meta_tree = db.open_tree(META_TREE)?;

        let current_version = match meta_tree.get(CURRENT_VERSION_KEY)? {
            Some(bytes) => decode_version(&bytes)?,
            None => 0,
        };

        let catalog = Self {
            schema_tree,
            meta_tree,
            current_version: AtomicU64::new(current_version),
            current_schema: RwLock::new(None),
            apply_lock: Mutex::new(()),
        };

        if current_version > 0 {
            let schema = catalog
                .schema_at_version(current_version)?
                .ok_or(MigrationError::VersionNotFound {
                    version: current_version,
                })?;
            *catalog.current_schema.write() = Some(schema);
        }

        tracing::debug!(current_version, "schema catalog opened");

        Ok(catalog)
    }

    /// Get the current schema version. Zero when nothing has been applied.
    pub fn current_version(&self) -> u64 {
        self.current_version.load(Ordering::SeqCst)
    }

    /// Get the current schema.
    pub fn current_schema(&self) -> Option<Schema> {
        self.current_schema.read().clone()
    }

    /// Get the schema stored at a specific version.
    pub fn schema_at_version(&self, version: u64) -> Result<Option<Schema>, Error> {
        match self.schema_tree.get(version.to_be_bytes())? {
            Some(bytes) => Ok(Some(Schema::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Compute the changelog from the current schema to `schema`.
    ///
    /// An empty catalog is treated as an empty schema, so every table of
    /// `schema` is planned as a create.
    pub fn plan(&self, schema: &Schema) -> Result<Changelog, Error> {
        let guard = self.current_schema.read();
        let empty = Schema::new();
        let current = guard.as_ref().unwrap_or(&empty);
        Ok(compare_schema(current, schema)?)
    }

    /// Plan and persist a new schema version.
    ///
    /// Nothing is written when the schema matches the current one.
    pub fn apply_schema(&self, schema: Schema) -> Result<AppliedSchema, Error> {
        self.apply(schema, true)
    }

    /// Plan and persist a new schema version, refusing destructive changes
    /// unless `allow_destructive` is set.
    ///
    /// The check runs on the same plan that gets committed, under the apply
    /// lock.
    pub fn apply_schema_checked(
        &self,
        schema: Schema,
        allow_destructive: bool,
    ) -> Result<AppliedSchema, Error> {
        self.apply(schema, allow_destructive)
    }

    fn apply(&self, schema: Schema, allow_destructive: bool) -> Result<AppliedSchema, Error> {
        let _apply = self.apply_lock.lock();

        let changelog = self.plan(&schema)?;
        let current = self.current_version();

        if !allow_destructive && changelog.has_destructive() {
            for entry in changelog.destructive() {
                tracing::warn!(change = %entry, "destructive change");
            }
            let count = changelog.destructive().count();
            return Err(MigrationError::DestructiveChanges { count }.into());
        }

        if changelog.is_empty() && current > 0 {
            tracing::info!(version = current, "schema unchanged, nothing to apply");
            return Ok(AppliedSchema {
                version: current,
                changelog,
            });
        }

        let new_version = current + 1;
        self.commit_version(current, new_version, &schema)?;

        self.current_version.store(new_version, Ordering::SeqCst);
        *self.current_schema.write() = Some(schema);

        tracing::info!(
            version = new_version,
            changes = changelog.len(),
            "schema applied"
        );

        Ok(AppliedSchema {
            version: new_version,
            changelog,
        })
    }

    /// Compute the changelog between two stored versions.
    pub fn diff_versions(&self, from: u64, to: u64) -> Result<Changelog, Error> {
        let old = self.require_version(from)?;
        let new = self.require_version(to)?;
        Ok(compare_schema(&old, &new)?)
    }

    /// List all stored schema versions in ascending order.
    pub fn list_versions(&self) -> Result<Vec<u64>, Error> {
        let mut versions = Vec::new();
        for result in self.schema_tree.iter() {
            let (key, _) = result?;
            versions.push(decode_version(&key)?);
        }
        versions.sort_unstable();
        Ok(versions)
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.schema_tree.flush()?;
        self.meta_tree.flush()?;
        Ok(())
    }

    /// Write the snapshot and the current version pointer in one transaction.
    ///
    /// Aborts with [`MigrationError::VersionConflict`] when the stored current
    /// version is no longer `expected`.
    fn commit_version(&self, expected: u64, version: u64, schema: &Schema) -> Result<(), Error> {
        let bytes = schema.to_bytes()?;
        let version_key = version.to_be_bytes();

        let result: Result<(), TransactionError<Error>> = (&self.schema_tree, &self.meta_tree)
            .transaction(|(schema_tx, meta_tx)| {
                let found = match meta_tx.get(CURRENT_VERSION_KEY)? {
                    Some(stored) => {
                        decode_version(&stored).map_err(ConflictableTransactionError::Abort)?
                    }
                    None => 0,
                };
                if found != expected {
                    return Err(ConflictableTransactionError::Abort(
                        MigrationError::VersionConflict { expected, found }.into(),
                    ));
                }

                schema_tx.insert(&version_key, bytes.clone())?;
                meta_tx.insert(CURRENT_VERSION_KEY, &version_key)?;
                Ok(())
            });

        match result {
            Ok(()) => Ok(()),
            Err(TransactionError::Abort(e)) => Err(e),
            Err(TransactionError::Storage(e)) => Err(Error::Storage(e)),
        }
    }

    fn require_version(&self, version: u64) -> Result<Schema, Error> {
        self.schema_at_version(version)?
            .ok_or_else(|| MigrationError::VersionNotFound { version }.into())
    }
}

fn decode_version(bytes: &[u8]) -> Result<u64, Error> {
    let buf: [u8; 8] = bytes
        .try_into()
        .map_err(|_| Error::InvalidData(format!("invalid version key of {} bytes", bytes.len())))?;
    Ok(u64::from_be_bytes(buf))
}
