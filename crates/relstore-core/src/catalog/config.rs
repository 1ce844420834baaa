//! Catalog configuration.

use crate::error::Error;
use std::path::PathBuf;

/// Default directory for the catalog database.
pub const DEFAULT_DATA_PATH: &str = "./data";

/// Default sled page cache size (64 MB).
pub const DEFAULT_CACHE_CAPACITY: u64 = 64 * 1024 * 1024;

/// Configuration for opening the catalog database.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Path to the catalog storage directory.
    pub data_path: PathBuf,

    /// Use a throwaway database that is removed on drop.
    pub temporary: bool,

    /// Page cache size in bytes.
    pub cache_capacity: u64,
}

impl CatalogConfig {
    /// Create a configuration for the given data path.
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            temporary: false,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }

    /// Create a configuration for a temporary database.
    pub fn temporary() -> Self {
        Self {
            temporary: true,
            ..Self::default()
        }
    }

    /// Set the page cache size.
    pub fn with_cache_capacity(mut self, bytes: u64) -> Self {
        self.cache_capacity = bytes;
        self
    }

    /// Open the sled database described by this configuration.
    pub fn open_db(&self) -> Result<sled::Db, Error> {
        let config = sled::Config::new().cache_capacity(self.cache_capacity);
        let config = if self.temporary {
            config.temporary(true)
        } else {
            config.path(&self.data_path)
        };
        Ok(config.open()?)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_PATH)
    }
}
