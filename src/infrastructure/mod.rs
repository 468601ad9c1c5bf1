//! Store adapters implementing `GiftCardStore`.

pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;

use crate::config::Config;
use crate::domain::ports::GiftCardStoreBox;
use crate::error::Result;
use in_memory::InMemoryGiftCardStore;

/// Picks the store adapter `config` asks for.
///
/// A `db_path` without the `storage-rocksdb` feature falls back to the
/// in-memory store after printing a warning.
pub fn open_store(config: &Config) -> Result<GiftCardStoreBox> {
    match &config.db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            tracing::info!(path = %path.display(), "using RocksDB gift card store");
            Ok(Box::new(self::rocksdb::RocksDBStore::open(path)?))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            eprintln!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryGiftCardStore::new()))
        }
        None => Ok(Box::new(InMemoryGiftCardStore::new())),
    }
}
