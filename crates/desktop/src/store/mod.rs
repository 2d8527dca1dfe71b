//! Persistence of the item set.
//!
//! A store only knows how to load and save a flat list of items. It is loaded
//! once at startup and written after every mutation ("last write wins").

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use vyapar_inventory::InventoryItem;

pub mod in_memory;
pub mod json_file;
pub mod sqlite;

pub use in_memory::InMemoryStore;
pub use json_file::JsonFileStore;
pub use sqlite::SqliteStore;

/// Store operation error.
///
/// These are infrastructure errors, as opposed to domain errors (validation,
/// missing items).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored data is corrupt: {0}")]
    Corrupt(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Durable home of the item set.
///
/// `save` is atomic from the caller's point of view: either the whole list is
/// written or the previous contents remain.
pub trait InventoryStore: Send + Sync {
    /// Load every stored item, in the order they were saved.
    fn load(&self) -> Result<Vec<InventoryItem>, StoreError>;

    /// Replace the stored list with `items`.
    fn save(&self, items: &[InventoryItem]) -> Result<(), StoreError>;

    /// Human-readable location, for logs and the status bar.
    fn describe(&self) -> String;
}

impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    fn load(&self) -> Result<Vec<InventoryItem>, StoreError> {
        (**self).load()
    }

    fn save(&self, items: &[InventoryItem]) -> Result<(), StoreError> {
        (**self).save(items)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
