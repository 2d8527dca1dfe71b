//! Backup and restore of the item set.
//!
//! A backup is a JSON store document, so any backup file can also be opened
//! directly with `--store json`.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::service::{InventoryService, ServiceError};
use crate::store::StoreError;
use crate::store::json_file::{read_document, write_document};

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("no backup found at {0:?}")]
    Missing(PathBuf),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl BackupError {
    /// The restored set is live in memory but could not be saved.
    pub fn is_unsaved(&self) -> bool {
        matches!(self, BackupError::Service(e) if e.is_unsaved())
    }
}

/// Write the current item set to `path`. Returns the number of items written.
pub fn backup_to(service: &InventoryService, path: &Path) -> Result<usize, BackupError> {
    let items = service.list();
    write_document(path, items)?;
    tracing::info!(path = ?path, items = items.len(), "backup written");
    Ok(items.len())
}

/// Replace the item set with the backup at `path`, then save it.
///
/// Returns the number of items restored. The current set is left untouched if
/// the backup cannot be read or contains duplicate ids.
pub fn restore_from(service: &mut InventoryService, path: &Path) -> Result<usize, BackupError> {
    let document = read_document(path)?.ok_or_else(|| BackupError::Missing(path.to_path_buf()))?;
    let count = document.items.len();
    service.replace_all(document.items)?;
    tracing::info!(path = ?path, items = count, saved_at = %document.saved_at, "backup restored");
    Ok(count)
}
