//! Single-file JSON store.
//!
//! The file holds one [`StoreDocument`]. Writes go to a sibling temp file that
//! is renamed over the target, so a crash mid-write leaves the old file intact.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vyapar_inventory::InventoryItem;

use super::{InventoryStore, StoreError};

/// Current document schema version.
pub const DOCUMENT_VERSION: u32 = 1;

/// On-disk layout of a JSON store file (also used for backups).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDocument {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub items: Vec<InventoryItem>,
}

/// Read a document from `path`.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_document(path: &Path) -> Result<Option<StoreDocument>, StoreError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(StoreError::io(path, err)),
    };

    let document: StoreDocument = serde_json::from_str(&raw)?;
    if document.version > DOCUMENT_VERSION {
        return Err(StoreError::Corrupt(format!(
            "{path:?} has document version {}, newest supported is {DOCUMENT_VERSION}",
            document.version
        )));
    }
    Ok(Some(document))
}

/// Write `items` to `path` as a fresh document (temp file + rename).
pub fn write_document(path: &Path, items: &[InventoryItem]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let document = StoreDocument {
        version: DOCUMENT_VERSION,
        saved_at: Utc::now(),
        items: items.to_vec(),
    };
    let payload = serde_json::to_string_pretty(&document)?;

    let tmp = temp_sibling(path);
    fs::write(&tmp, payload).map_err(|e| StoreError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))?;
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "inventory.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// JSON file store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InventoryStore for JsonFileStore {
    fn load(&self) -> Result<Vec<InventoryItem>, StoreError> {
        let items = read_document(&self.path)?
            .map(|doc| doc.items)
            .unwrap_or_default();
        tracing::debug!(path = ?self.path, count = items.len(), "loaded items from json store");
        Ok(items)
    }

    fn save(&self, items: &[InventoryItem]) -> Result<(), StoreError> {
        write_document(&self.path, items)?;
        tracing::debug!(path = ?self.path, count = items.len(), "saved items to json store");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}
