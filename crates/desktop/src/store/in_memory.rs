use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use vyapar_inventory::InventoryItem;

use super::{InventoryStore, StoreError};

/// In-memory store.
///
/// Intended for tests/dev. Saves can be made to fail on demand so callers can
/// exercise the "changed locally, not persisted" path.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    items: RwLock<Vec<InventoryItem>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<InventoryItem>) -> Self {
        Self {
            items: RwLock::new(items),
            ..Self::default()
        }
    }

    /// Make every following `save` fail (or succeed again).
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Snapshot of what was last saved.
    pub fn snapshot(&self) -> Vec<InventoryItem> {
        self.items.read().map(|items| items.clone()).unwrap_or_default()
    }
}

impl InventoryStore for InMemoryStore {
    fn load(&self) -> Result<Vec<InventoryItem>, StoreError> {
        let items = self
            .items
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(items.clone())
    }

    fn save(&self, items: &[InventoryItem]) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("saves disabled".to_string()));
        }
        let mut stored = self
            .items
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        *stored = items.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
