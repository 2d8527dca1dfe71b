//! Inventory service: the domain object plus its collaborators.
//!
//! Every mutation runs in the same order:
//! 1. the domain validates and applies it in memory,
//! 2. the whole item set is saved through the store,
//! 3. the applied events are published so views re-render.
//!
//! If step 2 fails the in-memory change is kept, views are still notified, and
//! the caller gets [`ServiceError::Persistence`].

use std::sync::Arc;

use thiserror::Error;

use vyapar_core::{DomainError, ItemId, Money, Quantity};
use vyapar_events::{Event, EventBus, InMemoryEventBus, Subscription};
use vyapar_inventory::{
    EditDraft, Inventory, InventoryEvent, InventoryItem, InventorySummary, NewItemDraft,
};

use crate::store::{InventoryStore, StoreError};

/// Bus carrying inventory events to the presentation layer.
pub type InventoryEventBus = InMemoryEventBus<InventoryEvent>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Loading failed, or a save failed after the change was applied in memory.
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

impl ServiceError {
    /// The change is live in memory but not on disk.
    pub fn is_unsaved(&self) -> bool {
        matches!(self, ServiceError::Persistence(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Domain(e) if e.is_not_found())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ServiceError::Domain(e) if e.is_validation())
    }
}

pub struct InventoryService {
    inventory: Inventory,
    store: Box<dyn InventoryStore>,
    bus: Arc<InventoryEventBus>,
    unsaved: bool,
}

impl std::fmt::Debug for InventoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryService")
            .field("items", &self.inventory.len())
            .field("store", &self.store.describe())
            .field("unsaved", &self.unsaved)
            .finish()
    }
}

impl InventoryService {
    /// Load the item set from `store` and build the service around it.
    pub fn open(store: Box<dyn InventoryStore>) -> Result<Self, ServiceError> {
        Self::open_with_bus(store, Arc::new(InventoryEventBus::new()))
    }

    pub fn open_with_bus(
        store: Box<dyn InventoryStore>,
        bus: Arc<InventoryEventBus>,
    ) -> Result<Self, ServiceError> {
        let items = store.load()?;
        let inventory = Inventory::from_items(items)?;
        tracing::info!(
            store = %store.describe(),
            items = inventory.len(),
            low_stock = inventory.low_stock().len(),
            "inventory loaded"
        );
        Ok(Self {
            inventory,
            store,
            bus,
            unsaved: false,
        })
    }

    /// Receive every event applied from now on.
    pub fn subscribe(&self) -> Subscription<InventoryEvent> {
        self.bus.subscribe()
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn list(&self) -> &[InventoryItem] {
        self.inventory.list()
    }

    pub fn get(&self, id: ItemId) -> Option<&InventoryItem> {
        self.inventory.get(id)
    }

    pub fn low_stock(&self) -> Vec<&InventoryItem> {
        self.inventory.low_stock()
    }

    pub fn low_stock_report(&self, threshold: Option<Quantity>) -> Vec<&InventoryItem> {
        self.inventory.low_stock_report(threshold)
    }

    pub fn total_value(&self) -> Money {
        self.inventory.total_value()
    }

    pub fn restock_cost(&self, id: ItemId) -> Result<Money, ServiceError> {
        let item = self.inventory.get(id).ok_or_else(DomainError::not_found)?;
        Ok(Inventory::restock_cost(item))
    }

    pub fn summary(&self) -> InventorySummary {
        self.inventory.summary()
    }

    pub fn store_location(&self) -> String {
        self.store.describe()
    }

    /// True after a failed save until the next successful one.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    pub fn add(&mut self, draft: NewItemDraft) -> Result<InventoryItem, ServiceError> {
        let item = self.inventory.add(draft)?;
        tracing::info!(item_id = %item.id_typed(), name = %item.name(), "item added");
        self.commit()?;
        Ok(item)
    }

    pub fn edit(&mut self, draft: EditDraft) -> Result<InventoryItem, ServiceError> {
        let item = self.inventory.edit(draft)?.clone();
        tracing::info!(item_id = %item.id_typed(), name = %item.name(), "item edited");
        self.commit()?;
        Ok(item)
    }

    pub fn delete(&mut self, id: ItemId) -> Result<InventoryItem, ServiceError> {
        let item = self.inventory.delete(id)?;
        tracing::info!(item_id = %id, name = %item.name(), "item deleted");
        self.commit()?;
        Ok(item)
    }

    pub fn restock(&mut self, id: ItemId) -> Result<InventoryItem, ServiceError> {
        let item = self.inventory.restock(id)?.clone();
        tracing::info!(
            item_id = %id,
            name = %item.name(),
            stock = %item.current_stock(),
            "item restocked"
        );
        self.commit()?;
        Ok(item)
    }

    /// Replace the whole item set (used by restore).
    pub fn replace_all(&mut self, items: Vec<InventoryItem>) -> Result<(), ServiceError> {
        let count = items.len();
        self.inventory.replace_all(items)?;
        tracing::info!(items = count, "item set replaced");
        self.commit()
    }

    /// Write the current item set again (e.g. after a failed save).
    pub fn save_now(&mut self) -> Result<(), ServiceError> {
        self.persist()
    }

    fn commit(&mut self) -> Result<(), ServiceError> {
        let events = self.inventory.take_events();
        let saved = self.persist();

        for event in events {
            let kind = event.event_type();
            if let Err(err) = self.bus.publish(event) {
                tracing::warn!(event = kind, ?err, "failed to publish inventory event");
            }
        }

        saved
    }

    fn persist(&mut self) -> Result<(), ServiceError> {
        match self.store.save(self.inventory.list()) {
            Ok(()) => {
                self.unsaved = false;
                Ok(())
            }
            Err(err) => {
                self.unsaved = true;
                tracing::warn!(store = %self.store.describe(), error = %err, "save failed; change kept in memory only");
                Err(ServiceError::Persistence(err))
            }
        }
    }
}
