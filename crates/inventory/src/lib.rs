//! Inventory domain module.
//!
//! This crate contains business rules for the item set, implemented purely as
//! deterministic domain logic (no IO, no rendering, no storage).

pub mod draft;
pub mod inventory;
pub mod item;
pub mod summary;

pub use draft::{EditDraft, NewItemDraft};
pub use inventory::{
    AddItem, DeleteItem, EditItem, Inventory, InventoryCommand, InventoryEvent, ItemAdded,
    ItemDeleted, ItemEdited, ItemRestocked, ItemsReplaced, RESTOCK_QUANTITY, ReplaceItems,
    RestockItem,
};
pub use item::{
    DEFAULT_CATEGORIES, InventoryItem, ItemDetails, MAX_QUANTITY, MAX_UNIT_PRICE, UnitOfMeasure,
};
pub use summary::{InventorySummary, StockLevel};

#[cfg(test)]
pub(crate) mod fixtures {
    use vyapar_core::{Money, Quantity};

    use crate::draft::NewItemDraft;
    use crate::item::{ItemDetails, UnitOfMeasure};

    pub(crate) fn details(name: &str, stock: u32, reorder: u32) -> ItemDetails {
        ItemDetails {
            name: name.to_string(),
            current_stock: Quantity::from_units(stock),
            reorder_point: Quantity::from_units(reorder),
            unit_price: Money::from_minor(1000),
            supplier: "Sharma Traders".to_string(),
            unit: UnitOfMeasure::Count,
            category: "Groceries & Staples".to_string(),
        }
    }

    pub(crate) fn draft(name: &str, stock: u32, reorder: u32) -> NewItemDraft {
        NewItemDraft::from(details(name, stock, reorder))
    }
}
