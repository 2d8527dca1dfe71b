//! Transient working copies used by add/edit forms.
//!
//! Drafts are never persisted. A `NewItemDraft` has no identifier until it is
//! committed; an `EditDraft` remembers which item it will overwrite.

use serde::{Deserialize, Serialize};

use vyapar_core::{DomainResult, ItemId, Money, Quantity};

use crate::item::{InventoryItem, ItemDetails, UnitOfMeasure};

/// Prototype item under construction. All fields start empty/zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItemDraft {
    pub details: ItemDetails,
}

impl NewItemDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.details.name = name.into();
        self
    }

    pub fn with_stock(mut self, current_stock: Quantity, reorder_point: Quantity) -> Self {
        self.details.current_stock = current_stock;
        self.details.reorder_point = reorder_point;
        self
    }

    pub fn with_price(mut self, unit_price: Money) -> Self {
        self.details.unit_price = unit_price;
        self
    }

    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.details.supplier = supplier.into();
        self
    }

    pub fn with_unit(mut self, unit: UnitOfMeasure) -> Self {
        self.details.unit = unit;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.details.category = category.into();
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        self.details.validate()
    }
}

impl From<ItemDetails> for NewItemDraft {
    fn from(details: ItemDetails) -> Self {
        Self { details }
    }
}

/// Working copy of an existing item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditDraft {
    target: ItemId,
    pub details: ItemDetails,
}

impl EditDraft {
    /// Start editing `item`; the draft begins as an exact copy.
    pub fn of(item: &InventoryItem) -> Self {
        Self {
            target: item.id_typed(),
            details: item.details().clone(),
        }
    }

    pub fn new(target: ItemId, details: ItemDetails) -> Self {
        Self { target, details }
    }

    /// Identifier of the item this draft overwrites on save.
    pub fn target(&self) -> ItemId {
        self.target
    }

    pub fn validate(&self) -> DomainResult<()> {
        self.details.validate()
    }
}
