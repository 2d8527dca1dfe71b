use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use vyapar_core::{DomainError, DomainResult, Entity, ItemId, Money, Quantity};

use crate::inventory::RESTOCK_QUANTITY;

/// Categories offered as suggestions when composing an item.
///
/// `category` stays free text; these only seed the picker.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Groceries & Staples",
    "Electronics",
    "Clothing",
    "Home & Kitchen",
    "Beauty & Personal Care",
    "Stationery",
    "Snacks & Beverages",
    "Dairy Products",
];

/// Largest stock level or reorder point an item may hold.
///
/// With [`MAX_UNIT_PRICE`] this keeps every stock value below 1e18, so
/// per-item products and set totals stay far inside `Decimal` range.
pub const MAX_QUANTITY: Quantity = Quantity::from_units(1_000_000_000);

/// Largest unit price an item may carry.
pub const MAX_UNIT_PRICE: Money = Money::from_units(1_000_000_000);

/// How an item's stock is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitOfMeasure {
    Weight,
    Volume,
    #[default]
    Count,
}

impl UnitOfMeasure {
    pub const ALL: [UnitOfMeasure; 3] = [Self::Weight, Self::Volume, Self::Count];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitOfMeasure::Weight => "weight",
            UnitOfMeasure::Volume => "volume",
            UnitOfMeasure::Count => "count",
        }
    }
}

impl fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitOfMeasure {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weight" | "kg" | "g" => Ok(Self::Weight),
            "volume" | "l" | "ml" => Ok(Self::Volume),
            "count" | "pcs" | "unit" | "units" => Ok(Self::Count),
            other => Err(DomainError::validation(format!(
                "unknown unit '{other}' (expected weight, volume or count)"
            ))),
        }
    }
}

/// Everything about an item except its identity.
///
/// Drafts hold one of these; commits copy it wholesale onto the item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetails {
    pub name: String,
    pub current_stock: Quantity,
    pub reorder_point: Quantity,
    pub unit_price: Money,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub unit: UnitOfMeasure,
    #[serde(default)]
    pub category: String,
}

impl ItemDetails {
    /// Check field constraints.
    ///
    /// Numeric fields cannot be negative by construction; here they are only
    /// checked against their upper bounds.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        check_quantity(self.current_stock, "current stock")?;
        check_quantity(self.reorder_point, "reorder point")?;
        if self.unit_price > MAX_UNIT_PRICE {
            return Err(DomainError::validation(format!(
                "unit price cannot exceed {MAX_UNIT_PRICE} (got {})",
                self.unit_price
            )));
        }
        Ok(())
    }

    /// Trim the free-text fields.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.supplier = self.supplier.trim().to_string();
        self.category = self.category.trim().to_string();
        self
    }
}

pub(crate) fn check_quantity(value: Quantity, what: &str) -> DomainResult<()> {
    if value > MAX_QUANTITY {
        return Err(DomainError::validation(format!(
            "{what} cannot exceed {MAX_QUANTITY} (got {value})"
        )));
    }
    Ok(())
}

/// One SKU in the item set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    id: ItemId,
    #[serde(flatten)]
    details: ItemDetails,
}

impl InventoryItem {
    /// Assemble an item from stored parts (loading, tests).
    ///
    /// New items should go through `Inventory::add`, which validates first.
    pub fn from_parts(id: ItemId, details: ItemDetails) -> Self {
        Self { id, details }
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn details(&self) -> &ItemDetails {
        &self.details
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn current_stock(&self) -> Quantity {
        self.details.current_stock
    }

    pub fn reorder_point(&self) -> Quantity {
        self.details.reorder_point
    }

    pub fn unit_price(&self) -> Money {
        self.details.unit_price
    }

    pub fn supplier(&self) -> &str {
        &self.details.supplier
    }

    pub fn unit(&self) -> UnitOfMeasure {
        self.details.unit
    }

    pub fn category(&self) -> &str {
        &self.details.category
    }

    /// At or below the reorder point.
    pub fn is_low_stock(&self) -> bool {
        self.details.current_stock <= self.details.reorder_point
    }

    /// Exact stock value (stock × unit price), not rounded.
    pub fn stock_value(&self) -> Money {
        self.details.unit_price.times(self.details.current_stock)
    }

    /// Cost of one restock of this item, rounded to money precision.
    pub fn restock_cost(&self) -> Money {
        self.details.unit_price.times(RESTOCK_QUANTITY).rounded()
    }

    pub(crate) fn replace_details(&mut self, details: ItemDetails) {
        self.details = details;
    }

    pub(crate) fn add_stock(&mut self, quantity: Quantity) {
        self.details.current_stock = self.details.current_stock + quantity;
    }
}

impl Entity for InventoryItem {
    type Id = ItemId;

    fn id(&self) -> ItemId {
        self.id
    }
}
