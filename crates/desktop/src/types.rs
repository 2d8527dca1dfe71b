//! View models handed to the presentation layer.
//!
//! These are plain serializable snapshots built by [`crate::Session::render`].
//! They never hold references into the inventory.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use vyapar_core::{DomainError, ItemId, Money, Quantity};
use vyapar_inventory::{InventoryItem, InventorySummary, ItemDetails, UnitOfMeasure};

/// Row order of the item table. The inventory itself keeps insertion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Insertion,
    Name,
    Stock,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Insertion => "insertion",
            SortKey::Name => "name",
            SortKey::Stock => "stock",
        }
    }

    /// Stable sort of `rows` by this key.
    pub fn apply(&self, rows: &mut [ItemRow]) {
        match self {
            SortKey::Insertion => {}
            SortKey::Name => rows.sort_by_key(|row| row.name.to_lowercase()),
            SortKey::Stock => rows.sort_by_key(|row| row.current_stock),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "insertion" | "added" | "none" => Ok(SortKey::Insertion),
            "name" => Ok(SortKey::Name),
            "stock" => Ok(SortKey::Stock),
            other => Err(DomainError::validation(format!(
                "unknown sort key '{other}' (expected insertion, name or stock)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// One-line feedback shown after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            text: text.into(),
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            StatusLevel::Info => write!(f, "{}", self.text),
            StatusLevel::Warning => write!(f, "warning: {}", self.text),
            StatusLevel::Error => write!(f, "error: {}", self.text),
        }
    }
}

/// One line of the item table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRow {
    pub id: ItemId,
    pub name: String,
    pub current_stock: Quantity,
    pub reorder_point: Quantity,
    pub unit_price: Money,
    pub unit: UnitOfMeasure,
    pub supplier: String,
    pub category: String,
    pub stock_value: Money,
    pub low_stock: bool,
    /// Restock is only offered for low-stock items.
    pub restock_enabled: bool,
}

impl From<&InventoryItem> for ItemRow {
    fn from(item: &InventoryItem) -> Self {
        let low = item.is_low_stock();
        Self {
            id: item.id_typed(),
            name: item.name().to_string(),
            current_stock: item.current_stock(),
            reorder_point: item.reorder_point(),
            unit_price: item.unit_price(),
            unit: item.unit(),
            supplier: item.supplier().to_string(),
            category: item.category().to_string(),
            stock_value: item.stock_value(),
            low_stock: low,
            restock_enabled: low,
        }
    }
}

/// Which form a draft belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "lowercase")]
pub enum DraftKind {
    Add,
    Edit(ItemId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftView {
    pub kind: DraftKind,
    pub details: ItemDetails,
}

/// Everything the main window shows, rebuilt on every render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryScreen {
    pub rows: Vec<ItemRow>,
    /// Low-stock panel, in list order.
    pub low_stock: Vec<ItemRow>,
    pub total_value: Money,
    pub summary: InventorySummary,
    pub sort: SortKey,
    /// Open add/edit forms.
    pub drafts: Vec<DraftView>,
    pub status: Option<StatusMessage>,
    pub unsaved: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, stock: u32) -> ItemRow {
        ItemRow {
            id: ItemId::new(),
            name: name.to_string(),
            current_stock: Quantity::from_units(stock),
            reorder_point: Quantity::ZERO,
            unit_price: Money::ZERO,
            unit: UnitOfMeasure::Count,
            supplier: String::new(),
            category: String::new(),
            stock_value: Money::ZERO,
            low_stock: false,
            restock_enabled: false,
        }
    }

    fn names(rows: &[ItemRow]) -> Vec<&str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn sort_keys() {
        let mut rows = vec![row("basmati", 40), row("Atta", 5), row("Chana", 40)];

        SortKey::Insertion.apply(&mut rows);
        assert_eq!(names(&rows), vec!["basmati", "Atta", "Chana"]);

        SortKey::Name.apply(&mut rows);
        assert_eq!(names(&rows), vec!["Atta", "basmati", "Chana"]);

        SortKey::Stock.apply(&mut rows);
        assert_eq!(names(&rows), vec!["Atta", "basmati", "Chana"]);
    }

    #[test]
    fn sort_key_parsing() {
        assert_eq!(" Stock ".parse::<SortKey>().unwrap(), SortKey::Stock);
        assert_eq!("added".parse::<SortKey>().unwrap(), SortKey::Insertion);
        assert!("price".parse::<SortKey>().unwrap_err().is_validation());
    }

    #[test]
    fn status_display_carries_level() {
        assert_eq!(StatusMessage::info("Added 'Atta'").to_string(), "Added 'Atta'");
        assert_eq!(StatusMessage::warning("x").to_string(), "warning: x");
        assert_eq!(StatusMessage::error("x").to_string(), "error: x");
    }

    #[test]
    fn draft_kind_serializes_tagged() {
        let id = ItemId::new();
        let json = serde_json::to_value(DraftKind::Edit(id)).unwrap();
        assert_eq!(json["kind"], "edit");
        assert_eq!(json["target"], id.to_string());
        assert_eq!(serde_json::to_value(DraftKind::Add).unwrap()["kind"], "add");
    }
}
