//! Dashboard figures and the low-stock report.
//!
//! Everything here is computed from the current item set on demand.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use vyapar_core::{ItemId, Money, Quantity};

use crate::inventory::Inventory;
use crate::item::InventoryItem;

/// How many items the "top by stock" panel shows.
pub const TOP_BY_STOCK_LIMIT: usize = 5;

/// Label used for items whose category is blank.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One entry of the top-by-stock panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub item_id: ItemId,
    pub name: String,
    pub current_stock: Quantity,
}

/// Dashboard summary of the item set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySummary {
    pub item_count: usize,
    pub low_stock_count: usize,
    pub total_value: Money,
    /// Item count per category.
    pub by_category: BTreeMap<String, usize>,
    /// Up to [`TOP_BY_STOCK_LIMIT`] items, highest stock first.
    pub top_by_stock: Vec<StockLevel>,
}

impl Inventory {
    pub fn summary(&self) -> InventorySummary {
        let mut by_category = BTreeMap::new();
        for item in self.list() {
            let category = match item.category().trim() {
                "" => UNCATEGORIZED,
                other => other,
            };
            *by_category.entry(category.to_string()).or_insert(0) += 1;
        }

        let mut ranked: Vec<&InventoryItem> = self.list().iter().collect();
        // Stable sort keeps insertion order among equal stock levels.
        ranked.sort_by(|a, b| b.current_stock().cmp(&a.current_stock()));
        let top_by_stock = ranked
            .into_iter()
            .take(TOP_BY_STOCK_LIMIT)
            .map(|item| StockLevel {
                item_id: item.id_typed(),
                name: item.name().to_string(),
                current_stock: item.current_stock(),
            })
            .collect();

        InventorySummary {
            item_count: self.len(),
            low_stock_count: self.low_stock().len(),
            total_value: self.total_value(),
            by_category,
            top_by_stock,
        }
    }

    /// Items at or below `threshold` (or their own reorder point when `None`),
    /// lowest stock first.
    pub fn low_stock_report(&self, threshold: Option<Quantity>) -> Vec<&InventoryItem> {
        let mut report: Vec<&InventoryItem> = self
            .list()
            .iter()
            .filter(|item| match threshold {
                Some(limit) => item.current_stock() <= limit,
                None => item.is_low_stock(),
            })
            .collect();
        report.sort_by_key(|item| item.current_stock());
        report
    }
}
