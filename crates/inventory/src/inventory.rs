use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vyapar_core::{
    Aggregate, DomainError, DomainResult, Entity, ItemId, Money, Quantity, first_duplicate_id,
    position_of,
};
use vyapar_events::Event;

use crate::draft::{EditDraft, NewItemDraft};
use crate::item::{InventoryItem, ItemDetails, check_quantity};

/// Units added to an item's stock by one restock.
pub const RESTOCK_QUANTITY: Quantity = Quantity::from_units(50);

/// Command: AddItem.
///
/// Built by [`AddItem::from_draft`], which validates before an identifier is
/// generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub item_id: ItemId,
    pub details: ItemDetails,
    pub occurred_at: DateTime<Utc>,
}

impl AddItem {
    pub fn from_draft(draft: NewItemDraft, occurred_at: DateTime<Utc>) -> DomainResult<Self> {
        draft.validate()?;
        Ok(Self {
            item_id: ItemId::new(),
            details: draft.details.normalized(),
            occurred_at,
        })
    }
}

/// Command: EditItem (full overwrite).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditItem {
    pub item_id: ItemId,
    pub details: ItemDetails,
    pub occurred_at: DateTime<Utc>,
}

impl EditItem {
    pub fn from_draft(draft: EditDraft, occurred_at: DateTime<Utc>) -> Self {
        Self {
            item_id: draft.target(),
            details: draft.details.normalized(),
            occurred_at,
        }
    }
}

/// Command: DeleteItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteItem {
    pub item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RestockItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockItem {
    pub item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ReplaceItems (restore from a snapshot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceItems {
    pub items: Vec<InventoryItem>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryCommand {
    AddItem(AddItem),
    EditItem(EditItem),
    DeleteItem(DeleteItem),
    RestockItem(RestockItem),
    ReplaceItems(ReplaceItems),
}

/// Event: ItemAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub item: InventoryItem,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemEdited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEdited {
    pub item_id: ItemId,
    pub details: ItemDetails,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemDeleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDeleted {
    pub item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemRestocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRestocked {
    pub item_id: ItemId,
    pub quantity: Quantity,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemsReplaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsReplaced {
    pub items: Vec<InventoryItem>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryEvent {
    ItemAdded(ItemAdded),
    ItemEdited(ItemEdited),
    ItemDeleted(ItemDeleted),
    ItemRestocked(ItemRestocked),
    ItemsReplaced(ItemsReplaced),
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::ItemAdded(_) => "inventory.item.added",
            InventoryEvent::ItemEdited(_) => "inventory.item.edited",
            InventoryEvent::ItemDeleted(_) => "inventory.item.deleted",
            InventoryEvent::ItemRestocked(_) => "inventory.item.restocked",
            InventoryEvent::ItemsReplaced(_) => "inventory.items.replaced",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::ItemAdded(e) => e.occurred_at,
            InventoryEvent::ItemEdited(e) => e.occurred_at,
            InventoryEvent::ItemDeleted(e) => e.occurred_at,
            InventoryEvent::ItemRestocked(e) => e.occurred_at,
            InventoryEvent::ItemsReplaced(e) => e.occurred_at,
        }
    }
}

impl InventoryEvent {
    /// The single item this event touched, if any.
    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            InventoryEvent::ItemAdded(e) => Some(e.item.id_typed()),
            InventoryEvent::ItemEdited(e) => Some(e.item_id),
            InventoryEvent::ItemDeleted(e) => Some(e.item_id),
            InventoryEvent::ItemRestocked(e) => Some(e.item_id),
            InventoryEvent::ItemsReplaced(_) => None,
        }
    }
}

/// The item set.
///
/// Holds items in insertion order. Derived views (`low_stock`, totals) are
/// computed from `items` on every call and never stored.
///
/// Mutations go through `handle` + `apply`; the convenience methods (`add`,
/// `edit`, `delete`, `restock`) do both and keep the applied events until the
/// owner collects them with [`Inventory::take_events`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    items: Vec<InventoryItem>,
    version: u64,
    uncommitted: Vec<InventoryEvent>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a previously saved item list.
    ///
    /// Rejects lists that repeat an identifier or hold an item that would
    /// fail validation, the same checks a restore applies.
    pub fn from_items(items: Vec<InventoryItem>) -> DomainResult<Self> {
        ensure_unique_ids(&items)?;
        for item in &items {
            item.details().validate()?;
        }
        Ok(Self {
            items,
            version: 0,
            uncommitted: Vec::new(),
        })
    }

    pub fn list(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&InventoryItem> {
        self.items.iter().find(|item| item.id_typed() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items with `current_stock <= reorder_point`, in list order.
    pub fn low_stock(&self) -> Vec<&InventoryItem> {
        self.items.iter().filter(|item| item.is_low_stock()).collect()
    }

    /// Sum of stock × unit price over all items, rounded to money precision.
    ///
    /// Validated items are bounded by `MAX_QUANTITY` and `MAX_UNIT_PRICE`, so
    /// the sum cannot overflow.
    pub fn total_value(&self) -> Money {
        self.items
            .iter()
            .map(InventoryItem::stock_value)
            .sum::<Money>()
            .rounded()
    }

    /// Cost of restocking `item` once (`RESTOCK_QUANTITY × unit_price`).
    pub fn restock_cost(item: &InventoryItem) -> Money {
        item.restock_cost()
    }

    /// Add a committed draft. Returns the created item.
    pub fn add(&mut self, draft: NewItemDraft) -> DomainResult<InventoryItem> {
        let cmd = AddItem::from_draft(draft, Utc::now())?;
        let item_id = cmd.item_id;
        self.execute(&InventoryCommand::AddItem(cmd))?;
        self.get(item_id).cloned().ok_or_else(DomainError::not_found)
    }

    /// Overwrite the draft's target item wholesale.
    pub fn edit(&mut self, draft: EditDraft) -> DomainResult<&InventoryItem> {
        let cmd = EditItem::from_draft(draft, Utc::now());
        let item_id = cmd.item_id;
        self.execute(&InventoryCommand::EditItem(cmd))?;
        self.get(item_id).ok_or_else(DomainError::not_found)
    }

    /// Remove an item. Deleting an absent id signals `NotFound`.
    pub fn delete(&mut self, id: ItemId) -> DomainResult<InventoryItem> {
        let removed = self.get(id).cloned().ok_or_else(DomainError::not_found)?;
        self.execute(&InventoryCommand::DeleteItem(DeleteItem {
            item_id: id,
            occurred_at: Utc::now(),
        }))?;
        Ok(removed)
    }

    /// Add [`RESTOCK_QUANTITY`] to an item's stock.
    ///
    /// Works whether or not the item is currently low, but is rejected if
    /// the new stock would exceed `MAX_QUANTITY`.
    pub fn restock(&mut self, id: ItemId) -> DomainResult<&InventoryItem> {
        self.execute(&InventoryCommand::RestockItem(RestockItem {
            item_id: id,
            occurred_at: Utc::now(),
        }))?;
        self.get(id).ok_or_else(DomainError::not_found)
    }

    /// Replace the whole item set (restore).
    pub fn replace_all(&mut self, items: Vec<InventoryItem>) -> DomainResult<()> {
        self.execute(&InventoryCommand::ReplaceItems(ReplaceItems {
            items,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    /// Handle a command and apply the resulting events.
    ///
    /// Either every event is applied or, on error, none is.
    pub fn execute(&mut self, command: &InventoryCommand) -> DomainResult<Vec<InventoryEvent>> {
        let events = self.handle(command)?;
        for event in &events {
            self.apply(event);
        }
        self.uncommitted.extend(events.iter().cloned());
        Ok(events)
    }

    /// Take the events applied since the last call.
    pub fn take_events(&mut self) -> Vec<InventoryEvent> {
        std::mem::take(&mut self.uncommitted)
    }

    fn position(&self, id: ItemId) -> Option<usize> {
        position_of(&self.items, id)
    }

    fn ensure_exists(&self, id: ItemId) -> DomainResult<()> {
        if self.position(id).is_none() {
            return Err(DomainError::not_found());
        }
        Ok(())
    }

    fn handle_add(&self, cmd: &AddItem) -> DomainResult<Vec<InventoryEvent>> {
        cmd.details.validate()?;
        if self.position(cmd.item_id).is_some() {
            return Err(DomainError::conflict(format!(
                "item {} already exists",
                cmd.item_id
            )));
        }
        Ok(vec![InventoryEvent::ItemAdded(ItemAdded {
            item: InventoryItem::from_parts(cmd.item_id, cmd.details.clone()),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_edit(&self, cmd: &EditItem) -> DomainResult<Vec<InventoryEvent>> {
        cmd.details.validate()?;
        self.ensure_exists(cmd.item_id)?;
        Ok(vec![InventoryEvent::ItemEdited(ItemEdited {
            item_id: cmd.item_id,
            details: cmd.details.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_delete(&self, cmd: &DeleteItem) -> DomainResult<Vec<InventoryEvent>> {
        self.ensure_exists(cmd.item_id)?;
        Ok(vec![InventoryEvent::ItemDeleted(ItemDeleted {
            item_id: cmd.item_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_restock(&self, cmd: &RestockItem) -> DomainResult<Vec<InventoryEvent>> {
        let item = self.get(cmd.item_id).ok_or_else(DomainError::not_found)?;
        let restocked = item
            .current_stock()
            .checked_add(RESTOCK_QUANTITY)
            .ok_or_else(|| DomainError::validation("restocked stock is out of range"))?;
        check_quantity(restocked, "restocked stock")?;
        Ok(vec![InventoryEvent::ItemRestocked(ItemRestocked {
            item_id: cmd.item_id,
            quantity: RESTOCK_QUANTITY,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_replace(&self, cmd: &ReplaceItems) -> DomainResult<Vec<InventoryEvent>> {
        ensure_unique_ids(&cmd.items)?;
        for item in &cmd.items {
            item.details().validate()?;
        }
        Ok(vec![InventoryEvent::ItemsReplaced(ItemsReplaced {
            items: cmd.items.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }
}

impl Aggregate for Inventory {
    type Command = InventoryCommand;
    type Event = InventoryEvent;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InventoryEvent::ItemAdded(e) => {
                self.items.push(e.item.clone());
            }
            InventoryEvent::ItemEdited(e) => {
                if let Some(idx) = self.position(e.item_id) {
                    self.items[idx].replace_details(e.details.clone());
                }
            }
            InventoryEvent::ItemDeleted(e) => {
                self.items.retain(|item| item.id() != e.item_id);
            }
            InventoryEvent::ItemRestocked(e) => {
                if let Some(idx) = self.position(e.item_id) {
                    self.items[idx].add_stock(e.quantity);
                }
            }
            InventoryEvent::ItemsReplaced(e) => {
                self.items = e.items.clone();
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InventoryCommand::AddItem(cmd) => self.handle_add(cmd),
            InventoryCommand::EditItem(cmd) => self.handle_edit(cmd),
            InventoryCommand::DeleteItem(cmd) => self.handle_delete(cmd),
            InventoryCommand::RestockItem(cmd) => self.handle_restock(cmd),
            InventoryCommand::ReplaceItems(cmd) => self.handle_replace(cmd),
        }
    }
}

fn ensure_unique_ids(items: &[InventoryItem]) -> DomainResult<()> {
    match first_duplicate_id(items) {
        Some(id) => Err(DomainError::conflict(format!("duplicate item id {id}"))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{details, draft};
    use crate::item::{MAX_QUANTITY, MAX_UNIT_PRICE, UnitOfMeasure};
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn money(value: Decimal) -> Money {
        Money::new(value).unwrap()
    }

    #[test]
    fn empty_inventory_has_zero_value_and_no_low_stock() {
        let inventory = Inventory::new();
        assert_eq!(inventory.total_value(), Money::ZERO);
        assert_eq!(inventory.total_value().to_string(), "0.00");
        assert!(inventory.low_stock().is_empty());
        assert!(inventory.is_empty());
    }

    #[test]
    fn toor_dal_scenario() {
        let mut inventory = Inventory::new();
        let item = inventory
            .add(draft("Toor Dal", 10, 15).with_price(money(dec!(180.50))))
            .unwrap();

        let low: Vec<ItemId> = inventory.low_stock().iter().map(|i| i.id_typed()).collect();
        assert_eq!(low, vec![item.id_typed()]);

        let restocked = inventory.restock(item.id_typed()).unwrap();
        assert_eq!(restocked.current_stock(), Quantity::from_units(60));
        assert_eq!(Inventory::restock_cost(restocked).amount(), dec!(9025.00));
        assert!(inventory.low_stock().is_empty());
    }

    #[test]
    fn add_assigns_fresh_ids_and_keeps_insertion_order() {
        let mut inventory = Inventory::new();
        let a = inventory.add(draft("Sugar", 5, 2)).unwrap();
        let b = inventory.add(draft("Salt", 5, 2)).unwrap();
        assert_ne!(a.id_typed(), b.id_typed());
        let names: Vec<&str> = inventory.list().iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["Sugar", "Salt"]);
    }

    #[test]
    fn add_trims_free_text() {
        let mut inventory = Inventory::new();
        let item = inventory
            .add(draft("  Jaggery ", 1, 1).with_supplier(" Patel & Sons ").with_category(" Groceries "))
            .unwrap();
        assert_eq!(item.name(), "Jaggery");
        assert_eq!(item.supplier(), "Patel & Sons");
        assert_eq!(item.category(), "Groceries");
    }

    #[test]
    fn add_with_empty_name_changes_nothing() {
        let mut inventory = Inventory::new();
        inventory.add(draft("Sugar", 5, 2)).unwrap();
        inventory.take_events();
        let before = inventory.clone();

        let err = inventory.add(NewItemDraft::new()).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(inventory, before);
        assert!(inventory.take_events().is_empty());
    }

    #[test]
    fn delete_unknown_id_is_not_found_and_changes_nothing() {
        let mut inventory = Inventory::new();
        inventory.add(draft("Sugar", 5, 2)).unwrap();
        let before = inventory.list().to_vec();

        let err = inventory.delete(ItemId::new()).unwrap_err();
        assert_eq!(err, DomainError::NotFound);
        assert_eq!(inventory.list(), before.as_slice());
    }

    #[test]
    fn second_delete_signals_not_found() {
        let mut inventory = Inventory::new();
        let item = inventory.add(draft("Sugar", 5, 2)).unwrap();
        inventory.delete(item.id_typed()).unwrap();
        assert!(inventory.delete(item.id_typed()).unwrap_err().is_not_found());
    }

    #[test]
    fn restock_and_edit_unknown_ids_are_not_found() {
        let mut inventory = Inventory::new();
        assert!(inventory.restock(ItemId::new()).unwrap_err().is_not_found());
        let edit = EditDraft::new(ItemId::new(), details("Ghost", 1, 1));
        assert!(inventory.edit(edit).unwrap_err().is_not_found());
    }

    #[test]
    fn restock_is_unconditional() {
        let mut inventory = Inventory::new();
        let item = inventory.add(draft("Paneer", 500, 10)).unwrap();
        assert!(!item.is_low_stock());
        let after = inventory.restock(item.id_typed()).unwrap();
        assert_eq!(after.current_stock(), Quantity::from_units(550));
    }

    #[test]
    fn edit_overwrites_every_field() {
        let mut inventory = Inventory::new();
        let item = inventory.add(draft("Milk", 20, 10)).unwrap();

        let mut edit = EditDraft::of(&item);
        edit.details = ItemDetails {
            name: "Toned Milk".to_string(),
            current_stock: Quantity::new(dec!(12.5)).unwrap(),
            reorder_point: Quantity::from_units(15),
            unit_price: money(dec!(54.00)),
            supplier: String::new(),
            unit: UnitOfMeasure::Volume,
            category: "Dairy Products".to_string(),
        };
        let edited = inventory.edit(edit.clone()).unwrap().clone();

        assert_eq!(edited.id_typed(), item.id_typed());
        assert_eq!(edited.details(), &edit.details);
        assert!(edited.is_low_stock());
    }

    #[test]
    fn edit_with_blank_name_is_rejected_before_mutation() {
        let mut inventory = Inventory::new();
        let item = inventory.add(draft("Milk", 20, 10)).unwrap();
        let mut edit = EditDraft::of(&item);
        edit.details.name = " ".to_string();

        assert!(inventory.edit(edit).unwrap_err().is_validation());
        assert_eq!(inventory.get(item.id_typed()).unwrap(), &item);
    }

    #[test]
    fn from_items_rejects_duplicate_ids() {
        let id = ItemId::new();
        let items = vec![
            InventoryItem::from_parts(id, details("A", 1, 1)),
            InventoryItem::from_parts(id, details("B", 1, 1)),
        ];
        match Inventory::from_items(items).unwrap_err() {
            DomainError::Conflict(msg) => assert!(msg.contains("duplicate")),
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn from_items_validates_like_a_restore() {
        let blank = vec![InventoryItem::from_parts(ItemId::new(), details("  ", 1, 1))];
        assert!(Inventory::from_items(blank.clone()).unwrap_err().is_validation());
        assert!(Inventory::new().replace_all(blank).unwrap_err().is_validation());

        let mut oversized = details("Rice", 1, 1);
        oversized.current_stock = Quantity::new(Decimal::MAX).unwrap();
        let items = vec![InventoryItem::from_parts(ItemId::new(), oversized)];
        assert!(Inventory::from_items(items).unwrap_err().is_validation());
    }

    #[test]
    fn huge_stock_and_price_are_rejected_before_mutation() {
        let mut inventory = Inventory::new();
        let huge = dec!(10000000000000000000);
        let oversized = draft("Rice", 0, 0)
            .with_stock(Quantity::new(huge).unwrap(), Quantity::ZERO)
            .with_price(money(huge));
        assert!(inventory.add(oversized).unwrap_err().is_validation());
        assert!(inventory.is_empty());

        let item = inventory.add(draft("Rice", 10, 5)).unwrap();
        let mut edit = EditDraft::of(&item);
        edit.details.unit_price = money(huge);
        assert!(inventory.edit(edit).unwrap_err().is_validation());
        assert_eq!(inventory.get(item.id_typed()).unwrap(), &item);
        assert_eq!(inventory.total_value().to_string(), "100.00");
    }

    #[test]
    fn restock_past_the_stock_bound_is_rejected() {
        let mut inventory = Inventory::new();
        let at_bound = draft("Rice", 0, 0).with_stock(MAX_QUANTITY, MAX_QUANTITY);
        let item = inventory.add(at_bound).unwrap();
        inventory.take_events();

        assert!(inventory.restock(item.id_typed()).unwrap_err().is_validation());
        assert_eq!(inventory.get(item.id_typed()).unwrap().current_stock(), MAX_QUANTITY);
        assert!(inventory.take_events().is_empty());
    }

    #[test]
    fn total_value_at_the_bounds_does_not_overflow() {
        let mut inventory = Inventory::new();
        for name in ["A", "B", "C"] {
            inventory
                .add(
                    draft(name, 0, 0)
                        .with_stock(MAX_QUANTITY, Quantity::ZERO)
                        .with_price(MAX_UNIT_PRICE),
                )
                .unwrap();
        }
        assert_eq!(inventory.total_value().amount(), dec!(3000000000000000000.00));
    }

    #[test]
    fn replace_all_swaps_the_item_set() {
        let mut inventory = Inventory::new();
        inventory.add(draft("Old", 1, 1)).unwrap();
        let replacement = vec![InventoryItem::from_parts(ItemId::new(), details("New", 3, 1))];

        inventory.replace_all(replacement.clone()).unwrap();
        assert_eq!(inventory.list(), replacement.as_slice());
    }

    #[test]
    fn execute_records_events_and_bumps_version() {
        let mut inventory = Inventory::new();
        let item = inventory.add(draft("Tea", 3, 5)).unwrap();
        inventory.restock(item.id_typed()).unwrap();

        let events = inventory.take_events();
        let kinds: Vec<&str> = events.iter().map(|e| e.event_type()).collect();
        assert_eq!(kinds, vec!["inventory.item.added", "inventory.item.restocked"]);
        assert!(events.iter().all(|e| e.item_id() == Some(item.id_typed())));
        assert_eq!(inventory.version(), 2);
        assert!(inventory.take_events().is_empty());
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let mut inventory = Inventory::new();
        let item = inventory.add(draft("Tea", 3, 5)).unwrap();
        let before = inventory.clone();

        let cmd = InventoryCommand::RestockItem(RestockItem {
            item_id: item.id_typed(),
            occurred_at: Utc::now(),
        });
        let events1 = inventory.handle(&cmd).unwrap();
        let events2 = inventory.handle(&cmd).unwrap();

        assert_eq!(inventory, before);
        assert_eq!(events1, events2);
    }

    #[test]
    fn total_value_rounds_once_after_summing() {
        let mut inventory = Inventory::new();
        // 0.335 each: rounding per item would give 0.68, the exact sum is 0.670.
        for name in ["A", "B"] {
            inventory
                .add(draft(name, 1, 0).with_price(money(dec!(0.335))))
                .unwrap();
        }
        assert_eq!(inventory.total_value().amount(), dec!(0.67));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add { stock: u32, reorder: u32, price_minor: u32 },
        Edit { pick: usize, stock: u32, reorder: u32 },
        Delete { pick: usize },
        Restock { pick: usize },
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u32..200, 0u32..100, 0u32..100_000)
                .prop_map(|(stock, reorder, price_minor)| Op::Add { stock, reorder, price_minor }),
            (any::<usize>(), 0u32..200, 0u32..100)
                .prop_map(|(pick, stock, reorder)| Op::Edit { pick, stock, reorder }),
            any::<usize>().prop_map(|pick| Op::Delete { pick }),
            any::<usize>().prop_map(|pick| Op::Restock { pick }),
        ]
    }

    fn pick_id(inventory: &Inventory, pick: usize) -> Option<ItemId> {
        if inventory.is_empty() {
            return None;
        }
        Some(inventory.list()[pick % inventory.len()].id_typed())
    }

    fn run(inventory: &mut Inventory, op: &Op) {
        match *op {
            Op::Add { stock, reorder, price_minor } => {
                inventory
                    .add(draft("Item", stock, reorder).with_price(Money::from_minor(price_minor)))
                    .unwrap();
            }
            Op::Edit { pick, stock, reorder } => {
                if let Some(id) = pick_id(inventory, pick) {
                    let mut edit = EditDraft::of(inventory.get(id).unwrap());
                    edit.details.current_stock = Quantity::from_units(stock);
                    edit.details.reorder_point = Quantity::from_units(reorder);
                    inventory.edit(edit).unwrap();
                }
            }
            Op::Delete { pick } => {
                if let Some(id) = pick_id(inventory, pick) {
                    inventory.delete(id).unwrap();
                }
            }
            Op::Restock { pick } => {
                if let Some(id) = pick_id(inventory, pick) {
                    inventory.restock(id).unwrap();
                }
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: low_stock always equals a fresh filter of list().
        #[test]
        fn low_stock_matches_filter_after_any_sequence(
            ops in prop::collection::vec(op_strategy(), 0..40)
        ) {
            let mut inventory = Inventory::new();
            for op in &ops {
                run(&mut inventory, op);
                let expected: Vec<&InventoryItem> = inventory
                    .list()
                    .iter()
                    .filter(|i| i.current_stock() <= i.reorder_point())
                    .collect();
                prop_assert_eq!(inventory.low_stock(), expected);
            }
        }

        /// Property: total_value equals the rounded sum of stock × price.
        #[test]
        fn total_value_matches_sum(
            ops in prop::collection::vec(op_strategy(), 0..40)
        ) {
            let mut inventory = Inventory::new();
            for op in &ops {
                run(&mut inventory, op);
            }
            let exact: Decimal = inventory
                .list()
                .iter()
                .map(|i| i.current_stock().value() * i.unit_price().amount())
                .sum();
            let expected = exact.round_dp_with_strategy(
                2,
                rust_decimal::RoundingStrategy::MidpointAwayFromZero,
            );
            prop_assert_eq!(inventory.total_value().amount(), expected);
        }

        /// Property: restock adds exactly RESTOCK_QUANTITY and touches nothing else.
        #[test]
        fn restock_adds_fixed_quantity_only(
            stock in 0u32..10_000,
            reorder in 0u32..10_000,
            price_minor in 0u32..10_000_000,
        ) {
            let mut inventory = Inventory::new();
            let item = inventory
                .add(draft("Rice", stock, reorder).with_price(Money::from_minor(price_minor)))
                .unwrap();

            let after = inventory.restock(item.id_typed()).unwrap().clone();

            let mut expected = item.details().clone();
            expected.current_stock = item.current_stock() + RESTOCK_QUANTITY;
            prop_assert_eq!(after.id_typed(), item.id_typed());
            prop_assert_eq!(after.details(), &expected);
        }

        /// Property: add followed by delete restores the prior item set.
        #[test]
        fn add_then_delete_restores_content(
            ops in prop::collection::vec(op_strategy(), 0..20),
            stock in 0u32..100,
        ) {
            let mut inventory = Inventory::new();
            for op in &ops {
                run(&mut inventory, op);
            }
            let before = inventory.list().to_vec();

            let item = inventory.add(draft("Temp", stock, 1)).unwrap();
            inventory.delete(item.id_typed()).unwrap();

            prop_assert_eq!(inventory.list(), before.as_slice());
        }

        /// Property: applying the same edit draft twice equals applying it once.
        #[test]
        fn edit_is_idempotent(stock in 0u32..500, reorder in 0u32..500) {
            let mut inventory = Inventory::new();
            let item = inventory.add(draft("Besan", 1, 1)).unwrap();
            let mut edit = EditDraft::of(&item);
            edit.details.current_stock = Quantity::from_units(stock);
            edit.details.reorder_point = Quantity::from_units(reorder);

            let once = inventory.edit(edit.clone()).unwrap().clone();
            let list_once = inventory.list().to_vec();
            let twice = inventory.edit(edit).unwrap().clone();

            prop_assert_eq!(once, twice);
            prop_assert_eq!(inventory.list(), list_once.as_slice());
        }
    }
}
