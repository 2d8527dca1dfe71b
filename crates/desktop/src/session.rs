//! Presentation session: draft slots, sort order and status line on top of the
//! inventory service.
//!
//! A session holds at most one new-item draft and one edit draft. Drafts are
//! cleared when the commit reached the inventory (including when only the save
//! failed) and kept when the commit was rejected, so the user can fix them.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use vyapar_core::{DomainError, ItemId, Money, Quantity};
use vyapar_events::Subscription;
use vyapar_inventory::{
    DEFAULT_CATEGORIES, EditDraft, InventoryEvent, InventoryItem, ItemDetails, NewItemDraft,
    UnitOfMeasure,
};

use crate::service::{InventoryService, ServiceError};
use crate::types::{DraftKind, DraftView, InventoryScreen, ItemRow, SortKey, StatusMessage};

/// Status text used when a change applied in memory but the save failed.
pub const NOT_PERSISTED: &str = "Saved locally but not persisted";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no {0} form is open")]
    NoActiveDraft(&'static str),

    #[error("restock is only available for low-stock items")]
    RestockDisabled(ItemId),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        SessionError::Service(ServiceError::Domain(err))
    }
}

impl SessionError {
    /// The mutation applied, only the save failed.
    pub fn is_unsaved(&self) -> bool {
        matches!(self, SessionError::Service(e) if e.is_unsaved())
    }
}

/// An editable draft field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    CurrentStock,
    ReorderPoint,
    UnitPrice,
    Supplier,
    Unit,
    Category,
}

impl DraftField {
    pub const ALL: [DraftField; 7] = [
        DraftField::Name,
        DraftField::CurrentStock,
        DraftField::ReorderPoint,
        DraftField::UnitPrice,
        DraftField::Supplier,
        DraftField::Unit,
        DraftField::Category,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::Name => "name",
            DraftField::CurrentStock => "stock",
            DraftField::ReorderPoint => "reorder",
            DraftField::UnitPrice => "price",
            DraftField::Supplier => "supplier",
            DraftField::Unit => "unit",
            DraftField::Category => "category",
        }
    }

    /// Parse `raw` into `details`. Nothing changes if parsing fails.
    pub fn assign(&self, details: &mut ItemDetails, raw: &str) -> Result<(), DomainError> {
        match self {
            DraftField::Name => details.name = raw.to_string(),
            DraftField::CurrentStock => details.current_stock = raw.parse::<Quantity>()?,
            DraftField::ReorderPoint => details.reorder_point = raw.parse::<Quantity>()?,
            DraftField::UnitPrice => details.unit_price = raw.parse::<Money>()?,
            DraftField::Supplier => details.supplier = raw.to_string(),
            DraftField::Unit => details.unit = raw.parse::<UnitOfMeasure>()?,
            DraftField::Category => details.category = raw.to_string(),
        }
        Ok(())
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DraftField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        match key.as_str() {
            "stock" | "current_stock" | "qty" => Ok(DraftField::CurrentStock),
            "reorder" | "reorder_point" => Ok(DraftField::ReorderPoint),
            "price" | "unit_price" => Ok(DraftField::UnitPrice),
            _ => DraftField::ALL
                .into_iter()
                .find(|field| field.as_str() == key)
                .ok_or_else(|| DomainError::validation(format!("unknown field '{key}'"))),
        }
    }
}

pub struct Session {
    service: InventoryService,
    updates: Subscription<InventoryEvent>,
    new_draft: Option<NewItemDraft>,
    edit_draft: Option<EditDraft>,
    sort: SortKey,
    status: Option<StatusMessage>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("service", &self.service)
            .field("new_draft", &self.new_draft.is_some())
            .field("edit_draft", &self.edit_draft.as_ref().map(EditDraft::target))
            .field("sort", &self.sort)
            .finish()
    }
}

impl Session {
    pub fn new(service: InventoryService) -> Self {
        let updates = service.subscribe();
        Self {
            service,
            updates,
            new_draft: None,
            edit_draft: None,
            sort: SortKey::default(),
            status: None,
        }
    }

    pub fn service(&self) -> &InventoryService {
        &self.service
    }

    /// Mutable access for actions that bypass the forms (backup/restore).
    pub fn service_mut(&mut self) -> &mut InventoryService {
        &mut self.service
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn set_status(&mut self, status: StatusMessage) {
        self.status = Some(status);
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    /// Category suggestions: the defaults plus any in use, defaults first.
    pub fn category_suggestions(&self) -> Vec<String> {
        let mut out: Vec<String> = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
        for item in self.service.list() {
            let category = item.category().trim();
            if !category.is_empty() && !out.iter().any(|c| c == category) {
                out.push(category.to_string());
            }
        }
        out
    }

    /// Open the add form with an empty draft, replacing any previous one.
    pub fn begin_add(&mut self) -> &mut NewItemDraft {
        self.new_draft.insert(NewItemDraft::new())
    }

    pub fn new_draft(&self) -> Option<&NewItemDraft> {
        self.new_draft.as_ref()
    }

    pub fn new_draft_mut(&mut self) -> Option<&mut NewItemDraft> {
        self.new_draft.as_mut()
    }

    pub fn cancel_add(&mut self) -> bool {
        self.new_draft.take().is_some()
    }

    pub fn commit_add(&mut self) -> Result<InventoryItem, SessionError> {
        let draft = self
            .new_draft
            .clone()
            .ok_or(SessionError::NoActiveDraft("add"))?;

        match self.service.add(draft) {
            Ok(item) => {
                self.new_draft = None;
                self.status = Some(StatusMessage::info(format!("Added '{}'", item.name())));
                Ok(item)
            }
            Err(err) => Err(self.fail(err, |s| s.new_draft = None)),
        }
    }

    /// Open the edit form on a copy of item `id`.
    pub fn begin_edit(&mut self, id: ItemId) -> Result<&mut EditDraft, SessionError> {
        let item = self.service.get(id).ok_or_else(DomainError::not_found)?;
        Ok(self.edit_draft.insert(EditDraft::of(item)))
    }

    pub fn edit_draft(&self) -> Option<&EditDraft> {
        self.edit_draft.as_ref()
    }

    pub fn edit_draft_mut(&mut self) -> Option<&mut EditDraft> {
        self.edit_draft.as_mut()
    }

    pub fn cancel_edit(&mut self) -> bool {
        self.edit_draft.take().is_some()
    }

    pub fn commit_edit(&mut self) -> Result<InventoryItem, SessionError> {
        let draft = self
            .edit_draft
            .clone()
            .ok_or(SessionError::NoActiveDraft("edit"))?;

        match self.service.edit(draft) {
            Ok(item) => {
                self.edit_draft = None;
                self.status = Some(StatusMessage::info(format!("Updated '{}'", item.name())));
                Ok(item)
            }
            Err(err) => Err(self.fail(err, |s| s.edit_draft = None)),
        }
    }

    /// Set a field on the open form: the edit form if one is open, otherwise
    /// the add form.
    pub fn set_field(&mut self, field: DraftField, raw: &str) -> Result<DraftKind, SessionError> {
        if let Some(draft) = self.edit_draft.as_mut() {
            field.assign(&mut draft.details, raw)?;
            return Ok(DraftKind::Edit(draft.target()));
        }
        if let Some(draft) = self.new_draft.as_mut() {
            field.assign(&mut draft.details, raw)?;
            return Ok(DraftKind::Add);
        }
        Err(SessionError::NoActiveDraft("add or edit"))
    }

    pub fn delete(&mut self, id: ItemId) -> Result<InventoryItem, SessionError> {
        match self.service.delete(id) {
            Ok(item) => {
                self.status = Some(StatusMessage::info(format!("Deleted '{}'", item.name())));
                Ok(item)
            }
            Err(err) => Err(self.fail(err, |_| {})),
        }
    }

    /// Whether the restock action is offered for `id`.
    pub fn restock_enabled(&self, id: ItemId) -> bool {
        self.service.get(id).is_some_and(InventoryItem::is_low_stock)
    }

    /// Restock a low-stock item. Items above their reorder point are refused
    /// here even though the inventory itself would accept them.
    pub fn restock(&mut self, id: ItemId) -> Result<InventoryItem, SessionError> {
        let Some(item) = self.service.get(id) else {
            return Err(self.fail(DomainError::not_found().into(), |_| {}));
        };
        if !item.is_low_stock() {
            let text = format!("'{}' is not low on stock", item.name());
            self.status = Some(StatusMessage::warning(text));
            return Err(SessionError::RestockDisabled(id));
        }

        match self.service.restock(id) {
            Ok(item) => {
                self.status = Some(StatusMessage::info(format!(
                    "Restocked '{}' to {}",
                    item.name(),
                    item.current_stock()
                )));
                Ok(item)
            }
            Err(err) => Err(self.fail(err, |_| {})),
        }
    }

    /// Retry persisting the current item set.
    pub fn save_now(&mut self) -> Result<(), SessionError> {
        match self.service.save_now() {
            Ok(()) => {
                self.status = Some(StatusMessage::info("All changes saved"));
                Ok(())
            }
            Err(err) => Err(self.fail(err, |_| {})),
        }
    }

    /// Apply pending inventory events to session state. Returns how many
    /// events were seen.
    ///
    /// An open edit form whose item disappeared is closed.
    pub fn refresh(&mut self) -> usize {
        let events = self.updates.drain();
        if let Some(target) = self.edit_draft.as_ref().map(EditDraft::target) {
            if self.service.get(target).is_none() {
                self.edit_draft = None;
                self.status = Some(StatusMessage::warning(
                    "The item being edited no longer exists; edit cancelled",
                ));
            }
        }
        if !events.is_empty() {
            tracing::debug!(events = events.len(), "session refreshed");
        }
        events.len()
    }

    /// Build the screen from the current inventory state.
    pub fn render(&mut self) -> InventoryScreen {
        self.refresh();

        let mut rows: Vec<ItemRow> = self.service.list().iter().map(ItemRow::from).collect();
        self.sort.apply(&mut rows);

        let low_stock = self
            .service
            .low_stock()
            .into_iter()
            .map(ItemRow::from)
            .collect();

        let mut drafts = Vec::new();
        if let Some(draft) = &self.new_draft {
            drafts.push(DraftView {
                kind: DraftKind::Add,
                details: draft.details.clone(),
            });
        }
        if let Some(draft) = &self.edit_draft {
            drafts.push(DraftView {
                kind: DraftKind::Edit(draft.target()),
                details: draft.details.clone(),
            });
        }

        InventoryScreen {
            rows,
            low_stock,
            total_value: self.service.total_value(),
            summary: self.service.summary(),
            sort: self.sort,
            drafts,
            status: self.status.clone(),
            unsaved: self.service.has_unsaved_changes(),
        }
    }

    /// Record the status for `err`. `on_applied` runs when the mutation
    /// reached the inventory and only the save failed.
    fn fail(&mut self, err: ServiceError, on_applied: impl FnOnce(&mut Self)) -> SessionError {
        let status = match &err {
            ServiceError::Persistence(e) => {
                on_applied(self);
                StatusMessage::warning(format!("{NOT_PERSISTED}: {e}"))
            }
            ServiceError::Domain(DomainError::NotFound) => StatusMessage::error("Item not found"),
            ServiceError::Domain(e) => StatusMessage::error(e.to_string()),
        };
        self.status = Some(status);
        SessionError::Service(err)
    }
}
