//! `vyapar-desktop`
//!
//! **Responsibility:** the application layer of VyaparTracker.
//!
//! This crate provides:
//! - Persistence of the item set (SQLite, JSON file, in-memory)
//! - The inventory service (mutate, save, notify)
//! - The presentation session (draft forms, sorting, status line)
//! - Backup/restore and a line-oriented terminal front end

pub mod backup;
pub mod config;
pub mod service;
pub mod session;
pub mod shell;
pub mod store;
pub mod types;

pub use config::{AppConfig, StoreKind};
pub use service::{InventoryService, ServiceError};
pub use session::{DraftField, Session, SessionError};
pub use store::{InMemoryStore, InventoryStore, JsonFileStore, SqliteStore, StoreError};
pub use types::{InventoryScreen, ItemRow, SortKey, StatusLevel, StatusMessage};
