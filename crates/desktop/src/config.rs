//! Application configuration.
//!
//! Resolution order: command-line flag, then environment variable, then
//! default. The data directory defaults to `{app_data_dir}/vyapar`.

use std::path::PathBuf;

use anyhow::Context;
use clap::ValueEnum;

use crate::store::{InMemoryStore, InventoryStore, JsonFileStore, SqliteStore};

/// Selects the store backend.
pub const STORE_ENV: &str = "VYAPAR_STORE";
/// Overrides the data directory.
pub const DATA_DIR_ENV: &str = "VYAPAR_DATA_DIR";

/// Which persistence backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// SQLite database file (`inventory.db`).
    #[default]
    Sqlite,
    /// Pretty-printed JSON file (`inventory.json`).
    Json,
    /// Nothing written to disk.
    Memory,
}

impl StoreKind {
    pub fn file_name(&self) -> Option<&'static str> {
        match self {
            StoreKind::Sqlite => Some("inventory.db"),
            StoreKind::Json => Some("inventory.json"),
            StoreKind::Memory => None,
        }
    }
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreKind,
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// Resolve from CLI values and the process environment.
    pub fn resolve(store: Option<StoreKind>, data_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        Self::resolve_with(store, data_dir, |key| std::env::var(key).ok())
    }

    /// Resolve using `env` as the environment lookup.
    pub fn resolve_with(
        store: Option<StoreKind>,
        data_dir: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let store = match store {
            Some(kind) => kind,
            None => match env(STORE_ENV).filter(|v| !v.trim().is_empty()) {
                Some(raw) => StoreKind::from_str(raw.trim(), true)
                    .map_err(|e| anyhow::anyhow!("invalid {STORE_ENV} value '{raw}': {e}"))?,
                None => StoreKind::default(),
            },
        };

        let data_dir = match data_dir {
            Some(dir) => dir,
            None => match env(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
                Some(dir) => PathBuf::from(dir),
                None => default_data_dir()?,
            },
        };

        Ok(Self { store, data_dir })
    }

    /// Full path of the store file, if the backend uses one.
    pub fn store_path(&self) -> Option<PathBuf> {
        self.store.file_name().map(|name| self.data_dir.join(name))
    }

    /// Open the configured store, creating the data directory if needed.
    pub fn open_store(&self) -> anyhow::Result<Box<dyn InventoryStore>> {
        let Some(path) = self.store_path() else {
            return Ok(Box::new(InMemoryStore::new()));
        };

        std::fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("failed to create data directory at {:?}", self.data_dir))?;

        let store: Box<dyn InventoryStore> = match self.store {
            StoreKind::Sqlite => Box::new(
                SqliteStore::open(&path)
                    .with_context(|| format!("failed to open sqlite store at {path:?}"))?,
            ),
            StoreKind::Json => Box::new(JsonFileStore::new(path)),
            StoreKind::Memory => Box::new(InMemoryStore::new()),
        };
        Ok(store)
    }
}

/// `{app_data_dir}/vyapar`, falling back to `~/.local/share/vyapar`.
fn default_data_dir() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    Ok(base.join("vyapar"))
}
