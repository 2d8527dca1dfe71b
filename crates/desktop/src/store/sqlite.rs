//! SQLite-backed store.
//!
//! The rest of the application is synchronous, so the store owns a small
//! current-thread tokio runtime and blocks on each `sqlx` call.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tokio::runtime::Runtime;

use vyapar_core::{ItemId, Money, Quantity};
use vyapar_inventory::{InventoryItem, ItemDetails, UnitOfMeasure};

use super::{InventoryStore, StoreError};

const CREATE_ITEMS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS items (
        position      INTEGER NOT NULL,
        id            TEXT    NOT NULL PRIMARY KEY,
        name          TEXT    NOT NULL,
        current_stock TEXT    NOT NULL,
        reorder_point TEXT    NOT NULL,
        unit_price    TEXT    NOT NULL,
        supplier      TEXT    NOT NULL DEFAULT '',
        unit          TEXT    NOT NULL,
        category      TEXT    NOT NULL DEFAULT ''
    )
"#;

/// SQLite store: one row per item, full replace on every save.
#[derive(Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
    location: String,
    runtime: Runtime,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        Self::connect(options, format!("sqlite:{}", path.display()), path.to_path_buf())
    }

    /// Private in-memory database (tests/dev).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        Self::connect(options, "sqlite::memory:".to_string(), PathBuf::from(":memory:"))
    }

    fn connect(
        options: SqliteConnectOptions,
        location: String,
        path: PathBuf,
    ) -> Result<Self, StoreError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StoreError::io(&path, e))?;

        // A single long-lived connection: one writer, and an in-memory
        // database lives exactly as long as its connection.
        let pool = runtime.block_on(async {
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?;

            sqlx::query(CREATE_ITEMS_TABLE).execute(&pool).await?;
            Ok::<_, sqlx::Error>(pool)
        })?;

        tracing::debug!(%location, "opened sqlite store");
        Ok(Self {
            pool,
            location,
            runtime,
        })
    }
}

impl InventoryStore for SqliteStore {
    fn load(&self) -> Result<Vec<InventoryItem>, StoreError> {
        let rows = self.runtime.block_on(async {
            sqlx::query(
                r#"
                SELECT id, name, current_stock, reorder_point, unit_price,
                       supplier, unit, category
                FROM items
                ORDER BY position
                "#,
            )
            .fetch_all(&self.pool)
            .await
        })?;

        let items = rows.iter().map(item_from_row).collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(location = %self.location, count = items.len(), "loaded items from sqlite store");
        Ok(items)
    }

    fn save(&self, items: &[InventoryItem]) -> Result<(), StoreError> {
        self.runtime.block_on(async {
            let mut tx = self.pool.begin().await?;

            sqlx::query("DELETE FROM items").execute(&mut *tx).await?;

            for (position, item) in items.iter().enumerate() {
                let details = item.details();
                sqlx::query(
                    r#"
                    INSERT INTO items (
                        position, id, name, current_stock, reorder_point,
                        unit_price, supplier, unit, category
                    )
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    "#,
                )
                .bind(position as i64)
                .bind(item.id_typed().to_string())
                .bind(&details.name)
                .bind(details.current_stock.value().to_string())
                .bind(details.reorder_point.value().to_string())
                .bind(details.unit_price.amount().to_string())
                .bind(&details.supplier)
                .bind(details.unit.as_str())
                .bind(&details.category)
                .execute(&mut *tx)
                .await?;
            }

            tx.commit().await?;
            Ok::<(), sqlx::Error>(())
        })?;

        tracing::debug!(location = %self.location, count = items.len(), "saved items to sqlite store");
        Ok(())
    }

    fn describe(&self) -> String {
        self.location.clone()
    }
}

fn item_from_row(row: &SqliteRow) -> Result<InventoryItem, StoreError> {
    let id: String = row.try_get("id")?;
    let id = ItemId::from_str(&id).map_err(|e| StoreError::Corrupt(e.to_string()))?;

    let details = ItemDetails {
        name: row.try_get("name")?,
        current_stock: parse_column::<Quantity>(row, "current_stock")?,
        reorder_point: parse_column::<Quantity>(row, "reorder_point")?,
        unit_price: parse_column::<Money>(row, "unit_price")?,
        supplier: row.try_get("supplier")?,
        unit: parse_column::<UnitOfMeasure>(row, "unit")?,
        category: row.try_get("category")?,
    };

    Ok(InventoryItem::from_parts(id, details))
}

fn parse_column<T>(row: &SqliteRow, column: &str) -> Result<T, StoreError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: String = row.try_get(column)?;
    raw.parse::<T>()
        .map_err(|e| StoreError::Corrupt(format!("column {column} = '{raw}': {e}")))
}
