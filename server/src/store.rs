//! Persistence for the `items` table.
//!
//! # Design
//! SQL text is only ever a compile-time constant wrapped in `Statement`;
//! names, descriptions and ids reach SQLite exclusively through `bind`.
//! Name filtering happens after the fetch with Unicode case folding, since
//! SQLite's `lower()` and `LIKE` only fold ASCII.
//! `update` and `delete` report how many rows they touched but treat zero as
//! success.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlx::{
    query::{Query, QueryAs},
    sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
    FromRow, Sqlite,
};

use crate::config::DatabaseConfig;
use crate::error::StoreError;

/// A row of the `items` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// SQL text known at compile time. There is no constructor taking a runtime
/// string, so user input cannot be spliced into a statement.
#[derive(Debug, Clone, Copy)]
struct Statement(&'static str);

impl Statement {
    fn query<'q>(self) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        sqlx::query(self.0)
    }

    fn query_as<'q, O>(self) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>>
    where
        O: for<'r> FromRow<'r, SqliteRow>,
    {
        sqlx::query_as(self.0)
    }
}

// AUTOINCREMENT keeps SQLite from handing out the id of a deleted row again.
const CREATE_ITEMS_TABLE: Statement = Statement(
    r#"
CREATE TABLE IF NOT EXISTS items (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    description TEXT NOT NULL
)
"#,
);

const SELECT_ALL: Statement =
    Statement("SELECT id, name, description FROM items ORDER BY id ASC");

const INSERT_ITEM: Statement = Statement(
    "INSERT INTO items (name, description) VALUES (?1, ?2) \
     RETURNING id, name, description",
);

const UPDATE_ITEM: Statement =
    Statement("UPDATE items SET name = ?1, description = ?2 WHERE id = ?3");

const DELETE_ITEM: Statement = Statement("DELETE FROM items WHERE id = ?1");

/// Handle to the item table. Cloning shares the underlying pool.
#[derive(Clone, Debug)]
pub struct ItemStore {
    pool: SqlitePool,
}

impl ItemStore {
    /// Open a bounded pool against `config.url`. The schema is not touched;
    /// call [`ItemStore::migrate`] afterwards.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// A migrated store backed by a private in-memory database.
    ///
    /// Every SQLite `:memory:` connection is its own database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        CREATE_ITEMS_TABLE.query().execute(&self.pool).await?;
        Ok(())
    }

    /// All items ordered by id, or only those whose name contains `filter`
    /// ignoring case. An empty filter is the same as none.
    pub async fn list(&self, filter: Option<&str>) -> Result<Vec<Item>, StoreError> {
        let items: Vec<Item> = SELECT_ALL.query_as().fetch_all(&self.pool).await?;
        let Some(needle) = filter.filter(|f| !f.is_empty()) else {
            return Ok(items);
        };
        let needle = needle.to_lowercase();
        Ok(items
            .into_iter()
            .filter(|item| item.name.to_lowercase().contains(&needle))
            .collect())
    }

    pub async fn insert(&self, name: &str, description: &str) -> Result<Item, StoreError> {
        let item = INSERT_ITEM
            .query_as::<Item>()
            .bind(name)
            .bind(description)
            .fetch_one(&self.pool)
            .await?;
        Ok(item)
    }

    /// Returns the number of rows changed; zero means `id` did not exist.
    pub async fn update(&self, id: i64, name: &str, description: &str) -> Result<u64, StoreError> {
        let result = UPDATE_ITEM
            .query()
            .bind(name)
            .bind(description)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Returns the number of rows removed; zero means `id` did not exist.
    pub async fn delete(&self, id: i64) -> Result<u64, StoreError> {
        let result = DELETE_ITEM.query().bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Wait for checked-out connections to return, then close them all.
    /// Later calls on any clone fail with a `StoreError`.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
