//! String-keyed record storage.
//!
//! Every operation is a single statement, so reads and writes are atomic from the caller's side.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::errors::AppError;

/// Durable string-keyed, string-valued storage.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Remove a single key. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), AppError>;

    /// Remove every key.
    async fn clear(&self) -> Result<(), AppError>;
}

/// SQLite-backed store.
#[derive(Clone)]
pub struct SqliteKvStore {
    pool: SqlitePool,
}

impl SqliteKvStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO kv (key, value, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM kv WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM kv").execute(&self.pool).await?;
        tracing::debug!("Cleared {} stored records", result.rows_affected());
        Ok(())
    }
}

/// In-memory store for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> AppError {
        AppError::Storage("In-memory store lock poisoned".to_string())
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), AppError> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_database, schema_version, SCHEMA_VERSION};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_sqlite_set_get_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("kv.sqlite"))
            .await
            .unwrap();
        let store = SqliteKvStore::new(pool.clone());

        assert_eq!(store.get("kisan_profile").await.unwrap(), None);

        store.set("kisan_profile", "{\"a\":1}").await.unwrap();
        store.set("kisan_profile", "{\"a\":2}").await.unwrap();
        assert_eq!(
            store.get("kisan_profile").await.unwrap().as_deref(),
            Some("{\"a\":2}")
        );

        assert_eq!(schema_version(&pool).await.unwrap(), SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_sqlite_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("kv.sqlite");

        {
            let store = SqliteKvStore::new(init_database(&db_path).await.unwrap());
            store.set("kisan_history", "[]").await.unwrap();
        }

        let reopened = SqliteKvStore::new(init_database(&db_path).await.unwrap());
        assert_eq!(
            reopened.get("kisan_history").await.unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn test_sqlite_remove_and_clear() {
        let temp_dir = TempDir::new().unwrap();
        let store =
            SqliteKvStore::new(init_database(&temp_dir.path().join("kv.sqlite")).await.unwrap());

        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();
        store.remove("a").await.unwrap();
        store.remove("missing").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
        assert_eq!(store.get("b").await.unwrap().as_deref(), Some("2"));

        store.clear().await.unwrap();
        assert_eq!(store.get("b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_contract() {
        let store = MemoryKvStore::new();
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        store.clear().await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
