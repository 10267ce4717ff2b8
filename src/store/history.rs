//! History store: append-only activity log with bulk clear.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::HISTORY_KEY;
use crate::db::KvStore;
use crate::errors::AppError;
use crate::models::{ActivityType, HistoryEntry};

#[derive(Clone)]
pub struct HistoryStore {
    kv: Arc<dyn KvStore>,
    /// Serializes the read-modify-write of an append
    write_lock: Arc<Mutex<()>>,
}

impl HistoryStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            kv,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Put an entry at the front of the stored history.
    pub async fn save_to_history(&self, entry: HistoryEntry) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.load_entries().await?;
        tracing::debug!(
            "Recording {} activity {} ({} stored)",
            entry.activity_type,
            entry.id,
            entries.len()
        );
        entries.insert(0, entry);

        let json = serde_json::to_string(&entries)?;
        self.kv.set(HISTORY_KEY, &json).await
    }

    /// All entries, newest first. Empty when nothing is stored or the stored value is unreadable.
    pub async fn get_history(&self) -> Vec<HistoryEntry> {
        self.load_entries().await.unwrap_or_else(|e| {
            tracing::warn!("History unavailable, treating as empty: {}", e);
            Vec::new()
        })
    }

    /// Stored entries for a write. Backend failures propagate; only an unparseable value
    /// reads as empty, so an append can never overwrite history it failed to load.
    async fn load_entries(&self) -> Result<Vec<HistoryEntry>, AppError> {
        let Some(raw) = self.kv.get(HISTORY_KEY).await? else {
            return Ok(Vec::new());
        };

        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("Stored history is corrupt, treating as empty: {}", e);
            Vec::new()
        }))
    }

    /// Entries of one activity type, newest first.
    pub async fn get_history_by_type(&self, activity_type: ActivityType) -> Vec<HistoryEntry> {
        self.get_history()
            .await
            .into_iter()
            .filter(|entry| entry.activity_type == activity_type)
            .collect()
    }

    /// Delete every entry.
    pub async fn clear_history(&self) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        self.kv.remove(HISTORY_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryKvStore;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Memory store whose next `get` fails once when armed.
    #[derive(Default)]
    struct FlakyKvStore {
        inner: MemoryKvStore,
        fail_next_get: AtomicBool,
    }

    #[async_trait]
    impl KvStore for FlakyKvStore {
        async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
            if self.fail_next_get.swap(false, Ordering::SeqCst) {
                return Err(AppError::Storage("database is locked".to_string()));
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), AppError> {
            self.inner.remove(key).await
        }

        async fn clear(&self) -> Result<(), AppError> {
            self.inner.clear().await
        }
    }

    fn entry(query: &str, activity_type: ActivityType) -> HistoryEntry {
        HistoryEntry::new(activity_type, query, query, json!({ "q": query }))
    }

    #[tokio::test]
    async fn test_newest_first_and_length() {
        let store = HistoryStore::new(Arc::new(MemoryKvStore::new()));
        for query in ["one", "two", "three"] {
            store
                .save_to_history(entry(query, ActivityType::Market))
                .await
                .unwrap();
        }

        let queries: Vec<_> = store
            .get_history()
            .await
            .into_iter()
            .map(|e| e.query)
            .collect();
        assert_eq!(queries, vec!["three", "two", "one"]);
    }

    #[tokio::test]
    async fn test_no_dedup() {
        let store = HistoryStore::new(Arc::new(MemoryKvStore::new()));
        let e = entry("same", ActivityType::Chat);
        store.save_to_history(e.clone()).await.unwrap();
        store.save_to_history(e).await.unwrap();

        assert_eq!(store.get_history().await.len(), 2);
    }

    #[tokio::test]
    async fn test_clear_then_get_is_empty() {
        let store = HistoryStore::new(Arc::new(MemoryKvStore::new()));
        store
            .save_to_history(entry("x", ActivityType::Diagnosis))
            .await
            .unwrap();
        store.clear_history().await.unwrap();
        assert!(store.get_history().await.is_empty());

        store.clear_history().await.unwrap();
        assert!(store.get_history().await.is_empty());

        store
            .save_to_history(entry("y", ActivityType::Diagnosis))
            .await
            .unwrap();
        assert_eq!(store.get_history().await.len(), 1);
    }

    #[tokio::test]
    async fn test_filter_by_type() {
        let store = HistoryStore::new(Arc::new(MemoryKvStore::new()));
        store
            .save_to_history(entry("a", ActivityType::Diagnosis))
            .await
            .unwrap();
        store
            .save_to_history(entry("b", ActivityType::Schemes))
            .await
            .unwrap();
        store
            .save_to_history(entry("c", ActivityType::Diagnosis))
            .await
            .unwrap();

        let queries: Vec<_> = store
            .get_history_by_type(ActivityType::Diagnosis)
            .await
            .into_iter()
            .map(|e| e.query)
            .collect();
        assert_eq!(queries, vec!["c", "a"]);
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_not_lost() {
        let store = HistoryStore::new(Arc::new(MemoryKvStore::new()));
        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .save_to_history(entry(&i.to_string(), ActivityType::Chat))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.get_history().await.len(), 20);
    }

    #[tokio::test]
    async fn test_corrupt_history_reads_as_empty_and_is_replaced() {
        let kv = Arc::new(MemoryKvStore::new());
        kv.set(HISTORY_KEY, "[{\"broken\":").await.unwrap();

        let store = HistoryStore::new(kv);
        assert!(store.get_history().await.is_empty());

        store
            .save_to_history(entry("fresh", ActivityType::Chat))
            .await
            .unwrap();
        assert_eq!(store.get_history().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_read_aborts_append_and_keeps_history() {
        let kv = Arc::new(FlakyKvStore::default());
        let store = HistoryStore::new(kv.clone());
        for query in ["a", "b", "c"] {
            store
                .save_to_history(entry(query, ActivityType::Market))
                .await
                .unwrap();
        }

        kv.fail_next_get.store(true, Ordering::SeqCst);
        let err = store
            .save_to_history(entry("d", ActivityType::Market))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(store.get_history().await.len(), 3);

        store
            .save_to_history(entry("d", ActivityType::Market))
            .await
            .unwrap();
        assert_eq!(store.get_history().await.len(), 4);
    }

    #[tokio::test]
    async fn test_failed_read_is_empty_for_readers() {
        let kv = Arc::new(FlakyKvStore::default());
        let store = HistoryStore::new(kv.clone());
        store
            .save_to_history(entry("a", ActivityType::Chat))
            .await
            .unwrap();

        kv.fail_next_get.store(true, Ordering::SeqCst);
        assert!(store.get_history().await.is_empty());
        assert_eq!(store.get_history().await.len(), 1);
    }
}
