//! History Store: append-only list of session outcomes in one storage slot.

use std::sync::Arc;

use tracing::warn;

use quiz_core::model::{HistoryEntry, HistoryLog};
use storage::repository::{KeyValueStore, StorageError};

/// Default storage slot for the history list.
pub const DEFAULT_HISTORY_KEY: &str = "quizHistory";

#[derive(Clone)]
pub struct HistoryStore {
    slots: Arc<dyn KeyValueStore>,
    key: String,
}

impl HistoryStore {
    #[must_use]
    pub fn new(slots: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            slots,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Append `entry` and write the whole list back.
    ///
    /// An unparsable slot is replaced by a list holding just `entry`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the slot cannot be read or written.
    pub async fn append(&self, entry: HistoryEntry) -> Result<(), StorageError> {
        let raw = self.slots.get(&self.key).await?;
        let mut log = self.parse(raw.as_deref());
        log.push(entry);
        let encoded =
            serde_json::to_string(&log).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.slots.set(&self.key, &encoded).await
    }

    /// The full ordered history. Absent, unreadable or corrupt storage reads as empty.
    pub async fn read_all(&self) -> HistoryLog {
        match self.slots.get(&self.key).await {
            Ok(raw) => self.parse(raw.as_deref()),
            Err(err) => {
                warn!(key = %self.key, error = %err, "history unreadable, showing none");
                HistoryLog::new()
            }
        }
    }

    fn parse(&self, raw: Option<&str>) -> HistoryLog {
        let Some(raw) = raw else {
            return HistoryLog::new();
        };
        serde_json::from_str(raw).unwrap_or_else(|err| {
            warn!(key = %self.key, error = %err, "history corrupt, treating as empty");
            HistoryLog::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use storage::repository::InMemoryStore;

    fn entry(correct: u32) -> HistoryEntry {
        HistoryEntry {
            correct_count: correct,
            wrong_count: 1,
            tab_open_seconds: 30,
            tab_switch_count: 0,
            completed_at: None,
        }
    }

    #[tokio::test]
    async fn append_grows_by_one_and_keeps_order() {
        let store = HistoryStore::new(Arc::new(InMemoryStore::new()), DEFAULT_HISTORY_KEY);
        assert!(store.read_all().await.is_empty());

        for n in 0..3 {
            let before = store.read_all().await.len();
            store.append(entry(n)).await.unwrap();
            let after = store.read_all().await;
            assert_eq!(after.len(), before + 1);
            assert_eq!(after.last(), Some(&entry(n)));
        }
        let all = store.read_all().await;
        let corrects: Vec<_> = all.iter().map(|e| e.correct_count).collect();
        assert_eq!(corrects, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn corrupt_slot_reads_as_empty_and_is_replaced_on_append() {
        let slots = Arc::new(InMemoryStore::new());
        slots.set(DEFAULT_HISTORY_KEY, "{not json").await.unwrap();
        let store = HistoryStore::new(slots, DEFAULT_HISTORY_KEY);

        assert!(store.read_all().await.is_empty());
        store.append(entry(4)).await.unwrap();
        assert_eq!(store.read_all().await, vec![entry(4)]);
    }

    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("offline".into()))
        }
    }

    #[tokio::test]
    async fn unreachable_storage_reads_empty_but_append_fails() {
        let store = HistoryStore::new(Arc::new(BrokenStore), DEFAULT_HISTORY_KEY);
        assert!(store.read_all().await.is_empty());
        assert!(store.append(entry(1)).await.is_err());
    }
}
