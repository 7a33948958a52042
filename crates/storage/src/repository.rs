use async_trait::async_trait;
use quiz_core::model::{HistoryEntry, HistoryId};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the quiz history list.
///
/// Entries keep insertion order. Writes come from a single UI-driven caller.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// All entries, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn list_entries(&self) -> Result<Vec<HistoryEntry>, StorageError>;

    /// Fetch one entry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no entry has this id.
    async fn get_entry(&self, id: HistoryId) -> Result<HistoryEntry, StorageError>;

    /// Append an entry at the end of the list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the id is already taken.
    async fn append_entry(&self, entry: &HistoryEntry) -> Result<(), StorageError>;

    /// Delete an entry. Returns whether something was removed; unknown ids
    /// leave the list untouched.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn remove_entry(&self, id: HistoryId) -> Result<bool, StorageError>;

    /// Highest id stored so far, used to keep generated ids increasing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn latest_id(&self) -> Result<Option<HistoryId>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    history: Arc<Mutex<Vec<HistoryEntry>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryRepository for InMemoryRepository {
    async fn list_entries(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        let guard = self
            .history
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn get_entry(&self, id: HistoryId) -> Result<HistoryEntry, StorageError> {
        let guard = self
            .history
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .iter()
            .find(|e| e.id() == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn append_entry(&self, entry: &HistoryEntry) -> Result<(), StorageError> {
        let mut guard = self
            .history
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.iter().any(|e| e.id() == entry.id()) {
            return Err(StorageError::Conflict);
        }
        guard.push(entry.clone());
        Ok(())
    }

    async fn remove_entry(&self, id: HistoryId) -> Result<bool, StorageError> {
        let mut guard = self
            .history
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let before = guard.len();
        guard.retain(|e| e.id() != id);
        Ok(guard.len() != before)
    }

    async fn latest_id(&self) -> Result<Option<HistoryId>, StorageError> {
        let guard = self
            .history
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.iter().map(HistoryEntry::id).max())
    }
}

/// Repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub history: Arc<dyn HistoryRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            history: Arc::new(InMemoryRepository::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    fn entry(id: u64, points: u32) -> HistoryEntry {
        HistoryEntry::new(HistoryId::new(id), format!("Quiz {id}"), 1, points, 5, fixed_now())
            .unwrap()
    }

    #[tokio::test]
    async fn keeps_insertion_order() {
        let repo = InMemoryRepository::new();
        repo.append_entry(&entry(30, 1)).await.unwrap();
        repo.append_entry(&entry(10, 2)).await.unwrap();
        repo.append_entry(&entry(20, 3)).await.unwrap();

        let ids: Vec<_> = repo
            .list_entries()
            .await
            .unwrap()
            .iter()
            .map(|e| e.id().value())
            .collect();
        assert_eq!(ids, vec![30, 10, 20]);
        assert_eq!(repo.latest_id().await.unwrap(), Some(HistoryId::new(30)));
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let repo = InMemoryRepository::new();
        repo.append_entry(&entry(1, 1)).await.unwrap();
        repo.append_entry(&entry(2, 1)).await.unwrap();

        assert!(repo.remove_entry(HistoryId::new(1)).await.unwrap());
        assert!(!repo.remove_entry(HistoryId::new(1)).await.unwrap());
        assert!(!repo.remove_entry(HistoryId::new(42)).await.unwrap());

        let remaining = repo.list_entries().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id(), HistoryId::new(2));
    }

    #[tokio::test]
    async fn duplicate_id_conflicts() {
        let repo = InMemoryRepository::new();
        repo.append_entry(&entry(1, 1)).await.unwrap();
        let err = repo.append_entry(&entry(1, 4)).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
        assert!(matches!(
            repo.get_entry(HistoryId::new(7)).await.unwrap_err(),
            StorageError::NotFound
        ));
    }
}
