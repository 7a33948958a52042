use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use quiz_core::model::{HistoryEntry, HistoryId, QuizSession};
use storage::repository::{HistoryRepository, InMemoryRepository};

use crate::Clock;
use crate::error::HistoryServiceError;

/// Presentation-agnostic list item for the history screen.
///
/// Carries raw values only; the UI formats dates and scores itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryListItem {
    pub id: HistoryId,
    pub title: String,
    pub level: u8,
    pub points: u32,
    pub questions: u32,
    pub finished_at: DateTime<Utc>,
}

impl HistoryListItem {
    #[must_use]
    pub fn from_entry(entry: &HistoryEntry) -> Self {
        Self {
            id: entry.id(),
            title: entry.title().to_owned(),
            level: entry.level(),
            points: entry.points(),
            questions: entry.questions(),
            finished_at: entry.finished_at(),
        }
    }
}

/// Facade over the history repository that owns id generation.
#[derive(Clone)]
pub struct HistoryService {
    clock: Clock,
    history: Arc<dyn HistoryRepository>,
}

impl HistoryService {
    #[must_use]
    pub fn new(clock: Clock, history: Arc<dyn HistoryRepository>) -> Self {
        Self { clock, history }
    }

    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(clock, Arc::new(InMemoryRepository::new()))
    }

    /// All entries in the order they were recorded.
    ///
    /// # Errors
    ///
    /// Returns `HistoryServiceError::Storage` on repository failures.
    pub async fn list(&self) -> Result<Vec<HistoryListItem>, HistoryServiceError> {
        let entries = self.history.list_entries().await?;
        Ok(entries.iter().map(HistoryListItem::from_entry).collect())
    }

    /// # Errors
    ///
    /// Returns `HistoryServiceError::Storage`, including `NotFound` for unknown ids.
    pub async fn get(&self, id: HistoryId) -> Result<HistoryEntry, HistoryServiceError> {
        Ok(self.history.get_entry(id).await?)
    }

    /// Append the record of a finished session and return its id.
    ///
    /// A session is written once; later calls return the id it was stored under.
    ///
    /// # Errors
    ///
    /// Returns `HistoryServiceError::Transition` if the session has not
    /// finished, or `HistoryServiceError::Storage` if the write fails.
    pub async fn record(
        &self,
        session: &mut QuizSession,
    ) -> Result<HistoryId, HistoryServiceError> {
        if let Some(id) = session.recorded() {
            tracing::debug!(id = %id, "session already in history");
            return Ok(id);
        }
        let previous = self.history.latest_id().await?;
        let id = HistoryId::from_timestamp(self.clock.now(), previous);
        let entry = session.history_entry(id)?;
        self.history.append_entry(&entry).await?;
        session.mark_recorded(id)?;
        tracing::info!(
            id = %id,
            quiz = %session.quiz().id(),
            points = entry.points(),
            questions = entry.questions(),
            "recorded quiz history"
        );
        Ok(id)
    }

    /// Delete an entry. Unknown ids are not an error.
    ///
    /// # Errors
    ///
    /// Returns `HistoryServiceError::Storage` on repository failures.
    pub async fn remove(&self, id: HistoryId) -> Result<bool, HistoryServiceError> {
        let removed = self.history.remove_entry(id).await?;
        if removed {
            tracing::info!(id = %id, "removed history entry");
        } else {
            tracing::debug!(id = %id, "history entry already absent");
        }
        Ok(removed)
    }
}
