use quiz_core::model::{HistoryEntry, HistoryId};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{history_id_from_i64, history_id_to_i64, map_history_row, map_write_error, ser};
use crate::repository::{HistoryRepository, StorageError};

#[async_trait::async_trait]
impl HistoryRepository for SqliteRepository {
    async fn list_entries(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, title, level, points, questions, finished_at
                FROM quiz_history
                ORDER BY seq ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_history_row(&row)?);
        }
        Ok(out)
    }

    async fn get_entry(&self, id: HistoryId) -> Result<HistoryEntry, StorageError> {
        let row = sqlx::query(
            r"
                SELECT id, title, level, points, questions, finished_at
                FROM quiz_history
                WHERE id = ?1
            ",
        )
        .bind(history_id_to_i64(id)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .ok_or(StorageError::NotFound)?;

        map_history_row(&row)
    }

    async fn append_entry(&self, entry: &HistoryEntry) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO quiz_history (id, title, level, points, questions, finished_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(history_id_to_i64(entry.id())?)
        .bind(entry.title())
        .bind(i64::from(entry.level()))
        .bind(i64::from(entry.points()))
        .bind(i64::from(entry.questions()))
        .bind(entry.finished_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(&e))?;

        tracing::debug!(id = %entry.id(), "history entry stored");
        Ok(())
    }

    async fn remove_entry(&self, id: HistoryId) -> Result<bool, StorageError> {
        let res = sqlx::query("DELETE FROM quiz_history WHERE id = ?1")
            .bind(history_id_to_i64(id)?)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(res.rows_affected() > 0)
    }

    async fn latest_id(&self) -> Result<Option<HistoryId>, StorageError> {
        let row = sqlx::query("SELECT MAX(id) AS latest FROM quiz_history")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        row.try_get::<Option<i64>, _>("latest")
            .map_err(ser)?
            .map(history_id_from_i64)
            .transpose()
    }
}
