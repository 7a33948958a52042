use chrono::{DateTime, Utc};
use quiz_core::model::{HistoryEntry, HistoryId};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn history_id_to_i64(id: HistoryId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("history id overflow".into()))
}

pub(crate) fn history_id_from_i64(v: i64) -> Result<HistoryId, StorageError> {
    u64::try_from(v)
        .map(HistoryId::new)
        .map_err(|_| StorageError::Serialization(format!("negative history id: {v}")))
}

pub(crate) fn map_history_row(row: &sqlx::sqlite::SqliteRow) -> Result<HistoryEntry, StorageError> {
    let id = history_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
    let title: String = row.try_get("title").map_err(ser)?;
    let level = row.try_get::<i64, _>("level").map_err(ser)?;
    let level = u8::try_from(level)
        .map_err(|_| StorageError::Serialization(format!("invalid level: {level}")))?;
    let points = u32_from_i64("points", row.try_get::<i64, _>("points").map_err(ser)?)?;
    let questions = u32_from_i64("questions", row.try_get::<i64, _>("questions").map_err(ser)?)?;
    let finished_at: DateTime<Utc> = row.try_get("finished_at").map_err(ser)?;

    HistoryEntry::new(id, title, level, points, questions, finished_at).map_err(ser)
}

pub(crate) fn map_write_error(e: &sqlx::Error) -> StorageError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => StorageError::Conflict,
        _ => StorageError::Connection(e.to_string()),
    }
}
