use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::HistoryId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HistoryEntryError {
    #[error("history title cannot be empty")]
    EmptyTitle,

    #[error("history entry must cover at least one question")]
    NoQuestions,

    #[error("points ({points}) exceed questions ({questions})")]
    PointsExceedQuestions { points: u32, questions: u32 },

    #[error("too many questions for a history entry: {0}")]
    TooManyQuestions(usize),
}

/// Record of one finished quiz attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawHistoryEntry")]
pub struct HistoryEntry {
    id: HistoryId,
    title: String,
    level: u8,
    points: u32,
    questions: u32,
    finished_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawHistoryEntry {
    id: HistoryId,
    title: String,
    level: u8,
    points: u32,
    questions: u32,
    finished_at: DateTime<Utc>,
}

impl TryFrom<RawHistoryEntry> for HistoryEntry {
    type Error = HistoryEntryError;

    fn try_from(raw: RawHistoryEntry) -> Result<Self, Self::Error> {
        Self::new(
            raw.id,
            raw.title,
            raw.level,
            raw.points,
            raw.questions,
            raw.finished_at,
        )
    }
}

impl HistoryEntry {
    /// # Errors
    ///
    /// Returns `HistoryEntryError` when the title is blank, `questions` is zero,
    /// or `points` exceeds `questions`.
    pub fn new(
        id: HistoryId,
        title: impl Into<String>,
        level: u8,
        points: u32,
        questions: u32,
        finished_at: DateTime<Utc>,
    ) -> Result<Self, HistoryEntryError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(HistoryEntryError::EmptyTitle);
        }
        if questions == 0 {
            return Err(HistoryEntryError::NoQuestions);
        }
        if points > questions {
            return Err(HistoryEntryError::PointsExceedQuestions { points, questions });
        }
        Ok(Self {
            id,
            title,
            level,
            points,
            questions,
            finished_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> HistoryId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn level(&self) -> u8 {
        self.level
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn questions(&self) -> u32 {
        self.questions
    }

    #[must_use]
    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    /// Share of correct answers in `0.0..=1.0`.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        f64::from(self.points) / f64::from(self.questions)
    }
}
