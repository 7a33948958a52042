use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::QuizId;

/// Highest difficulty level a quiz can carry.
pub const MAX_LEVEL: u8 = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("quiz level must be between 1 and {MAX_LEVEL}, got {0}")]
    InvalidLevel(u8),

    #[error("quiz has no questions")]
    NoQuestions,

    #[error("question {question} has an empty title")]
    EmptyQuestion { question: usize },

    #[error("question {question} needs at least two alternatives, got {len}")]
    TooFewAlternatives { question: usize, len: usize },

    #[error("question {question} marks alternative {correct} as correct but has {len}")]
    CorrectOutOfRange {
        question: usize,
        correct: usize,
        len: usize,
    },
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    title: String,
    alternatives: Vec<String>,
    correct: usize,
}

impl Question {
    /// Build a question, checking that `correct` points at one of the alternatives.
    ///
    /// `position` is only used to label errors.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the title is blank, fewer than two alternatives
    /// are given, or `correct` is out of range.
    pub fn new(
        position: usize,
        title: impl Into<String>,
        alternatives: Vec<String>,
        correct: usize,
    ) -> Result<Self, QuizError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(QuizError::EmptyQuestion { question: position });
        }
        if alternatives.len() < 2 {
            return Err(QuizError::TooFewAlternatives {
                question: position,
                len: alternatives.len(),
            });
        }
        if correct >= alternatives.len() {
            return Err(QuizError::CorrectOutOfRange {
                question: position,
                correct,
                len: alternatives.len(),
            });
        }
        Ok(Self {
            title,
            alternatives,
            correct,
        })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn alternatives(&self) -> &[String] {
        &self.alternatives
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn is_correct(&self, alternative: usize) -> bool {
        self.correct == alternative
    }
}

/// Immutable catalog entry: a titled, levelled sequence of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quiz {
    id: QuizId,
    title: String,
    level: u8,
    questions: Vec<Question>,
}

impl Quiz {
    /// # Errors
    ///
    /// Returns `QuizError` for a blank title, a level outside `1..=MAX_LEVEL`,
    /// or an empty question list.
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        level: u8,
        questions: Vec<Question>,
    ) -> Result<Self, QuizError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(QuizError::EmptyTitle);
        }
        if !(1..=MAX_LEVEL).contains(&level) {
            return Err(QuizError::InvalidLevel(level));
        }
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        Ok(Self {
            id,
            title,
            level,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
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
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Returns a copy with the questions reordered by `order`.
    ///
    /// `order` must be a permutation of `0..question_count()`; anything else
    /// returns the quiz unchanged.
    #[must_use]
    pub fn reordered(&self, order: &[usize]) -> Self {
        let mut seen = vec![false; self.questions.len()];
        let valid = order.len() == self.questions.len()
            && order.iter().all(|&i| {
                i < seen.len() && !std::mem::replace(&mut seen[i], true)
            });
        if !valid {
            return self.clone();
        }
        Self {
            questions: order.iter().map(|&i| self.questions[i].clone()).collect(),
            ..self.clone()
        }
    }
}

/// Unvalidated question as it appears in a catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestionDraft {
    pub title: String,
    pub alternatives: Vec<String>,
    pub correct: usize,
}

/// Unvalidated quiz as it appears in a catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuizDraft {
    pub id: QuizId,
    pub title: String,
    pub level: u8,
    pub questions: Vec<QuestionDraft>,
}

impl QuizDraft {
    /// # Errors
    ///
    /// Returns the first `QuizError` found in the quiz or its questions.
    pub fn validate(self) -> Result<Quiz, QuizError> {
        let questions = self
            .questions
            .into_iter()
            .enumerate()
            .map(|(i, q)| Question::new(i, q.title, q.alternatives, q.correct))
            .collect::<Result<Vec<_>, _>>()?;
        Quiz::new(self.id, self.title, self.level, questions)
    }
}
