use std::collections::HashSet;

use thiserror::Error;

use crate::model::{Quiz, QuizId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("quiz id {0} appears more than once in the catalog")]
    DuplicateId(QuizId),
}

/// The fixed set of quizzes a player can pick from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizCatalog {
    quizzes: Vec<Quiz>,
}

impl QuizCatalog {
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two quizzes share an id.
    pub fn new(quizzes: Vec<Quiz>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(quizzes.len());
        for quiz in &quizzes {
            if !seen.insert(quiz.id()) {
                return Err(CatalogError::DuplicateId(quiz.id()));
            }
        }
        Ok(Self { quizzes })
    }

    #[must_use]
    pub fn resolve(&self, id: QuizId) -> Option<&Quiz> {
        self.quizzes.iter().find(|q| q.id() == id)
    }

    #[must_use]
    pub fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    /// Quizzes at the given level, in catalog order.
    pub fn by_level(&self, level: u8) -> impl Iterator<Item = &Quiz> {
        self.quizzes.iter().filter(move |q| q.level() == level)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;

    fn quiz(id: u64, level: u8) -> Quiz {
        let q = Question::new(0, "Q", vec!["a".into(), "b".into()], 1).unwrap();
        Quiz::new(QuizId::new(id), format!("Quiz {id}"), level, vec![q]).unwrap()
    }

    #[test]
    fn resolves_by_id() {
        let catalog = QuizCatalog::new(vec![quiz(1, 1), quiz(2, 3)]).unwrap();
        assert_eq!(catalog.resolve(QuizId::new(2)).unwrap().level(), 3);
        assert!(catalog.resolve(QuizId::new(9)).is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = QuizCatalog::new(vec![quiz(1, 1), quiz(1, 2)]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateId(QuizId::new(1)));
    }

    #[test]
    fn filters_by_level() {
        let catalog = QuizCatalog::new(vec![quiz(1, 1), quiz(2, 3), quiz(3, 1)]).unwrap();
        let ids: Vec<_> = catalog.by_level(1).map(Quiz::id).collect();
        assert_eq!(ids, vec![QuizId::new(1), QuizId::new(3)]);
    }
}
