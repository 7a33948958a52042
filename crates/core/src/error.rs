use thiserror::Error;

use crate::model::{CatalogError, HistoryEntryError, QuizError, TransitionError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    History(#[from] HistoryEntryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuizId;

    #[test]
    fn wraps_layer_errors_transparently() {
        let err: Error = CatalogError::DuplicateId(QuizId::new(3)).into();
        assert!(matches!(err, Error::Catalog(_)));
        assert_eq!(err.to_string(), "quiz id 3 appears more than once in the catalog");

        let err: Error = TransitionError::NotFinished.into();
        assert_eq!(err.to_string(), "session has not finished");
    }
}
