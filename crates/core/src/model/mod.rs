mod catalog;
mod history;
mod ids;
mod quiz;
mod session;

pub use ids::{HistoryId, ParseIdError, QuizId};

pub use catalog::{CatalogError, QuizCatalog};
pub use history::{HistoryEntry, HistoryEntryError};
pub use quiz::{MAX_LEVEL, Question, QuestionDraft, Quiz, QuizDraft, QuizError};
pub use session::{Feedback, Phase, Prompt, QuizSession, Step, Transition, TransitionError};
