use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

use crate::model::{HistoryEntry, HistoryEntryError, HistoryId, Question, Quiz};
use crate::motion::SKIP_DRAG_THRESHOLD;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransitionError {
    #[error("cannot {action} while {phase}")]
    InvalidPhase { action: &'static str, phase: Phase },

    #[error("alternative {index} is out of range ({len} alternatives)")]
    AlternativeOutOfRange { index: usize, len: usize },

    #[error("session has not finished")]
    NotFinished,

    #[error(transparent)]
    History(#[from] HistoryEntryError),
}

/// Transient signal driving the overlay colour; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Feedback {
    #[default]
    Neutral,
    Correct,
    Wrong,
}

/// Question the host must put to the player before the session moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Skip,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Answering,
    Prompting(Prompt),
    /// Wrong answer given; waiting for the shake to complete.
    Retrying,
    Finished,
    Stopped,
}

impl Phase {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Finished | Phase::Stopped)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Answering => f.write_str("answering"),
            Phase::Prompting(Prompt::Skip) => f.write_str("confirming skip"),
            Phase::Prompting(Prompt::Stop) => f.write_str("confirming stop"),
            Phase::Retrying => f.write_str("showing wrong-answer feedback"),
            Phase::Finished => f.write_str("finished"),
            Phase::Stopped => f.write_str("stopped"),
        }
    }
}

/// Where the session landed after an advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Question(usize),
    Finished,
}

/// What a session operation did, for the host to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Selected(usize),
    Prompted(Prompt),
    /// Prompt declined; back to answering the same question.
    Resumed,
    Correct(Step),
    /// Wrong answer; the advance waits for [`QuizSession::finish_feedback`].
    Wrong,
    /// Moved on without scoring (skip, or after wrong-answer feedback).
    Advanced(Step),
    Stopped,
    /// Nothing changed.
    Ignored,
}

/// Progression state for one play-through of a quiz.
#[derive(Clone, PartialEq, Eq)]
pub struct QuizSession {
    quiz: Quiz,
    current: usize,
    points: u32,
    answered: u32,
    selected: Option<usize>,
    feedback: Feedback,
    phase: Phase,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    recorded: Option<HistoryId>,
}

impl QuizSession {
    #[must_use]
    pub fn new(quiz: Quiz, started_at: DateTime<Utc>) -> Self {
        Self {
            quiz,
            current: 0,
            points: 0,
            answered: 0,
            selected: None,
            feedback: Feedback::Neutral,
            phase: Phase::Answering,
            started_at,
            finished_at: None,
            recorded: None,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.phase.is_terminal() {
            return None;
        }
        self.quiz.question(self.current)
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    /// Questions left behind so far, scored or not.
    #[must_use]
    pub fn answered(&self) -> u32 {
        self.answered
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.quiz.question_count()
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Id of the history entry written for this session, once there is one.
    #[must_use]
    pub fn recorded(&self) -> Option<HistoryId> {
        self.recorded
    }

    /// Remember that the finished session was stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::NotFinished` before the last question is done.
    pub fn mark_recorded(&mut self, id: HistoryId) -> Result<(), TransitionError> {
        if !self.is_finished() {
            return Err(TransitionError::NotFinished);
        }
        self.recorded = Some(id);
        Ok(())
    }

    /// Record the player's tentative choice.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::InvalidPhase` outside `Answering` and
    /// `TransitionError::AlternativeOutOfRange` for a bad index.
    pub fn select_alternative(&mut self, index: usize) -> Result<Transition, TransitionError> {
        self.require_answering("select an alternative")?;
        let len = self
            .quiz
            .question(self.current)
            .map_or(0, |q| q.alternatives().len());
        if index >= len {
            return Err(TransitionError::AlternativeOutOfRange { index, len });
        }
        self.selected = Some(index);
        Ok(Transition::Selected(index))
    }

    /// Confirm the selected alternative, or ask to skip when nothing is selected.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::InvalidPhase` outside `Answering`.
    pub fn confirm(&mut self, at: DateTime<Utc>) -> Result<Transition, TransitionError> {
        self.require_answering("confirm")?;
        let Some(choice) = self.selected.take() else {
            self.phase = Phase::Prompting(Prompt::Skip);
            return Ok(Transition::Prompted(Prompt::Skip));
        };

        let correct = self
            .quiz
            .question(self.current)
            .is_some_and(|q| q.is_correct(choice));
        if correct {
            self.points += 1;
            self.feedback = Feedback::Correct;
            Ok(Transition::Correct(self.advance(at)))
        } else {
            self.feedback = Feedback::Wrong;
            self.phase = Phase::Retrying;
            Ok(Transition::Wrong)
        }
    }

    /// Called when the wrong-answer animation has completed.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::InvalidPhase` unless the session is `Retrying`.
    pub fn finish_feedback(&mut self, at: DateTime<Utc>) -> Result<Transition, TransitionError> {
        if self.phase != Phase::Retrying {
            return Err(self.invalid("finish feedback"));
        }
        Ok(Transition::Advanced(self.advance(at)))
    }

    /// Ask to leave the quiz without recording history.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::InvalidPhase` outside `Answering`.
    pub fn stop(&mut self) -> Result<Transition, TransitionError> {
        self.require_answering("stop")?;
        self.phase = Phase::Prompting(Prompt::Stop);
        Ok(Transition::Prompted(Prompt::Stop))
    }

    /// Apply the player's answer to the open prompt.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::InvalidPhase` when no prompt is open.
    pub fn resolve_prompt(
        &mut self,
        accepted: bool,
        at: DateTime<Utc>,
    ) -> Result<Transition, TransitionError> {
        let Phase::Prompting(prompt) = self.phase else {
            return Err(self.invalid("resolve a prompt"));
        };
        if !accepted {
            self.phase = Phase::Answering;
            return Ok(Transition::Resumed);
        }
        match prompt {
            Prompt::Skip => Ok(Transition::Advanced(self.advance(at))),
            Prompt::Stop => {
                self.selected = None;
                self.phase = Phase::Stopped;
                Ok(Transition::Stopped)
            }
        }
    }

    /// Handle the end of a card drag. Dragging left past the skip threshold
    /// opens the skip prompt; shorter drags change nothing.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::InvalidPhase` outside `Answering` when the
    /// drag crossed the threshold.
    pub fn drag_released(&mut self, translation_x: f32) -> Result<Transition, TransitionError> {
        if translation_x >= SKIP_DRAG_THRESHOLD {
            return Ok(Transition::Ignored);
        }
        self.require_answering("skip by dragging")?;
        self.phase = Phase::Prompting(Prompt::Skip);
        Ok(Transition::Prompted(Prompt::Skip))
    }

    /// Reset the overlay once the question card has been replaced.
    pub fn clear_feedback(&mut self) {
        self.feedback = Feedback::Neutral;
    }

    /// Build the record of a finished session.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::NotFinished` before the last question is done.
    pub fn history_entry(&self, id: HistoryId) -> Result<HistoryEntry, TransitionError> {
        let (Phase::Finished, Some(finished_at)) = (self.phase, self.finished_at) else {
            return Err(TransitionError::NotFinished);
        };
        let questions = u32::try_from(self.total())
            .map_err(|_| HistoryEntryError::TooManyQuestions(self.total()))?;
        Ok(HistoryEntry::new(
            id,
            self.quiz.title(),
            self.quiz.level(),
            self.points,
            questions,
            finished_at,
        )?)
    }

    fn advance(&mut self, at: DateTime<Utc>) -> Step {
        self.selected = None;
        self.answered += 1;
        if self.current + 1 < self.quiz.question_count() {
            self.current += 1;
            self.phase = Phase::Answering;
            Step::Question(self.current)
        } else {
            self.phase = Phase::Finished;
            self.finished_at = Some(at);
            Step::Finished
        }
    }

    fn require_answering(&self, action: &'static str) -> Result<(), TransitionError> {
        if self.phase == Phase::Answering {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> TransitionError {
        TransitionError::InvalidPhase {
            action,
            phase: self.phase,
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("quiz_id", &self.quiz.id())
            .field("current", &self.current)
            .field("total", &self.quiz.question_count())
            .field("points", &self.points)
            .field("selected", &self.selected)
            .field("feedback", &self.feedback)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuizId;
    use crate::time::fixed_now;

    fn build_quiz(questions: usize) -> Quiz {
        let questions = (0..questions)
            .map(|i| {
                Question::new(
                    i,
                    format!("Q{i}"),
                    vec!["a".into(), "b".into(), "c".into()],
                    i % 3,
                )
                .unwrap()
            })
            .collect();
        Quiz::new(QuizId::new(1), "Sample", 2, questions).unwrap()
    }

    fn answer(session: &mut QuizSession, choice: usize) -> Transition {
        session.select_alternative(choice).unwrap();
        session.confirm(fixed_now()).unwrap()
    }

    #[test]
    fn correct_answer_scores_and_advances() {
        let mut session = QuizSession::new(build_quiz(3), fixed_now());

        let t = answer(&mut session, 0);

        assert_eq!(t, Transition::Correct(Step::Question(1)));
        assert_eq!(session.points(), 1);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.feedback(), Feedback::Correct);
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn wrong_answer_waits_for_feedback_before_advancing() {
        let mut session = QuizSession::new(build_quiz(3), fixed_now());

        let t = answer(&mut session, 2);
        assert_eq!(t, Transition::Wrong);
        assert_eq!(session.phase(), Phase::Retrying);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.selected(), None);
        assert_eq!(session.feedback(), Feedback::Wrong);

        let err = session.select_alternative(0).unwrap_err();
        assert!(matches!(err, TransitionError::InvalidPhase { .. }));

        let t = session.finish_feedback(fixed_now()).unwrap();
        assert_eq!(t, Transition::Advanced(Step::Question(1)));
        assert_eq!(session.points(), 0);
    }

    #[test]
    fn confirm_without_selection_prompts_and_changes_nothing() {
        let mut session = QuizSession::new(build_quiz(2), fixed_now());

        let t = session.confirm(fixed_now()).unwrap();
        assert_eq!(t, Transition::Prompted(Prompt::Skip));
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.points(), 0);

        assert_eq!(
            session.resolve_prompt(false, fixed_now()).unwrap(),
            Transition::Resumed
        );
        assert_eq!(session.phase(), Phase::Answering);
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn accepted_skip_advances_without_scoring() {
        let mut session = QuizSession::new(build_quiz(2), fixed_now());
        session.confirm(fixed_now()).unwrap();

        let t = session.resolve_prompt(true, fixed_now()).unwrap();

        assert_eq!(t, Transition::Advanced(Step::Question(1)));
        assert_eq!(session.points(), 0);
        assert_eq!(session.answered(), 1);
    }

    #[test]
    fn drag_past_threshold_opens_skip_prompt() {
        let mut session = QuizSession::new(build_quiz(2), fixed_now());
        session.select_alternative(1).unwrap();

        assert_eq!(session.drag_released(-120.0).unwrap(), Transition::Ignored);
        assert_eq!(session.selected(), Some(1));

        assert_eq!(
            session.drag_released(-240.0).unwrap(),
            Transition::Prompted(Prompt::Skip)
        );
        assert_eq!(session.phase(), Phase::Prompting(Prompt::Skip));

        assert_eq!(
            session.resolve_prompt(false, fixed_now()).unwrap(),
            Transition::Resumed
        );
        assert_eq!(session.selected(), Some(1));
    }

    #[test]
    fn accepted_drag_skip_drops_the_selection() {
        let mut session = QuizSession::new(build_quiz(2), fixed_now());
        session.select_alternative(1).unwrap();
        session.drag_released(-240.0).unwrap();

        session.resolve_prompt(true, fixed_now()).unwrap();
        assert_eq!(session.selected(), None);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.points(), 0);
    }

    #[test]
    fn only_finished_sessions_can_be_marked_recorded() {
        let mut session = QuizSession::new(build_quiz(1), fixed_now());
        assert_eq!(
            session.mark_recorded(HistoryId::new(5)).unwrap_err(),
            TransitionError::NotFinished
        );

        answer(&mut session, 0);
        session.mark_recorded(HistoryId::new(5)).unwrap();
        assert_eq!(session.recorded(), Some(HistoryId::new(5)));
    }

    #[test]
    fn stop_requires_confirmation() {
        let mut session = QuizSession::new(build_quiz(2), fixed_now());

        assert_eq!(session.stop().unwrap(), Transition::Prompted(Prompt::Stop));
        assert_eq!(
            session.resolve_prompt(false, fixed_now()).unwrap(),
            Transition::Resumed
        );

        session.stop().unwrap();
        assert_eq!(
            session.resolve_prompt(true, fixed_now()).unwrap(),
            Transition::Stopped
        );
        assert!(session.phase().is_terminal());
        assert!(session.current_question().is_none());
        assert_eq!(
            session.history_entry(HistoryId::new(1)).unwrap_err(),
            TransitionError::NotFinished
        );
    }

    #[test]
    fn two_correct_then_wrong_finishes_with_two_points() {
        let mut session = QuizSession::new(build_quiz(3), fixed_now());

        answer(&mut session, 0);
        answer(&mut session, 1);
        assert_eq!(answer(&mut session, 0), Transition::Wrong);
        assert_eq!(
            session.finish_feedback(fixed_now()).unwrap(),
            Transition::Advanced(Step::Finished)
        );

        let entry = session.history_entry(HistoryId::new(99)).unwrap();
        assert_eq!(entry.points(), 2);
        assert_eq!(entry.questions(), 3);
        assert_eq!(entry.title(), "Sample");
        assert_eq!(entry.finished_at(), fixed_now());
    }

    #[test]
    fn finished_session_rejects_further_input() {
        let mut session = QuizSession::new(build_quiz(1), fixed_now());
        assert_eq!(answer(&mut session, 0), Transition::Correct(Step::Finished));

        assert!(session.confirm(fixed_now()).is_err());
        assert!(session.stop().is_err());
        assert!(session.finish_feedback(fixed_now()).is_err());
    }

    #[test]
    fn selection_out_of_range_is_rejected() {
        let mut session = QuizSession::new(build_quiz(1), fixed_now());
        assert_eq!(
            session.select_alternative(3).unwrap_err(),
            TransitionError::AlternativeOutOfRange { index: 3, len: 3 }
        );
    }

    #[test]
    fn points_never_exceed_answered() {
        let mut session = QuizSession::new(build_quiz(6), fixed_now());
        let choices = [0, 0, 2, 1, 1, 2];
        for choice in choices {
            match answer(&mut session, choice) {
                Transition::Wrong => {
                    session.finish_feedback(fixed_now()).unwrap();
                }
                Transition::Correct(_) => {}
                other => panic!("unexpected transition {other:?}"),
            }
            assert!(session.points() <= session.answered());
        }
        assert!(session.is_finished());
        assert!(session.points() as usize <= session.total());
    }
}
