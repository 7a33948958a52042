use std::sync::Arc;

use rand::rng;
use rand::seq::SliceRandom;

use quiz_core::model::{
    HistoryId, Prompt, QuizCatalog, QuizId, QuizSession, Step, Transition,
};

use super::progress::SessionProgress;
use crate::Clock;
use crate::error::SessionError;
use crate::feedback::{Cue, FeedbackSink, SilentFeedback};
use crate::history::HistoryService;
use crate::routes::Route;

/// Result of driving a session one step.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStep {
    pub transition: Transition,
    pub progress: SessionProgress,
    /// Where the host should navigate, if the session ended.
    pub route: Option<Route>,
    /// Set once a finished session has been written to history.
    pub history_id: Option<HistoryId>,
}

/// Orchestrates a quiz session: catalog lookup, cues, history and navigation.
///
/// The session itself stays owned by the caller; every operation borrows it
/// mutably for the duration of one UI callback.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    catalog: Arc<QuizCatalog>,
    history: Arc<HistoryService>,
    feedback: Arc<dyn FeedbackSink>,
    cues_enabled: bool,
    shuffle_questions: bool,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, catalog: Arc<QuizCatalog>, history: Arc<HistoryService>) -> Self {
        Self {
            clock,
            catalog,
            history,
            feedback: Arc::new(SilentFeedback),
            cues_enabled: true,
            shuffle_questions: false,
        }
    }

    #[must_use]
    pub fn with_feedback(mut self, feedback: Arc<dyn FeedbackSink>) -> Self {
        self.feedback = feedback;
        self
    }

    #[must_use]
    pub fn with_cues(mut self, enabled: bool) -> Self {
        self.cues_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_shuffle_questions(mut self, shuffle: bool) -> Self {
        self.shuffle_questions = shuffle;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &QuizCatalog {
        &self.catalog
    }

    /// Resolve `quiz_id` in the catalog and open a session on it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownQuiz` if the catalog has no such quiz.
    pub fn start_session(&self, quiz_id: QuizId) -> Result<QuizSession, SessionError> {
        let quiz = self
            .catalog
            .resolve(quiz_id)
            .ok_or(SessionError::UnknownQuiz(quiz_id))?;

        let quiz = if self.shuffle_questions {
            let mut order: Vec<usize> = (0..quiz.question_count()).collect();
            order.as_mut_slice().shuffle(&mut rng());
            quiz.reordered(&order)
        } else {
            quiz.clone()
        };

        tracing::debug!(quiz = %quiz_id, questions = quiz.question_count(), "session started");
        Ok(QuizSession::new(quiz, self.clock.now()))
    }

    /// # Errors
    ///
    /// Returns `SessionError::Transition` outside `Answering` or for a bad index.
    pub fn select_alternative(
        &self,
        session: &mut QuizSession,
        index: usize,
    ) -> Result<SessionStep, SessionError> {
        let transition = session.select_alternative(index)?;
        Ok(Self::step(session, transition, None, None))
    }

    /// Confirm the current selection (or ask to skip when there is none).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Transition` outside `Answering`.
    pub async fn confirm(&self, session: &mut QuizSession) -> Result<SessionStep, SessionError> {
        let transition = session.confirm(self.clock.now())?;
        self.settle(session, transition).await
    }

    /// Signal that the wrong-answer shake has completed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Transition` unless the session is waiting on feedback.
    pub async fn finish_feedback(
        &self,
        session: &mut QuizSession,
    ) -> Result<SessionStep, SessionError> {
        let transition = session.finish_feedback(self.clock.now())?;
        self.settle(session, transition).await
    }

    /// Ask to leave the quiz.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Transition` outside `Answering`.
    pub fn stop(&self, session: &mut QuizSession) -> Result<SessionStep, SessionError> {
        let transition = session.stop()?;
        Ok(Self::step(session, transition, None, None))
    }

    /// Apply the player's answer to the open skip or stop prompt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Transition` when no prompt is open.
    pub async fn resolve_prompt(
        &self,
        session: &mut QuizSession,
        accepted: bool,
    ) -> Result<SessionStep, SessionError> {
        let transition = session.resolve_prompt(accepted, self.clock.now())?;
        self.settle(session, transition).await
    }

    /// Forward the end of a card drag.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Transition` if a skip-length drag arrives outside `Answering`.
    pub fn drag_released(
        &self,
        session: &mut QuizSession,
        translation_x: f32,
    ) -> Result<SessionStep, SessionError> {
        let transition = session.drag_released(translation_x)?;
        Ok(Self::step(session, transition, None, None))
    }

    /// Write a finished session to history.
    ///
    /// Finishing already attempts this; call it again to retry after a
    /// failed write. A session that is already stored returns its id.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::History` if the session is unfinished or storage fails.
    pub async fn record_history(
        &self,
        session: &mut QuizSession,
    ) -> Result<HistoryId, SessionError> {
        Ok(self.history.record(session).await?)
    }

    async fn settle(
        &self,
        session: &mut QuizSession,
        transition: Transition,
    ) -> Result<SessionStep, SessionError> {
        tracing::debug!(?transition, phase = %session.phase(), "session transition");

        match transition {
            Transition::Correct(_) => self.emit(Cue::Correct),
            Transition::Wrong => self.emit(Cue::Wrong),
            _ => {}
        }

        match transition {
            Transition::Correct(Step::Finished) | Transition::Advanced(Step::Finished) => {
                let history_id = match self.history.record(session).await {
                    Ok(id) => Some(id),
                    Err(err) => {
                        tracing::warn!(error = %err, "failed to record quiz history");
                        None
                    }
                };
                let route = Route::Finish {
                    points: session.points(),
                    total: u32::try_from(session.total()).unwrap_or(u32::MAX),
                };
                Ok(Self::step(session, transition, Some(route), history_id))
            }
            Transition::Stopped => Ok(Self::step(session, transition, Some(Route::Home), None)),
            Transition::Prompted(Prompt::Skip | Prompt::Stop)
            | Transition::Selected(_)
            | Transition::Resumed
            | Transition::Correct(Step::Question(_))
            | Transition::Advanced(Step::Question(_))
            | Transition::Wrong
            | Transition::Ignored => Ok(Self::step(session, transition, None, None)),
        }
    }

    fn emit(&self, cue: Cue) {
        if !self.cues_enabled {
            return;
        }
        if let Err(err) = self.feedback.emit(cue) {
            tracing::warn!(?cue, error = %err, "feedback cue failed");
        }
    }

    fn step(
        session: &QuizSession,
        transition: Transition,
        route: Option<Route>,
        history_id: Option<HistoryId>,
    ) -> SessionStep {
        SessionStep {
            transition,
            progress: SessionProgress::of(session),
            route,
            history_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{FeedbackError, RecordingFeedback};
    use quiz_core::model::{Feedback, Question, Quiz};
    use quiz_core::time::fixed_now;

    fn catalog() -> Arc<QuizCatalog> {
        let questions = (0..3)
            .map(|i| {
                Question::new(i, format!("Q{i}"), vec!["a".into(), "b".into()], 0).unwrap()
            })
            .collect();
        let quiz = Quiz::new(QuizId::new(1), "Loop", 1, questions).unwrap();
        Arc::new(QuizCatalog::new(vec![quiz]).unwrap())
    }

    fn service() -> (QuizLoopService, Arc<RecordingFeedback>) {
        let clock = Clock::fixed(fixed_now());
        let cues = Arc::new(RecordingFeedback::new());
        let svc = QuizLoopService::new(clock, catalog(), Arc::new(HistoryService::in_memory(clock)))
            .with_feedback(cues.clone());
        (svc, cues)
    }

    struct BrokenSpeaker;

    impl FeedbackSink for BrokenSpeaker {
        fn emit(&self, _cue: Cue) -> Result<(), FeedbackError> {
            Err(FeedbackError("no audio device".into()))
        }
    }

    #[test]
    fn unknown_quiz_is_rejected() {
        let (svc, _) = service();
        let err = svc.start_session(QuizId::new(9)).unwrap_err();
        assert!(matches!(err, SessionError::UnknownQuiz(id) if id == QuizId::new(9)));
    }

    #[tokio::test]
    async fn cues_follow_answers() {
        let (svc, cues) = service();
        let mut session = svc.start_session(QuizId::new(1)).unwrap();

        svc.select_alternative(&mut session, 0).unwrap();
        svc.confirm(&mut session).await.unwrap();
        svc.select_alternative(&mut session, 1).unwrap();
        let step = svc.confirm(&mut session).await.unwrap();

        assert_eq!(step.transition, Transition::Wrong);
        assert_eq!(session.feedback(), Feedback::Wrong);
        assert_eq!(cues.cues(), vec![Cue::Correct, Cue::Wrong]);
    }

    #[tokio::test]
    async fn muted_service_emits_nothing() {
        let (svc, cues) = service();
        let svc = svc.with_cues(false);
        let mut session = svc.start_session(QuizId::new(1)).unwrap();

        svc.select_alternative(&mut session, 0).unwrap();
        svc.confirm(&mut session).await.unwrap();

        assert!(cues.cues().is_empty());
        assert_eq!(session.points(), 1);
    }

    #[tokio::test]
    async fn failing_cue_does_not_block_progress() {
        let clock = Clock::fixed(fixed_now());
        let svc = QuizLoopService::new(clock, catalog(), Arc::new(HistoryService::in_memory(clock)))
            .with_feedback(Arc::new(BrokenSpeaker));
        let mut session = svc.start_session(QuizId::new(1)).unwrap();

        svc.select_alternative(&mut session, 0).unwrap();
        let step = svc.confirm(&mut session).await.unwrap();

        assert_eq!(step.transition, Transition::Correct(Step::Question(1)));
        assert_eq!(step.progress.current, 2);
    }

    #[tokio::test]
    async fn accepted_stop_routes_home_without_history() {
        let (svc, _) = service();
        let mut session = svc.start_session(QuizId::new(1)).unwrap();

        let step = svc.stop(&mut session).unwrap();
        assert_eq!(step.transition, Transition::Prompted(Prompt::Stop));
        let step = svc.resolve_prompt(&mut session, true).await.unwrap();

        assert_eq!(step.route, Some(Route::Home));
        assert_eq!(step.history_id, None);
        assert!(svc.history.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn short_drag_is_ignored() {
        let (svc, _) = service();
        let mut session = svc.start_session(QuizId::new(1)).unwrap();

        let step = svc.drag_released(&mut session, -50.0).unwrap();
        assert_eq!(step.transition, Transition::Ignored);

        let step = svc.drag_released(&mut session, -260.0).unwrap();
        assert_eq!(step.transition, Transition::Prompted(Prompt::Skip));
        let step = svc.resolve_prompt(&mut session, true).await.unwrap();
        assert_eq!(step.transition, Transition::Advanced(Step::Question(1)));
        assert_eq!(step.progress.points, 0);
    }

    #[test]
    fn shuffle_keeps_every_question() {
        let (svc, _) = service();
        let svc = svc.with_shuffle_questions(true);
        let session = svc.start_session(QuizId::new(1)).unwrap();

        let mut titles: Vec<_> = session
            .quiz()
            .questions()
            .iter()
            .map(|q| q.title().to_owned())
            .collect();
        titles.sort();
        assert_eq!(titles, vec!["Q0", "Q1", "Q2"]);
    }
}
