use quiz_core::model::QuizSession;
use quiz_core::motion::progress_fraction;

/// Aggregated view of session progress, useful for the header and progress bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionProgress {
    /// 1-based number of the question on screen.
    pub current: usize,
    pub total: usize,
    pub answered: u32,
    pub points: u32,
    pub fraction: f32,
    pub is_complete: bool,
}

impl SessionProgress {
    #[must_use]
    pub fn of(session: &QuizSession) -> Self {
        let total = session.total();
        let current = (session.current_index() + 1).min(total);
        Self {
            current,
            total,
            answered: session.answered(),
            points: session.points(),
            fraction: progress_fraction(current, total),
            is_complete: session.is_finished(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, Quiz, QuizId};
    use quiz_core::time::fixed_now;

    #[test]
    fn progress_tracks_current_question() {
        let questions = (0..4)
            .map(|i| Question::new(i, format!("Q{i}"), vec!["a".into(), "b".into()], 1).unwrap())
            .collect();
        let quiz = Quiz::new(QuizId::new(1), "Progress", 1, questions).unwrap();
        let mut session = QuizSession::new(quiz, fixed_now());

        let start = SessionProgress::of(&session);
        assert_eq!(start.current, 1);
        assert_eq!(start.total, 4);
        assert!((start.fraction - 0.25).abs() < f32::EPSILON);

        session.select_alternative(1).unwrap();
        session.confirm(fixed_now()).unwrap();

        let next = SessionProgress::of(&session);
        assert_eq!(next.current, 2);
        assert_eq!(next.points, 1);
        assert_eq!(next.answered, 1);
        assert!(!next.is_complete);
    }
}
