//! Answer cues handed to the host's audio and haptics.

use std::sync::Mutex;

use thiserror::Error;

/// Signal emitted when an answer is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Correct-answer chime.
    Correct,
    /// Wrong-answer buzz plus an error haptic.
    Wrong,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("feedback playback failed: {0}")]
pub struct FeedbackError(pub String);

/// Host-side cue player. Playback is fire-and-forget: failures are logged by
/// the caller and never change session state.
pub trait FeedbackSink: Send + Sync {
    /// Start playing `cue`.
    ///
    /// # Errors
    ///
    /// Returns `FeedbackError` if playback could not be started.
    fn emit(&self, cue: Cue) -> Result<(), FeedbackError>;
}

/// Sink that drops every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentFeedback;

impl FeedbackSink for SilentFeedback {
    fn emit(&self, _cue: Cue) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// Sink that remembers emitted cues, for tests and headless hosts.
#[derive(Debug, Default)]
pub struct RecordingFeedback {
    cues: Mutex<Vec<Cue>>,
}

impl RecordingFeedback {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cues(&self) -> Vec<Cue> {
        self.cues.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl FeedbackSink for RecordingFeedback {
    fn emit(&self, cue: Cue) -> Result<(), FeedbackError> {
        self.cues
            .lock()
            .map_err(|e| FeedbackError(e.to_string()))?
            .push(cue);
        Ok(())
    }
}
