//! Pipeline state machine and shared session state.
//!
//! [`PipelineState`] tracks what the orchestrator is doing.  [`SessionState`]
//! holds everything a front end needs to render: current phase, the last
//! utterance and translation, and any error.  [`SharedState`] is an
//! `Arc<Mutex<SessionState>>`, cheap to clone and safe to share across
//! threads.

use std::sync::{Arc, Mutex};

use crate::translate::TranslationResult;

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// States of the utterance → display pipeline.
///
/// ```text
/// Idle ──utterance──▶ Translating ──hit──▶ Sending ──ok──▶ Displayed
///                                 ──miss─▶ NoMatch
/// Sending ──transport error──▶ Error
/// Displayed / NoMatch / Error ──next utterance──▶ Translating
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// Waiting for the next utterance.
    #[default]
    Idle,

    /// Looking the utterance up in the dictionary.
    Translating,

    /// Frames are being written to the display.
    Sending,

    /// The last translation is on the display.
    Displayed,

    /// No word of the last utterance could be translated.
    NoMatch,

    /// The display could not be written.  Cleared by the next utterance.
    Error,
}

impl PipelineState {
    /// Returns `true` while an utterance is being processed.
    ///
    /// ```
    /// use braille_voice::pipeline::PipelineState;
    ///
    /// assert!(!PipelineState::Idle.is_busy());
    /// assert!(PipelineState::Translating.is_busy());
    /// assert!(PipelineState::Sending.is_busy());
    /// assert!(!PipelineState::Displayed.is_busy());
    /// assert!(!PipelineState::NoMatch.is_busy());
    /// assert!(!PipelineState::Error.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(self, PipelineState::Translating | PipelineState::Sending)
    }

    /// A short human-readable label suitable for a status line.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Idle => "Idle",
            PipelineState::Translating => "Translating",
            PipelineState::Sending => "Sending",
            PipelineState::Displayed => "Displayed",
            PipelineState::NoMatch => "No match",
            PipelineState::Error => "Error",
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Shared session state, the single source of truth for a front end.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Current phase of the pipeline.
    pub pipeline: PipelineState,

    /// Raw text of the most recent utterance.
    pub last_utterance: Option<String>,

    /// Most recent successful translation.  Kept across misses so the
    /// display contents stay known.
    pub last_result: Option<TranslationResult>,

    /// Active language.
    pub language: String,

    /// Error message to show when `pipeline == PipelineState::Error`.
    pub error_message: Option<String>,

    /// Frames successfully written since startup.
    pub frames_sent: u64,
}

impl SessionState {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`SessionState`].
///
/// Lock for a short critical section; do **not** hold the lock across
/// `.await` points.
pub type SharedState = Arc<Mutex<SessionState>>;

/// Construct a new [`SharedState`] for `language`.
pub fn new_shared_state(language: &str) -> SharedState {
    Arc::new(Mutex::new(SessionState::new(language)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        assert_eq!(PipelineState::Idle.label(), "Idle");
        assert_eq!(PipelineState::NoMatch.label(), "No match");
        assert_eq!(PipelineState::Displayed.label(), "Displayed");
    }

    #[test]
    fn default_pipeline_state_is_idle() {
        assert_eq!(PipelineState::default(), PipelineState::Idle);
    }

    #[test]
    fn session_state_starts_empty() {
        let state = SessionState::new("UEB");
        assert_eq!(state.pipeline, PipelineState::Idle);
        assert_eq!(state.language, "UEB");
        assert!(state.last_result.is_none());
        assert!(state.error_message.is_none());
        assert_eq!(state.frames_sent, 0);
    }

    #[test]
    fn shared_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedState>();
    }

    #[test]
    fn shared_state_can_be_cloned_and_mutated() {
        let state = new_shared_state("UEB");
        let state2 = Arc::clone(&state);

        state.lock().unwrap().pipeline = PipelineState::Sending;
        assert_eq!(state2.lock().unwrap().pipeline, PipelineState::Sending);
    }
}
