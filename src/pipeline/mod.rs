//! Pipeline orchestrator module for braille-voice.
//!
//! This module wires recognised text → translation → display frames and
//! exposes the shared state a front end reads.
//!
//! # Architecture
//!
//! ```text
//! PipelineMessage (mpsc)
//!        │
//!        ▼
//! PipelineOrchestrator::run()  ← async tokio task
//!        │
//!        ├─ Utterance    → Translator::translate_utterance → O: frame → DisplayTransport
//!        ├─ SetLanguage  → Translator::set_language
//!        ├─ Reload       → Translator::reload (atomic store swap)
//!        └─ Clear / LetterSweep / PinSweep → N: / O: / P: frames
//!
//! SharedState (Arc<Mutex<SessionState>>)  ←── read by the front end
//! PipelineEvent (mpsc)                     ──▶ optional event stream
//! ```

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{
    PipelineError, PipelineEvent, PipelineMessage, PipelineOptions, PipelineOrchestrator,
};
pub use state::{new_shared_state, PipelineState, SessionState, SharedState};
