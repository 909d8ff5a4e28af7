//! Pipeline orchestrator: drives the utterance → braille → display loop.
//!
//! [`PipelineOrchestrator`] owns the [`Translator`] and a
//! [`DisplayTransport`], and reacts to [`PipelineMessage`]s received over a
//! `tokio::sync::mpsc` channel.
//!
//! # Pipeline flow
//!
//! ```text
//! PipelineMessage::Utterance(text)
//!   └─▶ translate_utterance(text, word_choice)      [Translating]
//!         ├─ None → NoMatch event                    [NoMatch]
//!         └─ Some → (N:) + O: frames → transport      [Sending]
//!               ├─ Ok  → Displayed event              [Displayed]
//!               └─ Err → warn + Failed event          [Error]
//!
//! SetLanguage / Reload / Clear / LetterSweep / PinSweep
//!   └─▶ translator or transport update, then an event
//! ```
//!
//! Translation is in-memory and bounded, so it runs inline on the task; only
//! transport writes are awaited.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::diagnostics::{letter_sweep, pin_sweep};
use crate::dictionary::{BuildReport, RawRow};
use crate::translate::{TranslationResult, Translator, WordChoice};
use crate::wire::{
    encode_clear_command, encode_output_command, DisplayTransport, TransportError, DISPLAY_CELLS,
};

use super::state::{PipelineState, SessionState, SharedState};

// ---------------------------------------------------------------------------
// Messages and events
// ---------------------------------------------------------------------------

/// Input to the orchestrator.
#[derive(Debug, Clone)]
pub enum PipelineMessage {
    /// Recognised speech (or typed text).
    Utterance(String),
    /// Switch the active language.
    SetLanguage(String),
    /// Rebuild the dictionary from these rows and swap it in.
    Reload(Vec<RawRow>),
    /// Blank the display.
    Clear,
    /// Send every single-character entry of the active language in turn.
    LetterSweep,
    /// Raise and lower every pin.
    PinSweep,
}

/// Output from the orchestrator, for a front end to render.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    Displayed {
        result: TranslationResult,
        frame: Vec<u8>,
    },
    NoMatch {
        utterance: String,
    },
    LanguageChanged(String),
    Reloaded(BuildReport),
    Cleared,
    SweepDone {
        frames: usize,
    },
    Failed(String),
}

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Errors that can surface inside the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("display transport failed: {0}")]
    Transport(#[from] TransportError),
}

// ---------------------------------------------------------------------------
// PipelineOptions
// ---------------------------------------------------------------------------

/// Behaviour switches taken from [`AppConfig`].
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub word_choice: WordChoice,
    pub clear_before_output: bool,
    /// Display width used by the pin sweep.
    pub cells: u8,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            word_choice: WordChoice::default(),
            clear_before_output: false,
            cells: DISPLAY_CELLS as u8,
        }
    }
}

impl From<&AppConfig> for PipelineOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            word_choice: config.input.word_choice,
            clear_before_output: config.display.clear_before_output,
            cells: config.display.cells,
        }
    }
}

// ---------------------------------------------------------------------------
// PipelineOrchestrator
// ---------------------------------------------------------------------------

/// Drives the complete utterance → display pipeline.
///
/// Create with [`PipelineOrchestrator::new`], then call [`run`](Self::run)
/// inside a tokio task.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use braille_voice::dictionary::{bundled_rows, DictionaryStore};
/// use braille_voice::pipeline::{
///     new_shared_state, PipelineMessage, PipelineOptions, PipelineOrchestrator,
/// };
/// use braille_voice::translate::Translator;
/// use braille_voice::wire::LogTransport;
///
/// # async fn example() {
/// let (store, _) = DictionaryStore::build(bundled_rows());
/// let translator = Translator::from_store(store, "UEB");
///
/// let (tx, rx) = tokio::sync::mpsc::channel(16);
/// let orchestrator = PipelineOrchestrator::new(
///     new_shared_state("UEB"),
///     translator,
///     Arc::new(LogTransport),
///     PipelineOptions::default(),
/// );
/// tokio::spawn(orchestrator.run(rx));
///
/// tx.send(PipelineMessage::Utterance("hello".into())).await.unwrap();
/// # }
/// ```
pub struct PipelineOrchestrator {
    state: SharedState,
    translator: Translator,
    transport: Arc<dyn DisplayTransport>,
    options: PipelineOptions,
    events: Option<mpsc::Sender<PipelineEvent>>,
}

impl PipelineOrchestrator {
    pub fn new(
        state: SharedState,
        translator: Translator,
        transport: Arc<dyn DisplayTransport>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            state,
            translator,
            transport,
            options,
            events: None,
        }
    }

    /// Publish [`PipelineEvent`]s on `events`.
    pub fn with_events(mut self, events: mpsc::Sender<PipelineEvent>) -> Self {
        self.events = Some(events);
        self
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run until `rx` is closed.
    pub async fn run(mut self, mut rx: mpsc::Receiver<PipelineMessage>) {
        while let Some(message) = rx.recv().await {
            match message {
                PipelineMessage::Utterance(text) => self.handle_utterance(text).await,
                PipelineMessage::SetLanguage(language) => self.handle_set_language(language).await,
                PipelineMessage::Reload(rows) => self.handle_reload(rows).await,
                PipelineMessage::Clear => self.handle_clear().await,
                PipelineMessage::LetterSweep => {
                    let store = self.translator.dictionary().snapshot();
                    let frames: Vec<Vec<u8>> = letter_sweep(&store, self.translator.language())
                        .into_iter()
                        .map(|(_, frame)| frame)
                        .collect();
                    self.handle_sweep(frames).await;
                }
                PipelineMessage::PinSweep => self.handle_sweep(pin_sweep(self.options.cells)).await,
            }
        }

        log::info!("pipeline: message channel closed, orchestrator shutting down");
    }

    // -----------------------------------------------------------------------
    // Handlers
    // -----------------------------------------------------------------------

    async fn handle_utterance(&mut self, text: String) {
        {
            let mut st = self.lock_state();
            st.pipeline = PipelineState::Translating;
            st.last_utterance = Some(text.clone());
            st.error_message = None;
        }

        let Some(result) = self
            .translator
            .translate_utterance(&text, self.options.word_choice)
        else {
            log::debug!("pipeline: no translation for {text:?}");
            self.set_pipeline(PipelineState::NoMatch);
            self.emit(PipelineEvent::NoMatch { utterance: text }).await;
            return;
        };

        log::debug!(
            "pipeline: {:?} → {} ({})",
            result.word,
            result.pattern,
            if result.is_decomposed() { "spelled" } else { "dictionary" }
        );
        self.set_pipeline(PipelineState::Sending);

        let frame = encode_output_command(&result.pattern);
        let mut frames = Vec::with_capacity(2);
        if self.options.clear_before_output {
            frames.push(encode_clear_command());
        }
        frames.push(frame.clone());

        match self.send_frames(&frames).await {
            Ok(()) => {
                {
                    let mut st = self.lock_state();
                    st.pipeline = PipelineState::Displayed;
                    st.last_result = Some(result.clone());
                }
                self.emit(PipelineEvent::Displayed { result, frame }).await;
            }
            Err(e) => self.fail(e).await,
        }
    }

    async fn handle_set_language(&mut self, language: String) {
        self.translator.set_language(&language);
        let language = self.translator.language().to_string();
        self.lock_state().language = language.clone();
        log::info!("pipeline: language set to {language:?}");
        self.emit(PipelineEvent::LanguageChanged(language)).await;
    }

    async fn handle_reload(&mut self, rows: Vec<RawRow>) {
        let report = self.translator.reload(rows);
        log::info!(
            "pipeline: dictionary reloaded ({} loaded, {} skipped)",
            report.loaded,
            report.skipped.len()
        );
        self.emit(PipelineEvent::Reloaded(report)).await;
    }

    async fn handle_clear(&mut self) {
        match self.send_frames(&[encode_clear_command()]).await {
            Ok(()) => {
                {
                    let mut st = self.lock_state();
                    st.pipeline = PipelineState::Idle;
                    st.last_result = None;
                }
                self.emit(PipelineEvent::Cleared).await;
            }
            Err(e) => self.fail(e).await,
        }
    }

    async fn handle_sweep(&mut self, frames: Vec<Vec<u8>>) {
        self.set_pipeline(PipelineState::Sending);
        match self.send_frames(&frames).await {
            Ok(()) => {
                self.set_pipeline(PipelineState::Idle);
                self.emit(PipelineEvent::SweepDone {
                    frames: frames.len(),
                })
                .await;
            }
            Err(e) => self.fail(e).await,
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn send_frames(&self, frames: &[Vec<u8>]) -> Result<(), PipelineError> {
        for frame in frames {
            self.transport.send(frame).await?;
            self.lock_state().frames_sent += 1;
        }
        Ok(())
    }

    async fn fail(&self, error: PipelineError) {
        let message = error.to_string();
        log::warn!("pipeline: {message}");
        {
            let mut st = self.lock_state();
            st.pipeline = PipelineState::Error;
            st.error_message = Some(message.clone());
        }
        self.emit(PipelineEvent::Failed(message)).await;
    }

    async fn emit(&self, event: PipelineEvent) {
        if let Some(tx) = &self.events {
            // A closed receiver only means nobody is listening.
            let _ = tx.send(event).await;
        }
    }

    fn set_pipeline(&self, state: PipelineState) {
        self.lock_state().pipeline = state;
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::dictionary::{DictionaryStore, PHILIPPINE, UEB};
    use crate::pipeline::state::new_shared_state;
    use crate::wire::MemoryTransport;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Rejects every frame.
    struct BrokenTransport;

    #[async_trait]
    impl DisplayTransport for BrokenTransport {
        async fn send(&self, _frame: &[u8]) -> Result<(), TransportError> {
            Err(TransportError::Write(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "link down",
            )))
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn rows() -> Vec<RawRow> {
        vec![
            RawRow::new("a", "[[1]]", UEB),
            RawRow::new("b", "[[1,2]]", UEB),
            RawRow::new("done", "[[1,4,5],[1,3,4,5]]", UEB),
            RawRow::new("a", "[[1]]", PHILIPPINE),
        ]
    }

    /// Run `messages` through a fresh orchestrator and collect its events.
    async fn run_with(
        transport: Arc<dyn DisplayTransport>,
        options: PipelineOptions,
        messages: Vec<PipelineMessage>,
    ) -> (SharedState, Vec<PipelineEvent>) {
        let translator = Translator::from_store(DictionaryStore::build(rows()).0, UEB);
        let state = new_shared_state(UEB);
        let (tx, rx) = mpsc::channel(16);
        let (event_tx, mut event_rx) = mpsc::channel(64);

        let orchestrator =
            PipelineOrchestrator::new(state.clone(), translator, transport, options)
                .with_events(event_tx);
        let handle = tokio::spawn(orchestrator.run(rx));

        for message in messages {
            tx.send(message).await.unwrap();
        }
        drop(tx);
        handle.await.unwrap();

        let mut events = Vec::new();
        while let Some(event) = event_rx.recv().await {
            events.push(event);
        }
        (state, events)
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn single_letter_is_padded_and_sent() {
        let transport = Arc::new(MemoryTransport::new());
        let (state, events) = run_with(
            transport.clone(),
            PipelineOptions::default(),
            vec![PipelineMessage::Utterance("a.".into())],
        )
        .await;

        assert_eq!(transport.frames_as_text(), vec!["O:[[1],[]]"]);
        assert!(matches!(
            &events[..],
            [PipelineEvent::Displayed { frame, .. }] if frame == b"O:[[1],[]]"
        ));

        let st = state.lock().unwrap();
        assert_eq!(st.pipeline, PipelineState::Displayed);
        assert_eq!(st.frames_sent, 1);
        assert_eq!(st.last_result.as_ref().unwrap().word, "a");
    }

    #[tokio::test]
    async fn two_cell_word_passes_through() {
        let transport = Arc::new(MemoryTransport::new());
        run_with(
            transport.clone(),
            PipelineOptions::default(),
            vec![PipelineMessage::Utterance("Done!".into())],
        )
        .await;

        assert_eq!(transport.frames_as_text(), vec!["O:[[1,4,5],[1,3,4,5]]"]);
    }

    #[tokio::test]
    async fn last_word_of_utterance_is_used() {
        let transport = Arc::new(MemoryTransport::new());
        run_with(
            transport.clone(),
            PipelineOptions::default(),
            vec![PipelineMessage::Utterance("a b done".into())],
        )
        .await;

        assert_eq!(transport.frames_as_text(), vec!["O:[[1,4,5],[1,3,4,5]]"]);
    }

    #[tokio::test]
    async fn clear_before_output_sends_two_frames() {
        let transport = Arc::new(MemoryTransport::new());
        let options = PipelineOptions {
            clear_before_output: true,
            word_choice: WordChoice::First,
            ..PipelineOptions::default()
        };
        run_with(
            transport.clone(),
            options,
            vec![PipelineMessage::Utterance("b done".into())],
        )
        .await;

        assert_eq!(transport.frames_as_text(), vec!["N:[[],[]]", "O:[[1,2],[]]"]);
    }

    #[tokio::test]
    async fn miss_sends_nothing() {
        let transport = Arc::new(MemoryTransport::new());
        let (state, events) = run_with(
            transport.clone(),
            PipelineOptions::default(),
            vec![PipelineMessage::Utterance("zzz".into())],
        )
        .await;

        assert!(transport.frames().is_empty());
        assert!(matches!(&events[..], [PipelineEvent::NoMatch { .. }]));
        let st = state.lock().unwrap();
        assert_eq!(st.pipeline, PipelineState::NoMatch);
        assert!(st.error_message.is_none());
    }

    #[tokio::test]
    async fn transport_failure_sets_error_state() {
        let (state, events) = run_with(
            Arc::new(BrokenTransport),
            PipelineOptions::default(),
            vec![PipelineMessage::Utterance("a".into())],
        )
        .await;

        assert!(matches!(&events[..], [PipelineEvent::Failed(_)]));
        let st = state.lock().unwrap();
        assert_eq!(st.pipeline, PipelineState::Error);
        assert!(st.error_message.as_ref().unwrap().contains("link down"));
        assert!(st.last_result.is_none());
    }

    #[tokio::test]
    async fn language_switch_falls_back_to_default() {
        let transport = Arc::new(MemoryTransport::new());
        let (state, events) = run_with(
            transport.clone(),
            PipelineOptions::default(),
            vec![
                PipelineMessage::SetLanguage("philippine".into()),
                PipelineMessage::Utterance("done".into()),
            ],
        )
        .await;

        assert!(matches!(&events[0], PipelineEvent::LanguageChanged(l) if l == PHILIPPINE));
        assert_eq!(transport.frames_as_text(), vec!["O:[[1,4,5],[1,3,4,5]]"]);
        let st = state.lock().unwrap();
        assert_eq!(st.language, PHILIPPINE);
        assert_eq!(st.last_result.as_ref().unwrap().language, UEB);
    }

    #[tokio::test]
    async fn reload_swaps_dictionary() {
        let transport = Arc::new(MemoryTransport::new());
        let (_, events) = run_with(
            transport.clone(),
            PipelineOptions::default(),
            vec![
                PipelineMessage::Reload(vec![
                    RawRow::new("hello", "[[1,2,5],[1,5]]", UEB),
                    RawRow::new("broken", "oops", UEB),
                ]),
                PipelineMessage::Utterance("hello".into()),
                PipelineMessage::Utterance("done".into()),
            ],
        )
        .await;

        match &events[0] {
            PipelineEvent::Reloaded(report) => {
                assert_eq!(report.loaded, 1);
                assert_eq!(report.skipped.len(), 1);
            }
            other => panic!("expected Reloaded, got {other:?}"),
        }
        assert_eq!(transport.frames_as_text(), vec!["O:[[1,2,5],[1,5]]"]);
        assert!(matches!(events[2], PipelineEvent::NoMatch { .. }));
    }

    #[tokio::test]
    async fn clear_and_sweeps() {
        let transport = Arc::new(MemoryTransport::new());
        let (state, events) = run_with(
            transport.clone(),
            PipelineOptions::default(),
            vec![
                PipelineMessage::Clear,
                PipelineMessage::LetterSweep,
                PipelineMessage::PinSweep,
            ],
        )
        .await;

        let frames = transport.frames_as_text();
        assert_eq!(frames[0], "N:[[],[]]");
        // a, b from UEB
        assert_eq!(frames[1..3], ["O:[[1],[]]", "O:[[1,2],[]]"]);
        assert_eq!(frames.len(), 1 + 2 + 24);
        assert_eq!(frames[3], "P:0,0,1");

        assert!(matches!(events[0], PipelineEvent::Cleared));
        assert!(matches!(events[1], PipelineEvent::SweepDone { frames: 2 }));
        assert!(matches!(events[2], PipelineEvent::SweepDone { frames: 24 }));
        assert_eq!(state.lock().unwrap().pipeline, PipelineState::Idle);
    }
}
