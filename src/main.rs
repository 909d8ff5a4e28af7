//! Application entry point for braille-voice.
//!
//! Each line on stdin stands in for one recognised utterance from the
//! speech-to-text front end.  Lines starting with `:` are commands:
//!
//! | Command        | Effect                                   |
//! |----------------|------------------------------------------|
//! | `:lang <name>` | switch language (e.g. `:lang Philippine`) |
//! | `:clear`       | blank the display                        |
//! | `:reload`      | re-read the dataset and swap it in       |
//! | `:letters`     | letter sweep for the active language     |
//! | `:pins`        | pin sweep                                |
//! | `:quit`        | exit                                     |
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Read dataset rows and build the dictionary.
//! 4. Create [`tokio`] runtime.
//! 5. Open the display transport (dry run when no device is configured).
//! 6. Spawn the pipeline orchestrator and the event printer.
//! 7. Feed stdin lines to the pipeline until EOF or `:quit`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use braille_voice::{
    config::{AppConfig, AppPaths},
    dictionary::{bundled_rows, load_rows, DictionaryStore, RawRow},
    pipeline::{
        new_shared_state, PipelineEvent, PipelineMessage, PipelineOptions, PipelineOrchestrator,
    },
    translate::Translator,
    wire::{DeviceTransport, DisplayTransport, LogTransport},
};

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// Rows from `dataset` when given, otherwise the bundled table.
fn read_dataset(dataset: Option<&PathBuf>) -> Result<Vec<RawRow>> {
    match dataset {
        Some(path) => Ok(load_rows(path)?),
        None => Ok(bundled_rows()),
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Map one stdin line to a pipeline message.  `None` means quit.
fn parse_line(line: &str, dataset: Option<&PathBuf>) -> Option<Option<PipelineMessage>> {
    let line = line.trim();
    if line.is_empty() {
        return Some(None);
    }
    let Some(command) = line.strip_prefix(':') else {
        return Some(Some(PipelineMessage::Utterance(line.to_string())));
    };

    let (name, arg) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(n, a)| (n, a.trim()));

    let message = match name {
        "quit" | "q" => return None,
        "lang" if !arg.is_empty() => PipelineMessage::SetLanguage(arg.to_string()),
        "clear" => PipelineMessage::Clear,
        "letters" => PipelineMessage::LetterSweep,
        "pins" => PipelineMessage::PinSweep,
        "reload" => match read_dataset(dataset) {
            Ok(rows) => PipelineMessage::Reload(rows),
            Err(e) => {
                log::warn!("reload failed: {e:#}");
                return Some(None);
            }
        },
        _ => {
            eprintln!("unknown command: {line}");
            return Some(None);
        }
    };
    Some(Some(message))
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_event(event: PipelineEvent) {
    match event {
        PipelineEvent::Displayed { result, frame } => {
            let source = if result.is_decomposed() {
                "spelled"
            } else {
                "dictionary"
            };
            println!(
                "{}  {}  {}  [{}, {}]",
                result.word,
                result.display_glyph(),
                String::from_utf8_lossy(&frame),
                result.language,
                source
            );
        }
        PipelineEvent::NoMatch { utterance } => println!("no braille for {utterance:?}"),
        PipelineEvent::LanguageChanged(language) => println!("language: {language}"),
        PipelineEvent::Reloaded(report) => println!(
            "reloaded: {} entries, {} skipped",
            report.loaded,
            report.skipped.len()
        ),
        PipelineEvent::Cleared => println!("display cleared"),
        PipelineEvent::SweepDone { frames } => println!("sweep sent {frames} frames"),
        PipelineEvent::Failed(message) => eprintln!("error: {message}"),
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("braille-voice starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    let dataset = config.dataset_file(&AppPaths::new());

    // 3. Dictionary
    let rows = read_dataset(dataset.as_ref()).context("loading braille dataset")?;
    let (store, report) =
        DictionaryStore::build_with_default(rows, &config.dictionary.default_language);
    if !report.is_clean() {
        log::warn!("{} dataset row(s) skipped", report.skipped.len());
    }
    let translator = Translator::from_store(store, &config.dictionary.preferred_language);

    // 4. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("creating tokio runtime")?;

    rt.block_on(async move {
        // 5. Display transport
        let transport: Arc<dyn DisplayTransport> = match &config.display.device_path {
            Some(path) => {
                let terminator = config.display.newline_delimited.then_some(b'\n');
                Arc::new(
                    DeviceTransport::open(path)
                        .await?
                        .with_terminator(terminator),
                )
            }
            None => {
                log::info!("no display device configured; dry run");
                Arc::new(LogTransport)
            }
        };

        // 6. Pipeline + event printer
        let (tx, rx) = mpsc::channel::<PipelineMessage>(16);
        let (event_tx, mut event_rx) = mpsc::channel::<PipelineEvent>(32);

        let orchestrator = PipelineOrchestrator::new(
            new_shared_state(translator.language()),
            translator,
            transport,
            PipelineOptions::from(&config),
        )
        .with_events(event_tx);
        let pipeline = tokio::spawn(orchestrator.run(rx));

        let printer = tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                print_event(event);
            }
        });

        // 7. Input loop
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            match parse_line(&line, dataset.as_ref()) {
                Some(Some(message)) => {
                    if tx.send(message).await.is_err() {
                        break;
                    }
                }
                Some(None) => {}
                None => break,
            }
        }

        drop(tx);
        pipeline.await?;
        printer.await?;
        log::info!("braille-voice shutting down");
        Ok::<_, anyhow::Error>(())
    })
}
