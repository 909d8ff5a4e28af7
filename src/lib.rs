//! # braille-voice
//!
//! Turns spoken words into braille cells and drives a two-cell refreshable
//! braille display.
//!
//! ## Architecture
//!
//! ```text
//! recognised text ─▶ Translator ─▶ Pattern ─▶ encode_output_command ─▶ DisplayTransport
//!                        │
//!                  DictionaryStore  ◀── parse_pattern_text ◀── dataset rows
//! ```
//!
//! Parsing, dictionary building, translation and encoding are synchronous
//! and pure.  Only the dataset read and the transport write touch I/O.

pub mod braille;
pub mod config;
pub mod diagnostics;
pub mod dictionary;
pub mod pipeline;
pub mod translate;
pub mod wire;

// Convenience re-exports
pub use braille::{parse_pattern_text, Cell, ParseError, Pattern};
pub use dictionary::{DictionaryEntry, DictionaryStore, SharedDictionary};
pub use translate::{TranslationResult, Translator};
pub use wire::{encode_clear_command, encode_output_command, encode_pin_command};
