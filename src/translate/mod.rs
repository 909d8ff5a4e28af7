//! Translation of recognised speech into braille patterns.
//!
//! * [`normalize_word`] / [`candidate_words`]: recognizer-output cleanup.
//! * [`Translator`]: lookup policy: preferred language, default language,
//!   then letter-by-letter spelling.
//! * [`TranslationResult`] / [`Provenance`]: what was matched and how.

pub mod normalize;
pub mod translator;

pub use normalize::{candidate_words, normalize_word, WordChoice};
pub use translator::{Provenance, TranslationResult, Translator};
