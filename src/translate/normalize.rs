//! Recognizer-output cleanup.
//!
//! Speech recognizers attach punctuation to word boundaries (`"done!"`,
//! `"a."`) and capitalise freely.  Before lookup every word is lowercased and
//! stripped down to letters and digits.

use serde::{Deserialize, Serialize};

/// Which word of a multi-word utterance is tried first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WordChoice {
    /// Most recent word first, the one the user just said.
    #[default]
    Last,
    /// Earliest word first.
    First,
}

/// Lowercase `raw` and drop every character that is not a letter or digit.
///
/// ```
/// use braille_voice::translate::normalize_word;
///
/// assert_eq!(normalize_word("Done!"), "done");
/// assert_eq!(normalize_word(" A. "), "a");
/// assert_eq!(normalize_word("?!"), "");
/// ```
pub fn normalize_word(raw: &str) -> String {
    raw.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Whitespace-separated words of `utterance` in the order they should be
/// tried.  Words that normalise to nothing are dropped.
pub fn candidate_words(utterance: &str, choice: WordChoice) -> Vec<&str> {
    let mut words: Vec<&str> = utterance
        .split_whitespace()
        .filter(|w| w.chars().any(char::is_alphanumeric))
        .collect();
    if choice == WordChoice::Last {
        words.reverse();
    }
    words
}
