//! Dictionary entry types.

use crate::braille::Pattern;

// ---------------------------------------------------------------------------
// Language namespaces
// ---------------------------------------------------------------------------

/// Unified English Braille, the primary, most complete namespace.
pub const UEB: &str = "UEB";

/// Filipino braille namespace.
pub const PHILIPPINE: &str = "Philippine";

/// Namespace searched first when no language is given.
pub const DEFAULT_LANGUAGE: &str = UEB;

// ---------------------------------------------------------------------------
// RawRow
// ---------------------------------------------------------------------------

/// One unvalidated dataset row, exactly as read from the delimited source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line number in the source, `0` when not file-backed.
    pub line: usize,
    pub word: String,
    pub short_form: String,
    pub unicode_glyph: String,
    pub pattern_text: String,
    pub language: String,
}

impl RawRow {
    /// Convenience constructor for in-code tables and tests.
    pub fn new(word: &str, pattern_text: &str, language: &str) -> Self {
        Self {
            word: word.to_string(),
            pattern_text: pattern_text.to_string(),
            language: language.to_string(),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// DictionaryEntry
// ---------------------------------------------------------------------------

/// A validated word → braille mapping inside one language namespace.
///
/// Entries are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    /// Lookup key: trimmed and lowercased.
    pub word: String,
    /// Braille short-form contraction for the same word, if any.
    pub short_form: Option<String>,
    /// Pre-rendered display string.  Cosmetic only.
    pub unicode_glyph: Option<String>,
    /// Authoritative dot data.
    pub pattern: Pattern,
    /// Namespace tag, e.g. `"UEB"`.
    pub language: String,
}

impl DictionaryEntry {
    /// Glyph to show for this entry: the dataset's own rendering when present,
    /// otherwise one rendered from the pattern.
    pub fn display_glyph(&self) -> String {
        self.unicode_glyph
            .clone()
            .unwrap_or_else(|| self.pattern.to_unicode())
    }

    /// `true` when the entry spells a single character (letters, digits).
    pub fn is_single_char(&self) -> bool {
        self.word.chars().count() == 1
    }
}

/// Normalise a lookup key: trim surrounding whitespace and lowercase.
pub fn normalize_key(word: &str) -> String {
    word.trim().to_lowercase()
}

/// `Some(trimmed)` for non-blank text, `None` otherwise.
pub(crate) fn non_blank(text: &str) -> Option<String> {
    let t = text.trim();
    (!t.is_empty()).then(|| t.to_string())
}
