//! Word → braille translation policy.
//!
//! # Matching order
//!
//! | Step | Strategy                                   | Provenance   |
//! |------|--------------------------------------------|--------------|
//! | 1    | whole word in the preferred language       | `Dictionary` |
//! | 2    | whole word in the default language         | `Dictionary` |
//! | 3    | spell it: one single-character entry each | `Decomposed` |
//!
//! Step 2 only runs when the preferred language is not the default.  Step 3
//! is all-or-nothing: one unknown character means no result.  A miss is a
//! normal outcome (`None`), not an error.

use crate::braille::Pattern;
use crate::dictionary::{BuildReport, DictionaryEntry, DictionaryStore, RawRow, SharedDictionary};

use super::normalize::{candidate_words, normalize_word, WordChoice};

// ---------------------------------------------------------------------------
// TranslationResult
// ---------------------------------------------------------------------------

/// Where a translated pattern came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// A whole-word dictionary hit (may be a short-form contraction).
    Dictionary(DictionaryEntry),
    /// Spelled out from single-character entries.
    Decomposed,
}

/// A successful translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    /// Normalised word that was translated.
    pub word: String,
    pub pattern: Pattern,
    /// Namespace the pattern was taken from.
    pub language: String,
    pub provenance: Provenance,
}

impl TranslationResult {
    pub fn is_decomposed(&self) -> bool {
        matches!(self.provenance, Provenance::Decomposed)
    }

    /// The dictionary entry behind a whole-word hit.
    pub fn source_entry(&self) -> Option<&DictionaryEntry> {
        match &self.provenance {
            Provenance::Dictionary(entry) => Some(entry),
            Provenance::Decomposed => None,
        }
    }

    /// Glyph for display: the entry's own glyph for dictionary hits,
    /// otherwise rendered from the pattern.
    pub fn display_glyph(&self) -> String {
        match &self.provenance {
            Provenance::Dictionary(entry) => entry.display_glyph(),
            Provenance::Decomposed => self.pattern.to_unicode(),
        }
    }
}

// ---------------------------------------------------------------------------
// Translator
// ---------------------------------------------------------------------------

/// Resolves recognised words to braille patterns.
///
/// Holds a handle to the current dictionary and the active language.
/// Switching language is a field update; reloading swaps the store.
///
/// ```
/// use braille_voice::dictionary::{bundled_rows, DictionaryStore};
/// use braille_voice::translate::Translator;
///
/// let (store, _) = DictionaryStore::build(bundled_rows());
/// let translator = Translator::from_store(store, "UEB");
///
/// let hit = translator.translate("Braille!", "UEB").unwrap();
/// assert_eq!(hit.pattern.len(), 3);
/// assert!(translator.translate("?!", "UEB").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Translator {
    dictionary: SharedDictionary,
    language: String,
}

impl Translator {
    pub fn new(dictionary: SharedDictionary, language: &str) -> Self {
        Self {
            dictionary,
            language: language.trim().to_string(),
        }
    }

    pub fn from_store(store: DictionaryStore, language: &str) -> Self {
        Self::new(SharedDictionary::new(store), language)
    }

    pub fn dictionary(&self) -> &SharedDictionary {
        &self.dictionary
    }

    /// Active language used by [`translate_current`](Self::translate_current).
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Select the active language.  The tag is matched case-insensitively
    /// and stored in the dictionary's spelling.
    pub fn set_language(&mut self, language: &str) {
        let language = language.trim();
        let store = self.dictionary.snapshot();
        self.language = match store.canonical_language(language) {
            Some(tag) => tag.to_string(),
            None => {
                log::warn!("translator: language {language:?} has no entries; default will be used");
                language.to_string()
            }
        };
    }

    /// Build a fresh store from `rows` (same default language) and publish it.
    pub fn reload<I>(&self, rows: I) -> BuildReport
    where
        I: IntoIterator<Item = RawRow>,
    {
        let default = self.dictionary.snapshot().default_language().to_string();
        let (store, report) = DictionaryStore::build_with_default(rows, &default);
        self.dictionary.replace(store);
        report
    }

    // -----------------------------------------------------------------------
    // Translation
    // -----------------------------------------------------------------------

    /// Translate one word using the active language.
    pub fn translate_current(&self, raw_word: &str) -> Option<TranslationResult> {
        self.translate(raw_word, &self.language)
    }

    /// Translate the first word of `utterance` (in `choice` order) that has
    /// a translation, using the active language.
    pub fn translate_utterance(
        &self,
        utterance: &str,
        choice: WordChoice,
    ) -> Option<TranslationResult> {
        candidate_words(utterance, choice)
            .into_iter()
            .find_map(|word| self.translate_current(word))
    }

    /// Translate `raw_word`, preferring `preferred_language`.
    pub fn translate(&self, raw_word: &str, preferred_language: &str) -> Option<TranslationResult> {
        let word = normalize_word(raw_word);
        if word.is_empty() {
            return None;
        }

        let store = self.dictionary.snapshot();
        let preferred = store
            .canonical_language(preferred_language)
            .unwrap_or(preferred_language.trim());
        let default = store.default_language();

        let whole = store.lookup(&word, Some(preferred)).or_else(|| {
            (preferred != default)
                .then(|| store.lookup(&word, Some(default)))
                .flatten()
        });
        if let Some(entry) = whole {
            return Some(TranslationResult {
                word,
                pattern: entry.pattern.clone(),
                language: entry.language.clone(),
                provenance: Provenance::Dictionary(entry.clone()),
            });
        }

        let result = decompose(&store, &word, preferred);
        if result.is_none() {
            log::debug!("translator: no match for {word:?}");
        }
        result
    }
}

/// Spell `word` out of single-character entries, or give up entirely.
fn decompose(store: &DictionaryStore, word: &str, preferred: &str) -> Option<TranslationResult> {
    let default = store.default_language();
    let mut parts = Vec::with_capacity(word.len());
    let mut all_preferred = true;

    for c in word.chars() {
        let key = c.to_string();
        let entry = match store.lookup(&key, Some(preferred)) {
            Some(entry) => entry,
            None if preferred != default => {
                all_preferred = false;
                store.lookup(&key, Some(default))?
            }
            None => return None,
        };
        parts.push(&entry.pattern);
    }

    let pattern = Pattern::concat(parts)?;
    let language = if all_preferred { preferred } else { default };
    Some(TranslationResult {
        word: word.to_string(),
        pattern,
        language: language.to_string(),
        provenance: Provenance::Decomposed,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{bundled_rows, PHILIPPINE, UEB};

    fn translator(rows: Vec<RawRow>) -> Translator {
        Translator::from_store(DictionaryStore::build(rows).0, UEB)
    }

    fn alphabet() -> Vec<RawRow> {
        vec![
            RawRow::new("a", "[[1]]", UEB),
            RawRow::new("b", "[[1,2]]", UEB),
            RawRow::new("x", "[[1,3,4,6]]", UEB),
            RawRow::new("y", "[[1,3,4,5,6]]", UEB),
            RawRow::new("z", "[[1,3,5,6]]", UEB),
            RawRow::new("done", "[[1,4,5],[1,3,4,5]]", UEB),
        ]
    }

    #[test]
    fn punctuation_and_case_are_ignored() {
        let t = translator(alphabet());
        let hit = t.translate("a.", UEB).expect("hit");
        assert_eq!(hit.word, "a");
        assert_eq!(hit.pattern.canonical_text(), "[[1]]");
        assert!(!hit.is_decomposed());
    }

    #[test]
    fn multi_cell_word_is_returned_unmodified() {
        let t = translator(alphabet());
        let hit = t.translate("Done!", UEB).expect("hit");
        assert_eq!(hit.pattern.canonical_text(), "[[1,4,5],[1,3,4,5]]");
        assert_eq!(hit.source_entry().unwrap().word, "done");
    }

    #[test]
    fn empty_after_normalisation_is_none() {
        let t = translator(alphabet());
        assert!(t.translate("", UEB).is_none());
        assert!(t.translate("...", UEB).is_none());
    }

    #[test]
    fn falls_back_to_default_language() {
        let mut rows = alphabet();
        rows.push(RawRow::new("a", "[[1]]", PHILIPPINE));
        let t = translator(rows);

        let hit = t.translate("done", PHILIPPINE).expect("fallback hit");
        assert_eq!(hit.language, UEB);
        assert!(!hit.is_decomposed());
    }

    #[test]
    fn preferred_language_wins_when_present() {
        let t = translator(vec![
            RawRow::new("x", "[[1,3,4,6]]", UEB),
            RawRow::new("x", "[[2]]", PHILIPPINE),
        ]);
        let hit = t.translate("x", PHILIPPINE).unwrap();
        assert_eq!(hit.language, PHILIPPINE);
        assert_eq!(hit.pattern.canonical_text(), "[[2]]");
    }

    #[test]
    fn unknown_word_is_spelled_out() {
        let t = translator(alphabet());
        let hit = t.translate("xyzzy", UEB).expect("decomposed");
        assert!(hit.is_decomposed());
        assert!(hit.source_entry().is_none());
        assert_eq!(
            hit.pattern.canonical_text(),
            "[[1,3,4,6],[1,3,4,5,6],[1,3,5,6],[1,3,5,6],[1,3,4,5,6]]"
        );
    }

    #[test]
    fn partial_decomposition_is_none() {
        let t = translator(alphabet());
        // `q` has no entry.
        assert!(t.translate("zaq", UEB).is_none());
    }

    #[test]
    fn decomposition_mixes_languages_through_default() {
        let t = translator(vec![
            RawRow::new("a", "[[1]]", UEB),
            RawRow::new("b", "[[1,2]]", UEB),
            RawRow::new("ñ", "[[1,2,4,5,6]]", PHILIPPINE),
        ]);
        let hit = t.translate("ñab", PHILIPPINE).expect("decomposed");
        assert_eq!(hit.pattern.canonical_text(), "[[1,2,4,5,6],[1],[1,2]]");
        assert_eq!(hit.language, UEB);

        // The default language alone cannot spell `ñ`.
        assert!(t.translate("ñab", UEB).is_none());
    }

    #[test]
    fn current_language_is_a_selector() {
        let mut t = translator(vec![
            RawRow::new("x", "[[1,3,4,6]]", UEB),
            RawRow::new("x", "[[2]]", PHILIPPINE),
        ]);
        assert_eq!(t.translate_current("x").unwrap().language, UEB);
        t.set_language(PHILIPPINE);
        assert_eq!(t.language(), PHILIPPINE);
        assert_eq!(t.translate_current("x").unwrap().language, PHILIPPINE);
    }

    #[test]
    fn language_selection_ignores_case() {
        let mut t = translator(vec![
            RawRow::new("x", "[[1,3,4,6]]", UEB),
            RawRow::new("x", "[[2]]", PHILIPPINE),
            RawRow::new("y", "[[1,3,4,5,6]]", PHILIPPINE),
        ]);
        t.set_language("philippine");
        assert_eq!(t.language(), PHILIPPINE);

        let hit = t.translate_current("x").unwrap();
        assert_eq!(hit.pattern.canonical_text(), "[[2]]");
        assert_eq!(hit.language, PHILIPPINE);

        let spelled = t.translate("xy", " PHILIPPINE ").unwrap();
        assert!(spelled.is_decomposed());
        assert_eq!(spelled.language, PHILIPPINE);
    }

    #[test]
    fn utterance_tries_words_in_order() {
        let t = translator(alphabet());
        let last = t.translate_utterance("a then done", WordChoice::Last).unwrap();
        assert_eq!(last.word, "done");

        // "then" spells with `t`, `h`, `e`, `n`; none present, so skipped.
        let first = t.translate_utterance("then a done", WordChoice::First).unwrap();
        assert_eq!(first.word, "a");
        assert!(t.translate_utterance("qqq", WordChoice::Last).is_none());
    }

    #[test]
    fn reload_replaces_dictionary() {
        let t = translator(alphabet());
        let clone = t.clone();
        let report = t.reload(vec![RawRow::new("q", "[[1,2,3,4,5]]", UEB)]);
        assert_eq!(report.loaded, 1);

        assert!(t.translate("a", UEB).is_none());
        // Clones share the same handle and see the new store too.
        assert!(clone.translate("q", UEB).is_some());
    }

    #[test]
    fn bundled_short_forms_and_digits() {
        let t = Translator::from_store(DictionaryStore::build(bundled_rows()).0, UEB);

        let about = t.translate("About", UEB).unwrap();
        assert_eq!(about.source_entry().unwrap().short_form.as_deref(), Some("ab"));
        assert_eq!(about.pattern.canonical_text(), "[[1],[1,2]]");

        let number = t.translate("2024", UEB).unwrap();
        assert!(number.is_decomposed());
        assert_eq!(number.pattern.len(), 4);
    }
}
