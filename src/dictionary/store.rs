//! Immutable word → pattern store with per-language namespaces.
//!
//! [`DictionaryStore::build`] parses every row once; lookups afterwards are
//! hash-map hits and never touch the raw text again.  Bad rows are skipped
//! and reported in a [`BuildReport`] instead of failing the build.
//!
//! [`SharedDictionary`] is the reload point: a fresh store is built off to
//! the side and then published with a single `Arc` swap, so readers either
//! see the old store or the new one, never a half-built one.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::braille::{parse_pattern_text, ParseError};

use super::entry::{non_blank, normalize_key, DictionaryEntry, RawRow, DEFAULT_LANGUAGE};

// ---------------------------------------------------------------------------
// BuildReport
// ---------------------------------------------------------------------------

/// Why a row was left out of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The word column was blank.
    EmptyWord,
    /// The pattern column could not be parsed.
    Pattern(ParseError),
}

/// One rejected dataset row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: usize,
    pub word: String,
    pub reason: SkipReason,
}

/// Summary of a [`DictionaryStore::build`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Rows accepted (including ones that replaced an earlier duplicate).
    pub loaded: usize,
    /// Rows that replaced an earlier row with the same word and language.
    pub duplicates: usize,
    pub skipped: Vec<SkippedRow>,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Namespace
// ---------------------------------------------------------------------------

/// Entries of one language, kept in first-seen order for enumeration.
#[derive(Debug, Default)]
struct Namespace {
    /// Tag as first spelled in the dataset.
    name: String,
    entries: Vec<DictionaryEntry>,
    index: HashMap<String, usize>,
}

impl Namespace {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Insert or replace; returns `true` when an existing word was replaced.
    fn insert(&mut self, entry: DictionaryEntry) -> bool {
        match self.index.get(&entry.word) {
            Some(&i) => {
                self.entries[i] = entry;
                true
            }
            None => {
                self.index.insert(entry.word.clone(), self.entries.len());
                self.entries.push(entry);
                false
            }
        }
    }

    fn get(&self, key: &str) -> Option<&DictionaryEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }
}

// ---------------------------------------------------------------------------
// DictionaryStore
// ---------------------------------------------------------------------------

/// Language tags compare case-insensitively.
fn language_key(language: &str) -> String {
    language.trim().to_lowercase()
}

/// Read-only braille dictionary.
///
/// Namespaces are keyed by lower-cased tag; entries carry the spelling the
/// tag first had (the default language's spelling wins for that one).
#[derive(Debug)]
pub struct DictionaryStore {
    default_language: String,
    namespaces: HashMap<String, Namespace>,
    /// Search order over namespace keys: default first, then first seen.
    order: Vec<String>,
}

impl DictionaryStore {
    /// Build a store with [`DEFAULT_LANGUAGE`] as the primary namespace.
    pub fn build<I>(rows: I) -> (Self, BuildReport)
    where
        I: IntoIterator<Item = RawRow>,
    {
        Self::build_with_default(rows, DEFAULT_LANGUAGE)
    }

    /// Build a store from raw rows.
    ///
    /// Rows with a blank language go to `default_language`.  A repeated word
    /// within one language replaces the earlier row (last write wins).  Rows
    /// that fail to parse are logged, recorded in the report and skipped.
    pub fn build_with_default<I>(rows: I, default_language: &str) -> (Self, BuildReport)
    where
        I: IntoIterator<Item = RawRow>,
    {
        let default_language = default_language.trim().to_string();
        let mut store = Self {
            order: vec![language_key(&default_language)],
            default_language,
            namespaces: HashMap::new(),
        };
        let mut report = BuildReport::default();

        for row in rows {
            match store.entry_from_row(&row) {
                Ok(entry) => {
                    let replaced = store.insert(entry);
                    report.loaded += 1;
                    if replaced {
                        report.duplicates += 1;
                    }
                }
                Err(reason) => {
                    log::warn!(
                        "dictionary: skipping line {} ({:?}): {:?}",
                        row.line,
                        row.word,
                        reason
                    );
                    report.skipped.push(SkippedRow {
                        line: row.line,
                        word: row.word.clone(),
                        reason,
                    });
                }
            }
        }

        log::info!(
            "dictionary: {} entries in {} language(s), {} row(s) skipped",
            store.len(),
            store.namespaces.len(),
            report.skipped.len()
        );
        (store, report)
    }

    fn entry_from_row(&self, row: &RawRow) -> Result<DictionaryEntry, SkipReason> {
        let word = normalize_key(&row.word);
        if word.is_empty() {
            return Err(SkipReason::EmptyWord);
        }
        let pattern = parse_pattern_text(&row.pattern_text).map_err(SkipReason::Pattern)?;
        let language = match non_blank(&row.language) {
            Some(tag) => self
                .canonical_language(&tag)
                .map_or(tag.trim().to_string(), str::to_string),
            None => self.default_language.clone(),
        };

        Ok(DictionaryEntry {
            word,
            short_form: non_blank(&row.short_form),
            unicode_glyph: non_blank(&row.unicode_glyph),
            pattern,
            language,
        })
    }

    fn insert(&mut self, entry: DictionaryEntry) -> bool {
        let key = language_key(&entry.language);
        if !self.order.contains(&key) {
            self.order.push(key.clone());
        }
        self.namespaces
            .entry(key)
            .or_insert_with(|| Namespace::named(&entry.language))
            .insert(entry)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Exact-word lookup, case-insensitive and whitespace-trimmed.
    ///
    /// With `language` only that namespace is searched.  Without it the
    /// default namespace is tried first, then the others in a stable order.
    pub fn lookup(&self, word: &str, language: Option<&str>) -> Option<&DictionaryEntry> {
        let key = normalize_key(word);
        if key.is_empty() {
            return None;
        }
        match language {
            Some(lang) => self.namespaces.get(&language_key(lang))?.get(&key),
            None => self
                .order
                .iter()
                .filter_map(|lang| self.namespaces.get(lang))
                .find_map(|ns| ns.get(&key)),
        }
    }

    /// Enumerate entries of one language, or of every language in search
    /// order.  Restartable: each call yields a fresh iterator.
    pub fn all_entries<'a>(
        &'a self,
        language: Option<&'a str>,
    ) -> impl Iterator<Item = &'a DictionaryEntry> + 'a {
        self.order
            .iter()
            .filter(move |key| language.map_or(true, |l| language_key(l) == **key))
            .filter_map(|key| self.namespaces.get(key))
            .flat_map(|ns| ns.entries.iter())
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Languages that hold at least one entry, in search order.
    pub fn languages(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter_map(|key| self.namespaces.get(key))
            .map(|ns| ns.name.as_str())
            .collect()
    }

    pub fn has_language(&self, language: &str) -> bool {
        self.namespaces.contains_key(&language_key(language))
    }

    /// The store's spelling of `language`, matched case-insensitively.
    ///
    /// ```
    /// use braille_voice::dictionary::{bundled_rows, DictionaryStore};
    ///
    /// let (store, _) = DictionaryStore::build(bundled_rows());
    /// assert_eq!(store.canonical_language(" philippine "), Some("Philippine"));
    /// assert_eq!(store.canonical_language("Klingon"), None);
    /// ```
    pub fn canonical_language(&self, language: &str) -> Option<&str> {
        let key = language_key(language);
        if key == language_key(&self.default_language) {
            return Some(&self.default_language);
        }
        self.namespaces.get(&key).map(|ns| ns.name.as_str())
    }

    /// Total entries across all languages.
    pub fn len(&self) -> usize {
        self.namespaces.values().map(|ns| ns.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// SharedDictionary
// ---------------------------------------------------------------------------

/// Cloneable handle to the current store, swapped atomically on reload.
#[derive(Debug, Clone)]
pub struct SharedDictionary {
    current: Arc<RwLock<Arc<DictionaryStore>>>,
}

impl SharedDictionary {
    pub fn new(store: DictionaryStore) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(store))),
        }
    }

    /// The store as of now.  Holding the returned `Arc` pins that version
    /// even if a reload happens meanwhile.
    pub fn snapshot(&self) -> Arc<DictionaryStore> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Publish a fully built store, returning the one it replaced.
    pub fn replace(&self, store: DictionaryStore) -> Arc<DictionaryStore> {
        let fresh = Arc::new(store);
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *guard, fresh)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::dataset::bundled_rows;
    use crate::dictionary::entry::{PHILIPPINE, UEB};

    fn store(rows: Vec<RawRow>) -> DictionaryStore {
        DictionaryStore::build(rows).0
    }

    #[test]
    fn lookup_is_case_insensitive_and_trimmed() {
        let s = store(vec![RawRow::new("hello", "[[1,2,5],[1,5]]", UEB)]);
        let a = s.lookup("Hello", None).expect("hit");
        let b = s.lookup("hello", None).expect("hit");
        let c = s.lookup(" HELLO ", None).expect("hit");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn bad_rows_are_skipped_not_fatal() {
        let (s, report) = DictionaryStore::build(vec![
            RawRow::new("a", "[[1]]", UEB),
            RawRow::new("bad", "[[9]]", UEB),
            RawRow::new("junk", "oops", UEB),
            RawRow::new("  ", "[[1]]", UEB),
            RawRow::new("b", "[[1,2]]", UEB),
        ]);

        assert_eq!(s.len(), 2);
        assert_eq!(report.loaded, 2);
        assert_eq!(report.skipped.len(), 3);
        assert!(!report.is_clean());
        assert!(matches!(
            report.skipped[0].reason,
            SkipReason::Pattern(ParseError::InvalidDotValue(_))
        ));
        assert!(matches!(
            report.skipped[1].reason,
            SkipReason::Pattern(ParseError::Malformed(_))
        ));
        assert_eq!(report.skipped[2].reason, SkipReason::EmptyWord);
    }

    #[test]
    fn last_write_wins_within_language() {
        let (s, report) = DictionaryStore::build(vec![
            RawRow::new("a", "[[1]]", UEB),
            RawRow::new("A", "[[2]]", UEB),
        ]);
        assert_eq!(s.len(), 1);
        assert_eq!(report.duplicates, 1);
        assert_eq!(s.lookup("a", None).unwrap().pattern.canonical_text(), "[[2]]");
    }

    #[test]
    fn same_word_differs_across_languages() {
        let s = store(vec![
            RawRow::new("x", "[[1,3,4,6]]", UEB),
            RawRow::new("x", "[[1]]", PHILIPPINE),
        ]);
        assert_eq!(
            s.lookup("x", Some(PHILIPPINE)).unwrap().pattern.canonical_text(),
            "[[1]]"
        );
        // No language → default namespace wins.
        assert_eq!(s.lookup("x", None).unwrap().language, UEB);
    }

    #[test]
    fn explicit_language_does_not_fall_back() {
        let s = store(vec![RawRow::new("the", "[[2,3,4,6]]", UEB)]);
        assert!(s.lookup("the", Some(PHILIPPINE)).is_none());
        assert!(s.lookup("the", Some("Klingon")).is_none());
    }

    #[test]
    fn lookup_without_language_searches_all() {
        let s = store(vec![
            RawRow::new("a", "[[1]]", UEB),
            RawRow::new("ñ", "[[1,2,4,5,6]]", PHILIPPINE),
        ]);
        assert_eq!(s.lookup("Ñ", None).unwrap().language, PHILIPPINE);
    }

    #[test]
    fn blank_language_uses_default() {
        let s = store(vec![RawRow::new("a", "[[1]]", "")]);
        assert_eq!(s.lookup("a", Some(UEB)).unwrap().language, UEB);
    }

    #[test]
    fn language_tags_ignore_case() {
        let s = store(vec![
            RawRow::new("a", "[[1]]", "ueb"),
            RawRow::new("n", "[[1,3,4,5]]", PHILIPPINE),
            RawRow::new("ñ", "[[1,2,4,5,6]]", "PHILIPPINE"),
        ]);
        assert_eq!(s.languages(), vec![UEB, PHILIPPINE]);
        assert_eq!(s.lookup("a", Some(" Ueb ")).unwrap().language, UEB);
        assert_eq!(s.lookup("ñ", Some("philippine")).unwrap().language, PHILIPPINE);
        assert!(s.has_language("philippine"));
        assert_eq!(s.all_entries(Some("philippine")).count(), 2);
        assert_eq!(s.canonical_language("PHILIPPINE"), Some(PHILIPPINE));
        assert_eq!(s.canonical_language("Klingon"), None);
    }

    #[test]
    fn all_entries_is_ordered_and_filterable() {
        let s = store(vec![
            RawRow::new("n", "[[1]]", PHILIPPINE),
            RawRow::new("a", "[[1]]", UEB),
            RawRow::new("b", "[[1,2]]", UEB),
        ]);
        let ueb: Vec<&str> = s.all_entries(Some(UEB)).map(|e| e.word.as_str()).collect();
        assert_eq!(ueb, vec!["a", "b"]);

        let all: Vec<&str> = s.all_entries(None).map(|e| e.word.as_str()).collect();
        assert_eq!(all, vec!["a", "b", "n"]);
        assert_eq!(s.languages(), vec![UEB, PHILIPPINE]);
    }

    #[test]
    fn bundled_dataset_builds_cleanly() {
        let (s, report) = DictionaryStore::build(bundled_rows());
        assert!(report.is_clean(), "skipped: {:?}", report.skipped);
        // Shorthand rows in the bundled data are normalised.
        assert_eq!(s.lookup("c", Some(UEB)).unwrap().pattern.canonical_text(), "[[1,4]]");
        assert_eq!(s.lookup("e", Some(UEB)).unwrap().pattern.canonical_text(), "[[1,5]]");
        assert_eq!(s.lookup("k", Some(UEB)).unwrap().pattern.canonical_text(), "[[1,3]]");
        assert!(s.has_language(PHILIPPINE));
    }

    #[test]
    fn bundled_patterns_round_trip_through_canonical_text() {
        let (s, _) = DictionaryStore::build(bundled_rows());
        for entry in s.all_entries(None) {
            let text = entry.pattern.canonical_text();
            assert_eq!(parse_pattern_text(&text).unwrap(), entry.pattern, "{}", entry.word);
        }
    }

    #[test]
    fn replace_swaps_whole_store() {
        let shared = SharedDictionary::new(store(vec![RawRow::new("a", "[[1]]", UEB)]));
        let before = shared.snapshot();

        let old = shared.replace(store(vec![RawRow::new("b", "[[1,2]]", UEB)]));

        // The pinned snapshot still sees the old data.
        assert!(before.lookup("a", None).is_some());
        assert!(Arc::ptr_eq(&before, &old));

        let after = shared.snapshot();
        assert!(after.lookup("a", None).is_none());
        assert!(after.lookup("b", None).is_some());
    }
}
