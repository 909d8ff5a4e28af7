//! Braille dictionary: entries, dataset loading and the lookup store.
//!
//! This module provides:
//! * [`DictionaryEntry`] / [`RawRow`]: validated and raw dataset rows.
//! * [`read_rows`], [`load_rows`], [`bundled_rows`]: delimited-text readers.
//! * [`DictionaryStore`]: immutable per-language word → pattern map.
//! * [`SharedDictionary`]: reload handle with atomic store swap.
//!
//! # Quick start
//!
//! ```
//! use braille_voice::dictionary::{bundled_rows, DictionaryStore};
//!
//! let (store, report) = DictionaryStore::build(bundled_rows());
//! assert!(report.is_clean());
//!
//! let entry = store.lookup("Braille", None).unwrap();
//! assert_eq!(entry.short_form.as_deref(), Some("brl"));
//! ```

pub mod dataset;
pub mod entry;
pub mod store;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use dataset::{bundled_rows, load_rows, read_rows, DatasetError};
pub use entry::{normalize_key, DictionaryEntry, RawRow, DEFAULT_LANGUAGE, PHILIPPINE, UEB};
pub use store::{BuildReport, DictionaryStore, SharedDictionary, SkipReason, SkippedRow};
