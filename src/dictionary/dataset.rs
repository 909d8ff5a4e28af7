//! Delimited dataset reader and the bundled dictionary table.
//!
//! Rows have five comma-separated columns:
//!
//! ```text
//! word,short_form,unicode_glyph,pattern,language
//! b,,⠃,"[[1,2]]",UEB
//! ```
//!
//! Fields containing commas are double-quoted (`""` escapes a literal quote).
//! Blank lines, `#` comment lines and a leading `word,…` header are ignored.
//! Short rows are padded with empty fields.  An unquoted pattern that spills
//! into extra fields is rejoined; otherwise pattern text is passed through
//! untouched so the parser can repair it.  A leading byte-order mark is
//! dropped.

use std::path::Path;

use thiserror::Error;

use super::entry::RawRow;

/// Compiled-in dataset used when no external file is configured.
static BUNDLED_DATASET: &str = include_str!("../../data/braille.csv");

const DELIMITER: char = ',';
const QUOTE: char = '"';
const BOM: char = '\u{feff}';
const COLUMNS: usize = 5;
const PATTERN_COLUMN: usize = 3;

/// Errors reading an external dataset file.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("cannot read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Rows of the compiled-in dataset.
pub fn bundled_rows() -> Vec<RawRow> {
    read_rows(BUNDLED_DATASET)
}

/// Read rows from a dataset file on disk.
pub fn load_rows(path: &Path) -> Result<Vec<RawRow>, DatasetError> {
    let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let rows = read_rows(&text);
    log::debug!("read {} dataset rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Split delimited text into raw rows.
pub fn read_rows(text: &str) -> Vec<RawRow> {
    let mut rows = Vec::new();
    let mut header_checked = false;

    let text = text.strip_prefix(BOM).unwrap_or(text);

    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let row = row_from_fields(idx + 1, split_fields(line));

        if !header_checked {
            header_checked = true;
            if row.word.trim().eq_ignore_ascii_case("word") {
                continue;
            }
        }
        rows.push(row);
    }

    rows
}

/// Map split fields onto the five columns.
///
/// An unquoted pattern spills its commas into extra fields.  Word, short
/// form and glyph never contain the delimiter, so everything after the
/// glyph is rejoined as the pattern, up to a trailing language tag.
fn row_from_fields(line: usize, mut fields: Vec<String>) -> RawRow {
    if fields.len() >= COLUMNS {
        let has_language = fields
            .last()
            .is_some_and(|last| !is_pattern_fragment(last));
        let language = if has_language { fields.pop() } else { None };
        if fields.len() > PATTERN_COLUMN + 1 {
            let pattern_text = fields.split_off(PATTERN_COLUMN).join(&DELIMITER.to_string());
            fields.push(pattern_text);
        }
        fields.push(language.unwrap_or_default());
    }

    let mut fields = fields.into_iter();
    let mut next = || fields.next().unwrap_or_default();
    RawRow {
        line,
        word: next(),
        short_form: next(),
        unicode_glyph: next(),
        pattern_text: next(),
        language: next(),
    }
}

/// Digits and brackets only: a piece of a split pattern, never a language.
fn is_pattern_fragment(field: &str) -> bool {
    let field = field.trim();
    !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '[' | ']' | ' '))
}

// ---------------------------------------------------------------------------
// Field splitting
// ---------------------------------------------------------------------------

/// Split one line on unquoted delimiters, removing CSV quoting.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            QUOTE if in_quotes && chars.peek() == Some(&QUOTE) => {
                field.push(QUOTE);
                chars.next();
            }
            QUOTE if in_quotes => in_quotes = false,
            QUOTE if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            DELIMITER if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);

    fields
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
