//! Pattern text parser and repair engine.
//!
//! Dataset exports carry pattern fields in several loose shapes.  All of
//! them funnel through [`parse_pattern_text`]:
//!
//! | Input          | Treated as   |
//! |----------------|--------------|
//! | `[[1,2],[3]]`  | as written   |
//! | `"[[1,2]]"`    | quotes stripped |
//! | `1,2,3`        | `[[1,2,3]]`  |
//! | `[1,2,3]`      | `[[1,2,3]]`  |
//! | `[[1,2`        | `[[1,2]]`    |
//! | `[[1,2]`       | `[[1,2]]`    |
//! | `05`           | `[[5]]`      |
//!
//! The function is pure: the same input always gives the same pattern or the
//! same error kind.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use super::pattern::{is_valid_dot, Cell, Pattern};

// ---------------------------------------------------------------------------
// ParseError
// ---------------------------------------------------------------------------

/// Why a pattern field could not be turned into a [`Pattern`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The text could not be repaired into a two-level integer list.
    #[error("malformed pattern text: {0:?}")]
    Malformed(String),

    /// A leaf value parsed but is not an integer in `1..=6`.
    #[error("dot value {0} is outside 1..=6")]
    InvalidDotValue(String),
}

// ---------------------------------------------------------------------------
// Shorthand detection
// ---------------------------------------------------------------------------

/// `1,2,3`, no brackets at all.
static BARE_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(\s*,\s*\d+)*$").expect("static regex"));

/// `[1,2,3]`, exactly one bracket level.
static SINGLE_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[\s*\d+(\s*,\s*\d+)*\s*\]$").expect("static regex"));

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse one raw pattern field into a canonical [`Pattern`].
///
/// # Errors
///
/// * [`ParseError::InvalidDotValue`] when a numeric leaf is not in `1..=6`.
/// * [`ParseError::Malformed`] for anything that cannot be repaired.
///
/// ```
/// use braille_voice::braille::{parse_pattern_text, ParseError};
///
/// assert_eq!(parse_pattern_text("[1,2]").unwrap().canonical_text(), "[[1,2]]");
/// assert_eq!(parse_pattern_text("[[1,2").unwrap().canonical_text(), "[[1,2]]");
/// assert!(matches!(parse_pattern_text("[[7]]"), Err(ParseError::InvalidDotValue(_))));
/// ```
pub fn parse_pattern_text(raw: &str) -> Result<Pattern, ParseError> {
    let text = strip_quotes(raw.trim());
    let repaired = repair(text);

    match serde_json::from_str::<Value>(&repaired) {
        Ok(value) => pattern_from_value(value, raw),
        Err(_) => salvage_digits(text).unwrap_or_else(|| Err(malformed(raw))),
    }
}

// ---------------------------------------------------------------------------
// Repair steps
// ---------------------------------------------------------------------------

/// Remove one layer of matching surrounding quotes.
fn strip_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return text[1..text.len() - 1].trim();
        }
    }
    text
}

/// Rewrite shorthand and truncated forms into a two-level list literal.
fn repair(text: &str) -> String {
    if BARE_LIST.is_match(text) {
        return format!("[[{text}]]");
    }
    if SINGLE_LIST.is_match(text) {
        return format!("[{text}]");
    }
    if text.starts_with('[') {
        let depth = bracket_depth(text);
        if depth > 0 {
            // `[[1,2],` loses its dangling separator before closing.
            let mut closed = text.trim_end().trim_end_matches(',').to_string();
            closed.extend(std::iter::repeat(']').take(depth));
            return closed;
        }
    }
    text.to_string()
}

/// Number of `[` still open at the end of `text`.
fn bracket_depth(text: &str) -> usize {
    let opens = text.chars().filter(|&c| c == '[').count();
    let closes = text.chars().filter(|&c| c == ']').count();
    opens.saturating_sub(closes)
}

/// Last-chance rescue for a field that is nothing but digits, e.g. `05`.
fn salvage_digits(text: &str) -> Option<Result<Pattern, ParseError>> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let value = text.parse::<u64>().ok()?;
    Some(dot_from_u64(value).map(|dot| {
        Pattern::single(Cell::from_dots([dot]).unwrap_or(Cell::EMPTY))
    }))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn pattern_from_value(value: Value, raw: &str) -> Result<Pattern, ParseError> {
    let Value::Array(items) = value else {
        return Err(malformed(raw));
    };
    if items.is_empty() {
        return Err(malformed(raw));
    }

    // A flat list that slipped past the shorthand check is still one cell.
    let rows = if items[0].is_array() {
        items
    } else {
        vec![Value::Array(items)]
    };

    let mut cells = Vec::with_capacity(rows.len());
    for row in rows {
        let Value::Array(leaves) = row else {
            return Err(malformed(raw));
        };
        let mut dots = Vec::with_capacity(leaves.len());
        for leaf in &leaves {
            dots.push(dot_from_leaf(leaf, raw)?);
        }
        // Every dot has already been range-checked.
        cells.push(Cell::from_dots(dots).ok_or_else(|| malformed(raw))?);
    }

    Pattern::new(cells).ok_or_else(|| malformed(raw))
}

fn dot_from_leaf(leaf: &Value, raw: &str) -> Result<u8, ParseError> {
    match leaf {
        Value::Number(n) => match n.as_u64() {
            Some(v) => dot_from_u64(v),
            None => Err(ParseError::InvalidDotValue(n.to_string())),
        },
        _ => Err(malformed(raw)),
    }
}

fn dot_from_u64(value: u64) -> Result<u8, ParseError> {
    u8::try_from(value)
        .ok()
        .filter(|&d| is_valid_dot(d))
        .ok_or_else(|| ParseError::InvalidDotValue(value.to_string()))
}

fn malformed(raw: &str) -> ParseError {
    ParseError::Malformed(raw.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn text(raw: &str) -> String {
        parse_pattern_text(raw)
            .unwrap_or_else(|e| panic!("{raw:?} should parse: {e}"))
            .canonical_text()
    }

    // --- Well-formed input ---------------------------------------------------

    #[test]
    fn double_nested_is_kept_as_is() {
        assert_eq!(text("[[1,2],[3,4]]"), "[[1,2],[3,4]]");
        assert_eq!(text("[[1,4,5],[1,3,4,5]]"), "[[1,4,5],[1,3,4,5]]");
    }

    #[test]
    fn whitespace_is_tolerated() {
        assert_eq!(text("  [[ 1 , 2 ], [ 3 ]]  "), "[[1,2],[3]]");
    }

    #[test]
    fn blank_cells_survive() {
        assert_eq!(text("[[1],[]]"), "[[1],[]]");
        assert_eq!(text("[[]]"), "[[]]");
    }

    // --- Shorthand -----------------------------------------------------------

    #[test]
    fn single_list_is_one_cell() {
        assert_eq!(
            parse_pattern_text("[1,2,3]").unwrap(),
            parse_pattern_text("[[1,2,3]]").unwrap()
        );
    }

    #[test]
    fn bare_list_is_one_cell() {
        assert_eq!(text("1,2,3"), "[[1,2,3]]");
        assert_eq!(text("1, 4"), "[[1,4]]");
    }

    #[test]
    fn quoted_fields_are_unwrapped() {
        assert_eq!(text("\"[[1,2]]\""), "[[1,2]]");
        assert_eq!(text("'1,2'"), "[[1,2]]");
    }

    #[test]
    fn only_one_quote_layer_is_stripped() {
        assert!(matches!(
            parse_pattern_text("\"\"[[1]]\"\""),
            Err(ParseError::Malformed(_))
        ));
    }

    // --- Truncation ----------------------------------------------------------

    #[test]
    fn unterminated_double_list_is_closed() {
        assert_eq!(text("[[1,2"), "[[1,2]]");
    }

    #[test]
    fn half_terminated_double_list_is_closed() {
        assert_eq!(text("[[1,2]"), "[[1,2]]");
        assert_eq!(text("[[1,2],[3]"), "[[1,2],[3]]");
    }

    #[test]
    fn dangling_separator_is_dropped() {
        assert_eq!(text("[[1,2],"), "[[1,2]]");
    }

    // --- Salvage -------------------------------------------------------------

    #[test]
    fn bare_digit_is_single_dot() {
        assert_eq!(text("5"), "[[5]]");
    }

    #[test]
    fn leading_zero_digit_is_salvaged() {
        // `[[05]]` is not valid JSON; the raw digits still name one dot.
        assert_eq!(text("05"), "[[5]]");
    }

    #[test]
    fn salvaged_digit_is_range_checked() {
        assert!(matches!(
            parse_pattern_text("09"),
            Err(ParseError::InvalidDotValue(_))
        ));
    }

    // --- Errors --------------------------------------------------------------

    #[test]
    fn out_of_range_dot_is_rejected() {
        assert_eq!(
            parse_pattern_text("[[7]]"),
            Err(ParseError::InvalidDotValue("7".into()))
        );
        assert!(matches!(
            parse_pattern_text("[[0,1]]"),
            Err(ParseError::InvalidDotValue(_))
        ));
        assert!(matches!(
            parse_pattern_text("[[-1]]"),
            Err(ParseError::InvalidDotValue(_))
        ));
        assert!(matches!(
            parse_pattern_text("[[1.5]]"),
            Err(ParseError::InvalidDotValue(_))
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        for raw in ["", "abc", "[]", "[[1],2]", "[[[1]]]", "[[\"1\"]]", "{}", "1;2"] {
            assert!(
                matches!(parse_pattern_text(raw), Err(ParseError::Malformed(_))),
                "{raw:?} should be malformed"
            );
        }
    }

    #[test]
    fn parsing_is_deterministic() {
        for raw in ["[[1,2", "[7]", "x", "3"] {
            assert_eq!(parse_pattern_text(raw), parse_pattern_text(raw));
        }
    }

    #[test]
    fn canonical_text_round_trips() {
        for raw in ["[[1]]", "[[1,2],[]]", "[[3,4,5,6],[1]]", "[[1,2,3,4,5,6]]"] {
            let p = parse_pattern_text(raw).unwrap();
            assert_eq!(parse_pattern_text(&p.canonical_text()).unwrap(), p);
        }
    }
}
