//! Braille data model and the pattern-text parser.
//!
//! * [`Cell`] / [`Pattern`]: validated six-dot cells and cell sequences.
//! * [`parse_pattern_text`]: the single entry point that turns loose
//!   dataset text (`[1,2]`, `1,2`, `[[1,2`, …) into a [`Pattern`].
//!
//! # Quick start
//!
//! ```
//! use braille_voice::braille::parse_pattern_text;
//!
//! let pattern = parse_pattern_text("[[1,4,5],[1,3,4,5]]").unwrap();
//! assert_eq!(pattern.len(), 2);
//! assert_eq!(pattern.to_unicode(), "\u{2819}\u{281D}");
//! ```

pub mod parser;
pub mod pattern;

pub use parser::{parse_pattern_text, ParseError};
pub use pattern::{is_valid_dot, Cell, Pattern, MAX_DOT, MIN_DOT};
