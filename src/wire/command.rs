//! Display command framing.
//!
//! Every command is a short ASCII/UTF-8 text frame:
//!
//! | Prefix | Payload             | Meaning                         |
//! |--------|---------------------|---------------------------------|
//! | `O:`   | `[[1],[]]`          | render a pattern                |
//! | `N:`   | `[[],[]]`           | clear the display               |
//! | `P:`   | `cell,pin,value`    | raise (1) / lower (0) one pin   |
//!
//! Output patterns shorter than the two-cell window are padded with blank
//! cells.  Longer patterns are sent whole; the firmware does its own
//! windowing.  Use [`chunk_for_display`] to window on this side instead.
//!
//! Pin numbers in `P:` frames are **0-based** (0–5) while pattern dots are
//! 1-based (1–6).  The firmware expects exactly this.

use std::fmt;

use thiserror::Error;

use crate::braille::{parse_pattern_text, Cell, Pattern, ParseError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const OUTPUT_PREFIX: &str = "O:";
pub const CLEAR_PREFIX: &str = "N:";
pub const PIN_PREFIX: &str = "P:";

/// Cells shown at once by the display.
pub const DISPLAY_CELLS: usize = 2;

/// Pins per cell in firmware numbering (`0..PINS_PER_CELL`).
pub const PINS_PER_CELL: u8 = 6;

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// `O:` frame for `pattern`, padded to [`DISPLAY_CELLS`].
///
/// ```
/// use braille_voice::braille::parse_pattern_text;
/// use braille_voice::wire::encode_output_command;
///
/// let p = parse_pattern_text("[[1]]").unwrap();
/// assert_eq!(encode_output_command(&p), b"O:[[1],[]]");
/// ```
pub fn encode_output_command(pattern: &Pattern) -> Vec<u8> {
    let framed = pattern.padded_to(DISPLAY_CELLS);
    format!("{OUTPUT_PREFIX}{framed}").into_bytes()
}

/// `N:` frame that blanks both cells.
pub fn encode_clear_command() -> Vec<u8> {
    let blank = Pattern::single(Cell::EMPTY).padded_to(DISPLAY_CELLS);
    format!("{CLEAR_PREFIX}{blank}").into_bytes()
}

/// `P:` frame driving one pin directly.
///
/// `pin` is firmware numbering, `0..6`; dot `n` of a pattern is pin `n - 1`.
pub fn encode_pin_command(cell: u8, pin: u8, raised: bool) -> Vec<u8> {
    debug_assert!(pin < PINS_PER_CELL, "pin {pin} out of range 0..6");
    format!("{PIN_PREFIX}{cell},{pin},{}", u8::from(raised)).into_bytes()
}

/// Firmware pin number for a pattern dot (1–6 → 0–5).
pub fn pin_for_dot(dot: u8) -> u8 {
    debug_assert!((1..=PINS_PER_CELL).contains(&dot), "dot {dot} out of range 1..=6");
    dot - 1
}

/// Split `pattern` into display-sized windows of `cells` cells each.
///
/// The last window may be shorter; [`encode_output_command`] pads it.
pub fn chunk_for_display(pattern: &Pattern, cells: usize) -> Vec<Pattern> {
    pattern
        .cells()
        .chunks(cells.max(1))
        .filter_map(|chunk| Pattern::new(chunk.to_vec()))
        .collect()
}

// ---------------------------------------------------------------------------
// DisplayCommand
// ---------------------------------------------------------------------------

/// Errors decoding a received frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("frame is not valid UTF-8")]
    NotUtf8,

    #[error("unknown command prefix in {0:?}")]
    UnknownPrefix(String),

    #[error("bad output payload: {0}")]
    Output(#[from] ParseError),

    #[error("bad pin payload: {0:?}")]
    Pin(String),
}

/// A typed display command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCommand {
    Output(Pattern),
    Clear,
    Pin { cell: u8, pin: u8, raised: bool },
}

impl DisplayCommand {
    /// Wire bytes for this command.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            DisplayCommand::Output(pattern) => encode_output_command(pattern),
            DisplayCommand::Clear => encode_clear_command(),
            DisplayCommand::Pin { cell, pin, raised } => encode_pin_command(*cell, *pin, *raised),
        }
    }

    /// Parse a frame produced by [`encode`](Self::encode).
    ///
    /// Output payloads keep their padding: `O:[[1],[]]` decodes to a
    /// two-cell pattern.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let text = std::str::from_utf8(bytes).map_err(|_| DecodeError::NotUtf8)?;
        let text = text.trim_end_matches(&['\r', '\n'][..]);

        if let Some(payload) = text.strip_prefix(OUTPUT_PREFIX) {
            return Ok(DisplayCommand::Output(parse_pattern_text(payload)?));
        }
        if text.starts_with(CLEAR_PREFIX) {
            return Ok(DisplayCommand::Clear);
        }
        if let Some(payload) = text.strip_prefix(PIN_PREFIX) {
            return decode_pin(payload);
        }
        Err(DecodeError::UnknownPrefix(text.to_string()))
    }
}

fn decode_pin(payload: &str) -> Result<DisplayCommand, DecodeError> {
    let bad = || DecodeError::Pin(payload.to_string());
    let parts: Vec<u8> = payload
        .split(',')
        .map(|p| p.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .map_err(|_| bad())?;

    match parts[..] {
        [cell, pin, value @ (0 | 1)] if pin < PINS_PER_CELL => Ok(DisplayCommand::Pin {
            cell,
            pin,
            raised: value == 1,
        }),
        _ => Err(bad()),
    }
}

impl fmt::Display for DisplayCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.encode()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
