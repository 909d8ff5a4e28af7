//! Braille cell and pattern model.
//!
//! A [`Cell`] is a set of raised dots drawn from the standard six-dot
//! numbering:
//!
//! ```text
//! +---+---+
//! | 1 | 4 |
//! +---+---+
//! | 2 | 5 |
//! +---+---+
//! | 3 | 6 |
//! +---+---+
//! ```
//!
//! Internally a cell is a bitmask where dot `n` is bit `n - 1`.  This is the
//! same layout as the Unicode braille block, so rendering a glyph is a single
//! addition to `U+2800`.
//!
//! A [`Pattern`] is an ordered, non-empty sequence of cells.  Both types can
//! only be built from valid dots, so any `Pattern` that exists satisfies the
//! dot-range invariant.

use std::fmt;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lowest valid dot position.
pub const MIN_DOT: u8 = 1;

/// Highest valid dot position.
pub const MAX_DOT: u8 = 6;

/// First codepoint of the Unicode braille block (the blank cell).
const BRAILLE_BLANK: u32 = 0x2800;

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// One six-dot braille cell.  The empty cell is a valid blank/spacer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell(u8);

impl Cell {
    /// The blank cell (no dots raised).
    pub const EMPTY: Cell = Cell(0);

    /// Build a cell from dot positions.
    ///
    /// Duplicate dots collapse.  Returns `None` when any dot lies outside
    /// `1..=6`.
    ///
    /// ```
    /// use braille_voice::braille::Cell;
    ///
    /// let cell = Cell::from_dots([1, 2, 2]).unwrap();
    /// assert_eq!(cell.dots().collect::<Vec<_>>(), vec![1, 2]);
    /// assert!(Cell::from_dots([7]).is_none());
    /// ```
    pub fn from_dots<I>(dots: I) -> Option<Self>
    where
        I: IntoIterator<Item = u8>,
    {
        let mut bits = 0u8;
        for dot in dots {
            if !is_valid_dot(dot) {
                return None;
            }
            bits |= 1 << (dot - 1);
        }
        Some(Cell(bits))
    }

    /// Raised dots in ascending order.
    pub fn dots(&self) -> impl Iterator<Item = u8> + '_ {
        (MIN_DOT..=MAX_DOT).filter(move |&d| self.contains(d))
    }

    /// `true` if `dot` is raised in this cell.
    pub fn contains(&self, dot: u8) -> bool {
        is_valid_dot(dot) && self.0 & (1 << (dot - 1)) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Raw bitmask (dot `n` → bit `n - 1`).
    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Unicode braille glyph for this cell.
    pub fn to_unicode(&self) -> char {
        char::from_u32(BRAILLE_BLANK + u32::from(self.0)).unwrap_or(' ')
    }
}

impl fmt::Display for Cell {
    /// Canonical text form, e.g. `[1,2]` or `[]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, dot) in self.dots().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{dot}")?;
        }
        f.write_str("]")
    }
}

/// `true` if `dot` is a legal dot position.
#[inline]
pub fn is_valid_dot(dot: u8) -> bool {
    (MIN_DOT..=MAX_DOT).contains(&dot)
}

// ---------------------------------------------------------------------------
// Pattern
// ---------------------------------------------------------------------------

/// An ordered, non-empty sequence of braille cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    cells: Vec<Cell>,
}

impl Pattern {
    /// Build a pattern from cells.  Returns `None` for an empty sequence.
    pub fn new(cells: Vec<Cell>) -> Option<Self> {
        if cells.is_empty() {
            None
        } else {
            Some(Self { cells })
        }
    }

    /// One-cell pattern.
    pub fn single(cell: Cell) -> Self {
        Self { cells: vec![cell] }
    }

    /// Join patterns end to end.  Returns `None` when `parts` is empty.
    pub fn concat<'a, I>(parts: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Pattern>,
    {
        let cells: Vec<Cell> = parts
            .into_iter()
            .flat_map(|p| p.cells.iter().copied())
            .collect();
        Self::new(cells)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Copy of this pattern right-padded with blank cells up to `width`.
    ///
    /// Patterns already at least `width` cells long are returned unchanged.
    pub fn padded_to(&self, width: usize) -> Self {
        let mut cells = self.cells.clone();
        if cells.len() < width {
            cells.resize(width, Cell::EMPTY);
        }
        Self { cells }
    }

    /// Canonical text form: two-level bracketed list with no whitespace,
    /// e.g. `[[1,2],[]]`.
    pub fn canonical_text(&self) -> String {
        self.to_string()
    }

    /// Unicode braille rendering, one codepoint per cell.
    ///
    /// ```
    /// use braille_voice::braille::{Cell, Pattern};
    ///
    /// let p = Pattern::new(vec![Cell::from_dots([1]).unwrap(), Cell::EMPTY]).unwrap();
    /// assert_eq!(p.to_unicode(), "\u{2801}\u{2800}");
    /// ```
    pub fn to_unicode(&self) -> String {
        self.cells.iter().map(Cell::to_unicode).collect()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{cell}")?;
        }
        f.write_str("]")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
