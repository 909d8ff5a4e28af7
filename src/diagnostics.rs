//! Display self-test sequences.
//!
//! * [`letter_sweep`]: one `O:` frame per single-character entry, so every
//!   letter and digit of a language can be felt in turn.
//! * [`pin_sweep`]: raises then lowers each pin of each cell with `P:`
//!   frames (pins numbered 0–5).

use crate::dictionary::DictionaryStore;
use crate::wire::{encode_output_command, encode_pin_command, PINS_PER_CELL};

/// `(character, frame)` for every single-character entry of `language`, in
/// dataset order.
pub fn letter_sweep(store: &DictionaryStore, language: &str) -> Vec<(String, Vec<u8>)> {
    store
        .all_entries(Some(language))
        .filter(|entry| entry.is_single_char())
        .map(|entry| (entry.word.clone(), encode_output_command(&entry.pattern)))
        .collect()
}

/// Raise-then-lower frames for every pin of `cells` display cells.
pub fn pin_sweep(cells: u8) -> Vec<Vec<u8>> {
    let mut frames = Vec::with_capacity(usize::from(cells) * usize::from(PINS_PER_CELL) * 2);
    for cell in 0..cells {
        for pin in 0..PINS_PER_CELL {
            frames.push(encode_pin_command(cell, pin, true));
            frames.push(encode_pin_command(cell, pin, false));
        }
    }
    frames
}
