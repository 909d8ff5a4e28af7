//! Display wire protocol and transports.
//!
//! # Architecture
//!
//! ```text
//! Pattern ──encode_output_command──▶ b"O:[[1],[]]" ──DisplayTransport::send──▶ device
//!         encode_clear_command  ───▶ b"N:[[],[]]"
//!         encode_pin_command    ───▶ b"P:0,3,1"
//! ```
//!
//! Encoding is pure and infallible; only the transport can fail.

pub mod command;
pub mod transport;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use command::{
    chunk_for_display, encode_clear_command, encode_output_command, encode_pin_command,
    pin_for_dot, DecodeError, DisplayCommand, CLEAR_PREFIX, DISPLAY_CELLS, OUTPUT_PREFIX,
    PINS_PER_CELL, PIN_PREFIX,
};
pub use transport::{
    DeviceTransport, DisplayTransport, LogTransport, MemoryTransport, TransportError,
};
