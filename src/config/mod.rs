//! Configuration module for braille-voice.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the
//! dictionary, display and input, `AppPaths` for cross-platform directories,
//! and TOML persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, DictionaryConfig, DisplayConfig, InputConfig};
