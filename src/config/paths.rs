//! Cross-platform application paths using the `dirs` crate.
//!
//! Config dir (settings + user dataset):
//!   Windows: %APPDATA%\braille-voice\
//!   macOS:   ~/Library/Application Support/braille-voice/
//!   Linux:   ~/.config/braille-voice/

use std::path::{Path, PathBuf};

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml` and `braille.csv`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Full path to the optional user dataset `braille.csv`.
    pub user_dataset_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "braille-voice";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);
        Self::in_dir(&config_dir)
    }

    /// Paths rooted at an explicit directory (useful for tests).
    pub fn in_dir(config_dir: &Path) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
            settings_file: config_dir.join("settings.toml"),
            user_dataset_file: config_dir.join("braille.csv"),
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
