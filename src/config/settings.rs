//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and handed to the
//! pipeline at startup.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::dictionary::DEFAULT_LANGUAGE;
use crate::translate::WordChoice;
use crate::wire::DISPLAY_CELLS;

// ---------------------------------------------------------------------------
// DictionaryConfig
// ---------------------------------------------------------------------------

/// Where the braille dictionary comes from and which language is active.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Delimited dataset file.  `None` uses the user dataset in the config
    /// directory when present, otherwise the bundled table.
    pub dataset_path: Option<PathBuf>,
    /// Primary namespace, searched first and used as the fallback.
    pub default_language: String,
    /// Language selected at startup.
    pub preferred_language: String,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            default_language: DEFAULT_LANGUAGE.into(),
            preferred_language: DEFAULT_LANGUAGE.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// DisplayConfig
// ---------------------------------------------------------------------------

/// Braille display link settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Byte-stream device node bound to the display (e.g. `/dev/rfcomm0`).
    /// `None` means dry run: frames are only logged.
    pub device_path: Option<PathBuf>,
    /// Cells on the display; used by the pin self-test.
    pub cells: u8,
    /// Send `N:` before every `O:` frame.
    pub clear_before_output: bool,
    /// Append a newline after every frame.
    pub newline_delimited: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            device_path: None,
            cells: DISPLAY_CELLS as u8,
            clear_before_output: false,
            newline_delimited: false,
        }
    }
}

// ---------------------------------------------------------------------------
// InputConfig
// ---------------------------------------------------------------------------

/// How recognised utterances are turned into a single word.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Which end of a multi-word utterance is tried first.
    pub word_choice: WordChoice,
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use braille_voice::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub dictionary: DictionaryConfig,
    pub display: DisplayConfig,
    pub input: InputConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Dataset file to load, if any: the configured path, else the user
    /// dataset in `paths` when it exists.  `None` means use the bundled table.
    pub fn dataset_file(&self, paths: &AppPaths) -> Option<PathBuf> {
        self.dictionary.dataset_path.clone().or_else(|| {
            paths
                .user_dataset_file
                .exists()
                .then(|| paths.user_dataset_file.clone())
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
