//! Byte transports that carry encoded commands to a braille display.
//!
//! [`DisplayTransport`] is the seam between the synchronous core and the
//! outside world.  Implementations:
//!
//! * [`DeviceTransport`]: writes frames to a byte-stream device node
//!   (e.g. a serial/RFCOMM port bound to the display).
//! * [`LogTransport`]: dry run; frames are only logged.
//! * [`MemoryTransport`]: records frames for tests and diagnostics.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use super::command::{DecodeError, DisplayCommand};

// ---------------------------------------------------------------------------
// TransportError
// ---------------------------------------------------------------------------

/// Errors delivering a frame.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The device node could not be opened.
    #[error("cannot open display device {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing or flushing the frame failed.
    #[error("display write failed: {0}")]
    Write(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// DisplayTransport trait
// ---------------------------------------------------------------------------

/// Async sink for encoded display frames.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn DisplayTransport>`.
#[async_trait]
pub trait DisplayTransport: Send + Sync {
    /// Deliver one complete frame.
    async fn send(&self, frame: &[u8]) -> Result<(), TransportError>;
}

// ---------------------------------------------------------------------------
// DeviceTransport
// ---------------------------------------------------------------------------

/// Writes frames to a device node or file.
pub struct DeviceTransport {
    path: PathBuf,
    file: tokio::sync::Mutex<tokio::fs::File>,
    terminator: Option<u8>,
}

impl DeviceTransport {
    /// Open an existing `path` for appending.  Frames are written back to
    /// back.  A missing path is an error; it is never created.
    pub async fn open(path: &Path) -> Result<Self, TransportError> {
        let file = tokio::fs::OpenOptions::new()
            .append(true)
            .open(path)
            .await
            .map_err(|source| TransportError::Open {
                path: path.display().to_string(),
                source,
            })?;
        log::info!("display: opened {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            file: tokio::sync::Mutex::new(file),
            terminator: None,
        })
    }

    /// Append `byte` after each frame (for links that need a delimiter).
    pub fn with_terminator(mut self, byte: Option<u8>) -> Self {
        self.terminator = byte;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DisplayTransport for DeviceTransport {
    async fn send(&self, frame: &[u8]) -> Result<(), TransportError> {
        let mut file = self.file.lock().await;
        file.write_all(frame).await?;
        if let Some(byte) = self.terminator {
            file.write_all(&[byte]).await?;
        }
        file.flush().await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LogTransport
// ---------------------------------------------------------------------------

/// Dry-run transport used when no device is configured.
#[derive(Debug, Default)]
pub struct LogTransport;

#[async_trait]
impl DisplayTransport for LogTransport {
    async fn send(&self, frame: &[u8]) -> Result<(), TransportError> {
        log::info!("display (dry run): {}", String::from_utf8_lossy(frame));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryTransport
// ---------------------------------------------------------------------------

/// Keeps every frame in memory.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    frames: Mutex<Vec<Vec<u8>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// All frames sent so far.
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Frames as text, for readable assertions.
    pub fn frames_as_text(&self) -> Vec<String> {
        self.frames()
            .iter()
            .map(|f| String::from_utf8_lossy(f).into_owned())
            .collect()
    }

    /// Frames decoded back into commands.
    pub fn commands(&self) -> Result<Vec<DisplayCommand>, DecodeError> {
        self.frames()
            .iter()
            .map(|f| DisplayCommand::decode(f))
            .collect()
    }
}

#[async_trait]
impl DisplayTransport for MemoryTransport {
    async fn send(&self, frame: &[u8]) -> Result<(), TransportError> {
        self.frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(frame.to_vec());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
