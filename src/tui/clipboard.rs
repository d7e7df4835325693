//! Clipboard access for copying summaries
//!
//! Behind a trait so the app can run (and be tested) where no system
//! clipboard exists, e.g. over SSH.

/// Clipboard failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    /// No clipboard could be opened
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),
    /// The copy itself failed
    #[error("Copy failed: {0}")]
    CopyFailed(String),
}

/// Something text can be copied into
pub trait ClipboardProvider {
    /// Replace the clipboard content
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard through arboard
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    /// Open the system clipboard
    pub fn open() -> Result<Self, ClipboardError> {
        arboard::Clipboard::new()
            .map(|inner| Self { inner })
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.inner
            .set_text(text)
            .map_err(|e| ClipboardError::CopyFailed(e.to_string()))
    }
}
