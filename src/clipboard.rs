use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard write failed: {0}")]
    Write(String),
}

/// Where copied card text goes. The board holds one of these so tests can
/// record copies without a display server.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The desktop clipboard. A fresh handle is opened per copy, so a missing
/// display only fails the copy that needed it.
#[derive(Debug, Default)]
pub struct SystemClipboard;

#[cfg(not(target_os = "android"))]
impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        tracing::debug!(chars = text.chars().count(), "copying to system clipboard");
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|error| ClipboardError::Unavailable(error.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|error| ClipboardError::Write(error.to_string()))
    }
}

#[cfg(target_os = "android")]
impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable(
            "not supported on this platform".to_string(),
        ))
    }
}
