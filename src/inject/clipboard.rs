//! Clipboard access backed by the `arboard` crate.
//!
//! Every call opens a short-lived [`arboard::Clipboard`]; the handle is not
//! `Send` on every platform.

use arboard::Clipboard;

use super::InjectError;

/// Plain-text clipboard content captured before a paste.
///
/// `None` when the clipboard was empty or held non-text data; restoring such
/// a snapshot leaves the clipboard alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardSnapshot(Option<String>);

impl ClipboardSnapshot {
    /// Read the current clipboard text.
    pub fn take() -> Result<Self, InjectError> {
        let mut clipboard = open()?;
        Ok(Self(clipboard.get_text().ok()))
    }

    /// The captured text, if any.
    pub fn text(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Put the captured text back.
    pub fn restore(self) -> Result<(), InjectError> {
        match self.0 {
            Some(text) => write_text(&text),
            None => Ok(()),
        }
    }
}

/// Replace the clipboard content with `text`.
pub fn write_text(text: &str) -> Result<(), InjectError> {
    open()?
        .set_text(text)
        .map_err(|e| InjectError::ClipboardSet(e.to_string()))
}

fn open() -> Result<Clipboard, InjectError> {
    Clipboard::new().map_err(|e| InjectError::ClipboardAccess(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_restores_without_clipboard_access() {
        let snapshot = ClipboardSnapshot(None);
        assert!(snapshot.text().is_none());
        assert!(snapshot.restore().is_ok());
    }
}
