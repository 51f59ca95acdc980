//! Output delivery: hand the polished text to the user.
//!
//! Two modes are supported, selected by [`OutputConfig::mode`](crate::config::OutputConfig):
//!
//! | Mode                        | Effect                                              |
//! |-----------------------------|-----------------------------------------------------|
//! | [`DeliveryMode::Clipboard`] | text is left on the clipboard                       |
//! | [`DeliveryMode::Paste`]     | text is pasted into the focused window, then the    |
//! |                             | previous clipboard content is put back              |
//!
//! Pasting goes through the clipboard rather than synthesised key strokes so
//! that combining characters and IME-only scripts arrive intact.
//!
//! # Usage
//!
//! ```no_run
//! use voice_polish::inject::{DeliveryMode, TextInjector};
//!
//! TextInjector::new()
//!     .deliver("Meeting moved to four.", DeliveryMode::Paste)
//!     .expect("delivery failed");
//! ```

pub mod clipboard;
pub mod keyboard;

pub use clipboard::ClipboardSnapshot;
pub use keyboard::send_paste_shortcut;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// DeliveryMode
// ---------------------------------------------------------------------------

/// How polished text reaches the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Copy to the clipboard only.
    #[default]
    Clipboard,
    /// Paste into the focused window, restoring the clipboard afterwards.
    Paste,
}

// ---------------------------------------------------------------------------
// InjectError / Delivery
// ---------------------------------------------------------------------------

/// Errors that can surface while delivering text.
#[derive(Debug, Error)]
pub enum InjectError {
    /// Could not open or read the system clipboard.
    #[error("cannot access clipboard: {0}")]
    ClipboardAccess(String),

    /// Could not write text to the system clipboard.
    #[error("cannot set clipboard text: {0}")]
    ClipboardSet(String),

    /// Could not simulate the paste shortcut.
    #[error("cannot simulate key press: {0}")]
    KeySimulation(String),
}

/// What [`TextInjector::deliver`] actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The text was blank; nothing was touched.
    Nothing,
    /// The text is on the clipboard.
    Copied,
    /// The text was pasted into the focused window.
    Pasted,
}

// ---------------------------------------------------------------------------
// TextInjector
// ---------------------------------------------------------------------------

/// Delivers text to the clipboard or the focused window.
///
/// The delays exist because clipboard managers and target applications read
/// the clipboard asynchronously; tune them on slow systems.
#[derive(Debug, Clone)]
pub struct TextInjector {
    /// Wait after writing the clipboard, before sending the paste shortcut.
    pub settle_delay: Duration,
    /// Wait after the paste shortcut, before restoring the old clipboard.
    pub restore_delay: Duration,
}

impl Default for TextInjector {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(50),
            restore_delay: Duration::from_millis(150),
        }
    }
}

impl TextInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `text` according to `mode`.
    ///
    /// Blank text is never delivered and returns [`Delivery::Nothing`]
    /// without opening the clipboard.  This call blocks for the configured
    /// delays; from async code run it on `spawn_blocking`.
    pub fn deliver(&self, text: &str, mode: DeliveryMode) -> Result<Delivery, InjectError> {
        if text.trim().is_empty() {
            log::debug!("inject: nothing to deliver");
            return Ok(Delivery::Nothing);
        }

        match mode {
            DeliveryMode::Clipboard => {
                clipboard::write_text(text)?;
                log::info!("inject: copied {} chars to clipboard", text.chars().count());
                Ok(Delivery::Copied)
            }
            DeliveryMode::Paste => {
                let snapshot = ClipboardSnapshot::take()?;
                clipboard::write_text(text)?;
                std::thread::sleep(self.settle_delay);

                let pasted = send_paste_shortcut();
                std::thread::sleep(self.restore_delay);

                // Restore even when the shortcut failed so the user's
                // clipboard is not left holding our text.
                if let Err(e) = snapshot.restore() {
                    log::warn!("inject: clipboard restore failed: {e}");
                }
                pasted?;
                log::info!("inject: pasted {} chars", text.chars().count());
                Ok(Delivery::Pasted)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_clipboard() {
        assert_eq!(DeliveryMode::default(), DeliveryMode::Clipboard);
    }

    #[test]
    fn mode_serialises_lowercase() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            mode: DeliveryMode,
        }

        let toml_str = toml::to_string(&Wrapper {
            mode: DeliveryMode::Paste,
        })
        .unwrap();
        assert_eq!(toml_str.trim(), r#"mode = "paste""#);

        let parsed: Wrapper = toml::from_str(r#"mode = "clipboard""#).unwrap();
        assert_eq!(parsed.mode, DeliveryMode::Clipboard);
    }

    /// Blank input returns before any clipboard access, so this runs headless.
    #[test]
    fn blank_text_is_not_delivered() {
        let injector = TextInjector::new();
        for text in ["", "   ", "\n"] {
            assert_eq!(
                injector.deliver(text, DeliveryMode::Paste).unwrap(),
                Delivery::Nothing
            );
            assert_eq!(
                injector.deliver(text, DeliveryMode::Clipboard).unwrap(),
                Delivery::Nothing
            );
        }
    }

    #[test]
    fn default_delays() {
        let injector = TextInjector::default();
        assert_eq!(injector.settle_delay, Duration::from_millis(50));
        assert_eq!(injector.restore_delay, Duration::from_millis(150));
    }
}
