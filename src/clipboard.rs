//! Clipboard bridges for the `"+` and `"*` registers.

use crate::error::{Error, Result};
use crate::traits::Clipboard;

/// A clipboard that is never available.
///
/// Reads yield `None` and writes fail, so the register bank falls back to
/// its in-memory mirror. This is the default for engines built without a
/// clipboard.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn get(&self) -> Option<String> {
        None
    }

    fn set(&self, _text: &str) -> Result<()> {
        Err(Error::Clipboard("no clipboard configured".to_string()))
    }
}

/// The operating-system clipboard, via `arboard`.
///
/// A fresh handle is opened per access so a missing display server only
/// fails the individual read or write.
#[cfg(feature = "clipboard")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

#[cfg(feature = "clipboard")]
impl Clipboard for SystemClipboard {
    fn get(&self) -> Option<String> {
        match arboard::Clipboard::new().and_then(|mut cb| cb.get_text()) {
            Ok(text) => {
                log::debug!("Read {} chars from system clipboard", text.len());
                Some(text)
            }
            Err(e) => {
                log::debug!("System clipboard read failed: {}", e);
                None
            }
        }
    }

    fn set(&self, text: &str) -> Result<()> {
        arboard::Clipboard::new()
            .and_then(|mut cb| cb.set_text(text.to_string()))
            .map_err(|e| Error::Clipboard(e.to_string()))
    }
}
