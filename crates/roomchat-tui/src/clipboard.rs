//! Clipboard writes for room links.
//!
//! The system clipboard (arboard) decides success. When it is unavailable,
//! as over SSH, an OSC 52 escape is also written so terminals that honour it
//! still receive the link, but the copy is reported as failed and the caller
//! shows the link instead.

use std::io::{self, Write};

use arboard::Clipboard;
use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;

/// Clipboard errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// The platform clipboard refused the write.
    #[error("clipboard access failed: {0}")]
    AccessFailed(String),
}

/// Put `text` on the system clipboard, falling back to OSC 52 on `terminal`.
///
/// # Errors
///
/// Returns the system clipboard's refusal, also when the OSC 52 fallback was
/// written.
pub fn copy_text(text: &str, terminal: &mut impl Write) -> Result<(), ClipboardError> {
    copy_with(text, set_system_text, terminal)
}

/// Copy through `system`; on failure emit OSC 52 and return the failure.
pub(crate) fn copy_with<F>(
    text: &str,
    system: F,
    terminal: &mut impl Write,
) -> Result<(), ClipboardError>
where
    F: FnOnce(&str) -> Result<(), ClipboardError>,
{
    match system(text) {
        Ok(()) => Ok(()),
        Err(err) => {
            tracing::debug!(%err, "system clipboard unavailable, writing OSC 52");
            if let Err(io_err) = write_osc52(text, terminal) {
                tracing::debug!(%io_err, "OSC 52 write failed");
            }
            Err(err)
        },
    }
}

fn set_system_text(text: &str) -> Result<(), ClipboardError> {
    let mut clipboard =
        Clipboard::new().map_err(|e| ClipboardError::AccessFailed(e.to_string()))?;
    clipboard.set_text(text).map_err(|e| ClipboardError::AccessFailed(e.to_string()))
}

fn write_osc52(text: &str, out: &mut impl Write) -> io::Result<()> {
    write!(out, "\x1b]52;c;{}\x07", STANDARD.encode(text))?;
    out.flush()
}
