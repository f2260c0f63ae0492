use crate::traits::ClipboardProvider;
use crate::transfer::{TransferContent, TransferObject};
use anyhow::{anyhow, Result};
use arboard::Clipboard;
use std::sync::{Mutex, PoisonError};

/// Text-only provider for platforms without a native backend here.
/// No native vacate and no ignore marker.
///
/// On X11 and Wayland the content lives only as long as the process keeps a
/// clipboard handle, so one handle is kept open after first use.
pub struct ArboardClipboard {
    handle: Mutex<Option<Clipboard>>,
}

impl ArboardClipboard {
    pub fn new() -> Self {
        Self { handle: Mutex::new(None) }
    }

    fn with_clipboard<T>(&self, f: impl FnOnce(&mut Clipboard) -> Result<T>) -> Result<T> {
        let mut guard = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() {
            *guard = Some(Clipboard::new().map_err(|e| anyhow!("Failed to init clipboard: {}", e))?);
        }
        match guard.as_mut() {
            Some(clipboard) => f(clipboard),
            None => Err(anyhow!("Clipboard handle unavailable")),
        }
    }
}

impl Default for ArboardClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardProvider for ArboardClipboard {
    fn get_text(&self) -> Result<Option<String>> {
        self.with_clipboard(|clipboard| match clipboard.get_text() {
            Ok(text) => Ok(Some(text)),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(anyhow!("Failed to get text: {}", e)),
        })
    }

    fn get_data(&self, _format: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    fn set_transfer(&self, transfer: &TransferObject) -> Result<()> {
        if let TransferContent::Data { format, .. } = &transfer.content {
            return Err(anyhow!("Custom clipboard format {:?} is not supported here", format));
        }
        self.with_clipboard(|clipboard| match &transfer.content {
            TransferContent::Text(text) => clipboard
                .set_text(text.as_str())
                .map_err(|e| anyhow!("Failed to set text: {}", e)),
            _ => clipboard.clear().map_err(|e| anyhow!("Failed to clear clipboard: {}", e)),
        })
    }

    fn vacate(&self) -> Result<()> {
        Err(anyhow!("Native clipboard vacate is not available"))
    }

    fn set_empty(&self) -> Result<()> {
        self.with_clipboard(|clipboard| clipboard.clear().map_err(|e| anyhow!("Failed to clear clipboard: {}", e)))
    }

    fn supports_native_vacate(&self) -> bool {
        false
    }

    fn supports_ignore_marker(&self) -> bool {
        false
    }
}
