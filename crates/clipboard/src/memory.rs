use crate::traits::ClipboardProvider;
use crate::transfer::{TransferContent, TransferObject};
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-process clipboard with the same semantics as the platform providers.
///
/// Other applications are simulated with the `set_external_*` methods and
/// platform failures with the `fail_*` switches.
pub struct MemoryClipboard {
    state: Mutex<MemoryState>,
    native_vacate: bool,
    ignore_marker: bool,
}

#[derive(Default)]
struct MemoryState {
    text: Option<String>,
    data: HashMap<String, Vec<u8>>,
    ignore_marker: Option<String>,
    // Left behind by `set_empty`, visible to clipboard observers.
    placeholder: bool,
    change_count: u64,
    vacate_calls: usize,
    set_empty_calls: usize,
    faults: Faults,
}

#[derive(Default, Clone, Copy)]
struct Faults {
    writes: bool,
    reads: bool,
    vacate: bool,
    set_empty: bool,
}

impl MemoryState {
    fn wipe(&mut self) {
        self.text = None;
        self.data.clear();
        self.ignore_marker = None;
        self.placeholder = false;
        self.change_count += 1;
    }
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            native_vacate: true,
            ignore_marker: true,
        }
    }

    /// Behaves like a platform with no native vacate primitive.
    pub fn without_native_vacate(mut self) -> Self {
        self.native_vacate = false;
        self
    }

    /// Behaves like a platform without clipboard-history ignore markers.
    pub fn without_ignore_marker(mut self) -> Self {
        self.ignore_marker = false;
        self
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Another application copies text.
    pub fn set_external_text(&self, text: &str) {
        let mut state = self.state();
        state.wipe();
        state.text = Some(text.to_string());
    }

    /// Another application copies binary data.
    pub fn set_external_data(&self, format: &str, bytes: &[u8]) {
        let mut state = self.state();
        state.wipe();
        state.data.insert(format.to_string(), bytes.to_vec());
    }

    pub fn text(&self) -> Option<String> {
        self.state().text.clone()
    }

    pub fn data(&self, format: &str) -> Option<Vec<u8>> {
        self.state().data.get(format).cloned()
    }

    pub fn ignore_marker(&self) -> Option<String> {
        self.state().ignore_marker.clone()
    }

    /// True when no content of any kind, placeholder included, is present.
    pub fn is_empty(&self) -> bool {
        let state = self.state();
        state.text.is_none() && state.data.is_empty() && state.ignore_marker.is_none() && !state.placeholder
    }

    pub fn has_placeholder(&self) -> bool {
        self.state().placeholder
    }

    pub fn change_count(&self) -> u64 {
        self.state().change_count
    }

    pub fn vacate_calls(&self) -> usize {
        self.state().vacate_calls
    }

    pub fn set_empty_calls(&self) -> usize {
        self.state().set_empty_calls
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state().faults.writes = fail;
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state().faults.reads = fail;
    }

    pub fn fail_vacate(&self, fail: bool) {
        self.state().faults.vacate = fail;
    }

    pub fn fail_set_empty(&self, fail: bool) {
        self.state().faults.set_empty = fail;
    }
}

impl Default for MemoryClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardProvider for MemoryClipboard {
    fn get_text(&self) -> Result<Option<String>> {
        let state = self.state();
        if state.faults.reads {
            return Err(anyhow!("Clipboard is locked by another process"));
        }
        Ok(state.text.clone())
    }

    fn get_data(&self, format: &str) -> Result<Option<Vec<u8>>> {
        let state = self.state();
        if state.faults.reads {
            return Err(anyhow!("Clipboard is locked by another process"));
        }
        Ok(state.data.get(format).cloned())
    }

    fn set_transfer(&self, transfer: &TransferObject) -> Result<()> {
        let mut state = self.state();
        if state.faults.writes {
            return Err(anyhow!("Failed to open clipboard for writing"));
        }
        state.wipe();
        match &transfer.content {
            TransferContent::Empty => {}
            TransferContent::Text(text) => state.text = Some(text.clone()),
            TransferContent::Data { format, bytes } => {
                state.data.insert(format.clone(), bytes.clone());
            }
        }
        if self.ignore_marker {
            state.ignore_marker = transfer.ignore_marker.clone();
        }
        Ok(())
    }

    fn vacate(&self) -> Result<()> {
        let mut state = self.state();
        state.vacate_calls += 1;
        if !self.native_vacate {
            return Err(anyhow!("Native vacate is not available"));
        }
        if state.faults.vacate {
            return Err(anyhow!("OpenClipboard failed"));
        }
        state.wipe();
        Ok(())
    }

    fn set_empty(&self) -> Result<()> {
        let mut state = self.state();
        state.set_empty_calls += 1;
        if state.faults.set_empty {
            return Err(anyhow!("Failed to set empty clipboard object"));
        }
        state.wipe();
        state.placeholder = true;
        Ok(())
    }

    fn supports_native_vacate(&self) -> bool {
        self.native_vacate
    }

    fn supports_ignore_marker(&self) -> bool {
        self.ignore_marker
    }
}
