use crate::transfer::TransferObject;
use anyhow::Result;

/// Access to one clipboard. Every method makes a single attempt and
/// reports platform failures as errors; callers decide what to absorb.
pub trait ClipboardProvider: Send + Sync {
    /// Current text, `None` when the clipboard holds no text.
    fn get_text(&self) -> Result<Option<String>>;
    /// Bytes stored under `format`, `None` when that format is absent.
    fn get_data(&self, format: &str) -> Result<Option<Vec<u8>>>;
    /// Replace the clipboard content with everything in `transfer`.
    fn set_transfer(&self, transfer: &TransferObject) -> Result<()>;

    /// Native vacate: open, empty (dropping the current owner), close.
    fn vacate(&self) -> Result<()>;
    /// Higher-level clear that places an empty clipboard object.
    fn set_empty(&self) -> Result<()>;

    fn supports_native_vacate(&self) -> bool;
    /// Whether clipboard-history tools on this platform honor an ignore marker.
    fn supports_ignore_marker(&self) -> bool;
}
