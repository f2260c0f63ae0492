use crate::traits::ClipboardProvider;
use crate::transfer::{TransferContent, TransferObject};
use anyhow::{anyhow, Result};
use arboard::Clipboard;
use passclip_core::IGNORE_FORMAT_NAME;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{GlobalFree, HANDLE, HGLOBAL, HWND};
use windows::Win32::System::DataExchange::{
    CloseClipboard, EmptyClipboard, GetClipboardData, IsClipboardFormatAvailable, OpenClipboard,
    RegisterClipboardFormatW, SetClipboardData,
};
use windows::Win32::System::Memory::{GlobalAlloc, GlobalLock, GlobalSize, GlobalUnlock, GMEM_MOVEABLE};

const CF_UNICODETEXT: u32 = 13;
// Binary payloads are stored as [u64 little-endian length][bytes] because
// GlobalSize may round the allocation up.
const LEN_PREFIX: usize = std::mem::size_of::<u64>();

pub struct WindowsClipboard;

impl WindowsClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsClipboard {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds the clipboard open; closes it on drop.
struct OpenGuard;

impl OpenGuard {
    fn open() -> Result<Self> {
        unsafe { OpenClipboard(HWND(0)) }.map_err(|e| anyhow!("Failed to open clipboard: {}", e))?;
        Ok(OpenGuard)
    }
}

impl Drop for OpenGuard {
    fn drop(&mut self) {
        if let Err(e) = unsafe { CloseClipboard() } {
            log::warn!("CloseClipboard failed: {}", e);
        }
    }
}

fn register_format(name: &str) -> Result<u32> {
    let wide: Vec<u16> = name.encode_utf16().chain(std::iter::once(0)).collect();
    let id = unsafe { RegisterClipboardFormatW(PCWSTR(wide.as_ptr())) };
    if id == 0 {
        return Err(anyhow!("RegisterClipboardFormatW failed for {:?}", name));
    }
    Ok(id)
}

fn format_available(format: u32) -> bool {
    unsafe { IsClipboardFormatAvailable(format) }.is_ok()
}

/// Copies `bytes` into a movable global block and hands it to the
/// clipboard, which owns it afterwards. Must run while the clipboard is open.
unsafe fn put_bytes(format: u32, bytes: &[u8]) -> Result<()> {
    let h_global = GlobalAlloc(GMEM_MOVEABLE, bytes.len().max(1))
        .map_err(|e| anyhow!("GlobalAlloc failed: {}", e))?;
    let ptr = GlobalLock(h_global);
    if ptr.is_null() {
        let _ = GlobalFree(h_global);
        return Err(anyhow!("GlobalLock failed"));
    }
    std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr as *mut u8, bytes.len());
    let _ = GlobalUnlock(h_global);

    if let Err(e) = SetClipboardData(format, HANDLE(h_global.0 as isize)) {
        let _ = GlobalFree(h_global);
        return Err(anyhow!("SetClipboardData failed: {}", e));
    }
    Ok(())
}

/// Reads the global block behind `format`. Must run while the clipboard is open.
unsafe fn take_bytes(format: u32) -> Result<Vec<u8>> {
    let handle = GetClipboardData(format).map_err(|e| anyhow!("GetClipboardData failed: {}", e))?;
    let h_global = HGLOBAL(handle.0 as *mut std::ffi::c_void);
    let size = GlobalSize(h_global);
    let ptr = GlobalLock(h_global);
    if ptr.is_null() {
        return Err(anyhow!("GlobalLock failed"));
    }
    let bytes = std::slice::from_raw_parts(ptr as *const u8, size).to_vec();
    let _ = GlobalUnlock(h_global);
    Ok(bytes)
}

fn utf16_bytes(text: &str) -> Vec<u8> {
    text.encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(|unit| unit.to_le_bytes())
        .collect()
}

fn framed(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(LEN_PREFIX + bytes.len());
    out.extend_from_slice(&(bytes.len() as u64).to_le_bytes());
    out.extend_from_slice(bytes);
    out
}

fn unframed(raw: &[u8]) -> Result<Vec<u8>> {
    if raw.len() < LEN_PREFIX {
        return Err(anyhow!("Clipboard data shorter than its length prefix"));
    }
    let (prefix, rest) = raw.split_at(LEN_PREFIX);
    let mut len_bytes = [0u8; LEN_PREFIX];
    len_bytes.copy_from_slice(prefix);
    let len = u64::from_le_bytes(len_bytes) as usize;
    rest.get(..len)
        .map(<[u8]>::to_vec)
        .ok_or_else(|| anyhow!("Clipboard data truncated"))
}

impl ClipboardProvider for WindowsClipboard {
    fn get_text(&self) -> Result<Option<String>> {
        if !format_available(CF_UNICODETEXT) {
            return Ok(None);
        }
        let _guard = OpenGuard::open()?;
        let raw = unsafe { take_bytes(CF_UNICODETEXT)? };
        let units: Vec<u16> = raw
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .take_while(|&unit| unit != 0)
            .collect();
        let text = String::from_utf16(&units).map_err(|e| anyhow!("Clipboard text is not UTF-16: {}", e))?;
        Ok(Some(text))
    }

    fn get_data(&self, format: &str) -> Result<Option<Vec<u8>>> {
        let id = register_format(format)?;
        if !format_available(id) {
            return Ok(None);
        }
        let _guard = OpenGuard::open()?;
        let raw = unsafe { take_bytes(id)? };
        Ok(Some(unframed(&raw)?))
    }

    fn set_transfer(&self, transfer: &TransferObject) -> Result<()> {
        let marker_format = match transfer.ignore_marker {
            Some(_) => Some(register_format(IGNORE_FORMAT_NAME)?),
            None => None,
        };
        let content_format = match &transfer.content {
            TransferContent::Data { format, .. } => Some(register_format(format)?),
            _ => None,
        };

        let _guard = OpenGuard::open()?;
        unsafe {
            EmptyClipboard().map_err(|e| anyhow!("EmptyClipboard failed: {}", e))?;

            if let (Some(id), Some(value)) = (marker_format, &transfer.ignore_marker) {
                put_bytes(id, &utf16_bytes(value))?;
            }
            match &transfer.content {
                TransferContent::Empty => {}
                TransferContent::Text(text) => put_bytes(CF_UNICODETEXT, &utf16_bytes(text))?,
                TransferContent::Data { bytes, .. } => {
                    if let Some(id) = content_format {
                        put_bytes(id, &framed(bytes))?;
                    }
                }
            }
        }
        Ok(())
    }

    fn vacate(&self) -> Result<()> {
        let _guard = OpenGuard::open()?;
        unsafe { EmptyClipboard() }.map_err(|e| anyhow!("EmptyClipboard failed: {}", e))
    }

    fn set_empty(&self) -> Result<()> {
        let mut clipboard = Clipboard::new().map_err(|e| anyhow!("Failed to init clipboard: {}", e))?;
        clipboard.clear().map_err(|e| anyhow!("Failed to clear clipboard: {}", e))
    }

    fn supports_native_vacate(&self) -> bool {
        true
    }

    fn supports_ignore_marker(&self) -> bool {
        true
    }
}
