use crate::traits::ClipboardProvider;
use crate::transfer::{TransferContent, TransferObject};
use anyhow::{anyhow, Result};
use arboard::Clipboard;
use cocoa::base::{id, nil, BOOL, NO};
use cocoa::foundation::{NSAutoreleasePool, NSString, NSUInteger};
use objc::{msg_send, sel, sel_impl};

/// Pasteboard type that clipboard managers following nspasteboard.org skip.
const CONCEALED_TYPE: &str = "org.nspasteboard.ConcealedType";

pub struct MacosClipboard;

impl MacosClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MacosClipboard {
    fn default() -> Self {
        Self::new()
    }
}

unsafe fn general_pasteboard() -> id {
    msg_send![objc::class!(NSPasteboard), generalPasteboard]
}

unsafe fn ns_string(value: &str) -> id {
    NSString::alloc(nil).init_str(value).autorelease()
}

unsafe fn set_string(pasteboard: id, value: &str, pb_type: id) -> Result<()> {
    let ok: BOOL = msg_send![pasteboard, setString: ns_string(value) forType: pb_type];
    if ok == NO {
        return Err(anyhow!("NSPasteboard rejected string"));
    }
    Ok(())
}

impl ClipboardProvider for MacosClipboard {
    fn get_text(&self) -> Result<Option<String>> {
        unsafe {
            let _pool = NSAutoreleasePool::new(nil);
            let pasteboard = general_pasteboard();
            let ns_str: id = msg_send![pasteboard, stringForType: cocoa::appkit::NSPasteboardTypeString];

            if ns_str == nil {
                return Ok(None);
            }

            let char_ptr: *const std::os::raw::c_char = msg_send![ns_str, UTF8String];
            if char_ptr.is_null() {
                return Err(anyhow!("Pasteboard string has no UTF-8 form"));
            }
            let c_str = std::ffi::CStr::from_ptr(char_ptr);
            Ok(Some(c_str.to_string_lossy().into_owned()))
        }
    }

    fn get_data(&self, format: &str) -> Result<Option<Vec<u8>>> {
        unsafe {
            let _pool = NSAutoreleasePool::new(nil);
            let pasteboard = general_pasteboard();
            let data: id = msg_send![pasteboard, dataForType: ns_string(format)];
            if data == nil {
                return Ok(None);
            }
            let len: NSUInteger = msg_send![data, length];
            if len == 0 {
                return Ok(Some(Vec::new()));
            }
            let ptr: *const u8 = msg_send![data, bytes];
            Ok(Some(std::slice::from_raw_parts(ptr, len as usize).to_vec()))
        }
    }

    fn set_transfer(&self, transfer: &TransferObject) -> Result<()> {
        unsafe {
            let _pool = NSAutoreleasePool::new(nil);
            let pasteboard = general_pasteboard();
            let _: isize = msg_send![pasteboard, clearContents];

            if let Some(marker) = &transfer.ignore_marker {
                set_string(pasteboard, marker, ns_string(CONCEALED_TYPE))?;
            }
            match &transfer.content {
                TransferContent::Empty => {}
                TransferContent::Text(text) => {
                    set_string(pasteboard, text, cocoa::appkit::NSPasteboardTypeString)?;
                }
                TransferContent::Data { format, bytes } => {
                    let data: id = msg_send![objc::class!(NSData),
                        dataWithBytes: bytes.as_ptr() as *const std::ffi::c_void
                        length: bytes.len() as NSUInteger];
                    let ok: BOOL = msg_send![pasteboard, setData: data forType: ns_string(format)];
                    if ok == NO {
                        return Err(anyhow!("NSPasteboard rejected data for {:?}", format));
                    }
                }
            }
            Ok(())
        }
    }

    fn vacate(&self) -> Result<()> {
        unsafe {
            let _pool = NSAutoreleasePool::new(nil);
            let pasteboard = general_pasteboard();
            if pasteboard == nil {
                return Err(anyhow!("No general pasteboard"));
            }
            let _: isize = msg_send![pasteboard, clearContents];
        }
        Ok(())
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
