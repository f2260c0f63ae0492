pub mod traits;
pub mod transfer;
pub mod clearer;
pub mod memory;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub mod generic;

pub use traits::*;
pub use transfer::*;
pub use clearer::*;
pub use memory::MemoryClipboard;

#[cfg(target_os = "windows")]
pub type DefaultClipboard = windows::WindowsClipboard;

#[cfg(target_os = "macos")]
pub type DefaultClipboard = macos::MacosClipboard;

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub type DefaultClipboard = generic::ArboardClipboard;
