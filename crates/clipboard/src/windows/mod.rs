mod impl_win;

pub use impl_win::WindowsClipboard;
