pub mod payload;
pub mod fingerprint;
pub mod config;
pub mod error;

pub use payload::*;
pub use fingerprint::*;
pub use config::*;
pub use error::*;

/// Name written as the value of clipboard-history ignore markers.
pub const PRODUCT_NAME: &str = "PassClip";
