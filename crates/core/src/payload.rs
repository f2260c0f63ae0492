use crate::error::ValidationError;

/// Format name that clipboard viewers recognize as "do not record".
pub const IGNORE_FORMAT_NAME: &str = "Clipboard Viewer Ignore";

/// Something the broker can put on the clipboard.
#[derive(Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Data { format: String, bytes: Vec<u8> },
}

impl Payload {
    pub fn text(text: impl Into<String>) -> Self {
        Payload::Text(text.into())
    }

    pub fn data(format: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Payload::Data { format: format.into(), bytes: bytes.into() }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Payload::Text(_) => Ok(()),
            Payload::Data { format, .. } => {
                if format.trim().is_empty() {
                    return Err(ValidationError::EmptyFormat);
                }
                if format == IGNORE_FORMAT_NAME {
                    return Err(ValidationError::ReservedFormat(format.clone()));
                }
                Ok(())
            }
        }
    }

    /// Bytes the fingerprint is computed over (UTF-8 for text).
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(text) => text.as_bytes(),
            Payload::Data { bytes, .. } => bytes,
        }
    }

    /// Format tag for binary payloads, `None` for text.
    pub fn format_tag(&self) -> Option<&str> {
        match self {
            Payload::Text(_) => None,
            Payload::Data { format, .. } => Some(format),
        }
    }
}

// Payloads usually hold secrets, so Debug only shows their shape.
impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Text(text) => f.debug_struct("Text").field("len", &text.len()).finish(),
            Payload::Data { format, bytes } => f
                .debug_struct("Data")
                .field("format", format)
                .field("len", &bytes.len())
                .finish(),
        }
    }
}
