use passclip_core::{Payload, PRODUCT_NAME};

/// Everything one clipboard write places, built before the clipboard is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferObject {
    pub content: TransferContent,
    /// Value of the "do not record" marker, if one is attached.
    pub ignore_marker: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferContent {
    /// Nothing but the marker (empty payloads).
    Empty,
    Text(String),
    Data { format: String, bytes: Vec<u8> },
}

impl TransferObject {
    pub fn new(content: TransferContent) -> Self {
        Self { content, ignore_marker: None }
    }

    pub fn from_payload(payload: &Payload) -> Self {
        let content = match payload {
            Payload::Text(text) if text.is_empty() => TransferContent::Empty,
            Payload::Text(text) => TransferContent::Text(text.clone()),
            Payload::Data { bytes, .. } if bytes.is_empty() => TransferContent::Empty,
            Payload::Data { format, bytes } => TransferContent::Data {
                format: format.clone(),
                bytes: bytes.clone(),
            },
        };
        Self::new(content)
    }

    pub fn with_ignore_marker(mut self) -> Self {
        self.ignore_marker = Some(PRODUCT_NAME.to_string());
        self
    }
}
