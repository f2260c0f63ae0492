use thiserror::Error;

/// A malformed payload handed to the broker. This is a caller bug and is
/// the only error the broker ever returns.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("binary payload has an empty format tag")]
    EmptyFormat,
    #[error("format tag {0:?} is reserved for the clipboard ignore marker")]
    ReservedFormat(String),
}
