//! Error types for value operations

use thiserror::Error;

/// Errors that can occur while checking, serializing or loading a value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The format array is not parallel to the text
    #[error("Invalid value shape: {text} text units but {formats} format slots")]
    InvalidValueShape { text: usize, formats: usize },
    /// A format slot references a descriptor the value's table does not own
    #[error("Invalid value shape: slot {index} references unknown format #{handle}")]
    UnknownFormat { index: usize, handle: usize },
    /// Error while rendering the markup tree
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Error while reading the JSON form of a value
    #[error("Wire format error: {0}")]
    WireError(String),
}
