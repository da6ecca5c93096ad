//! Error types for the legacy wrappers

use rich_value::{NodeKind, ValueError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LegacyError {
    /// Single-node conversion only accepts elements and text
    #[error("Unsupported node kind: expected an element or text node, got {0}")]
    UnsupportedNodeKind(NodeKind),
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
    #[error(transparent)]
    Value(#[from] ValueError),
}
