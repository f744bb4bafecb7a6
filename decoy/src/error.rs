//! Error types raised while deriving a value.

use std::fmt;

use thiserror::Error;

use crate::path::Path;

/// Failure of one derivation attempt
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeriveError {
    /// A sequence container was popped past its drawn target length
    #[error("sequence at {path} is exhausted (cursor {cursor}, target length {target_length})")]
    OutOfBounds {
        path: Path,
        cursor: usize,
        target_length: usize,
    },

    /// A required key is not among the container's enumerated keys
    #[error("key `{key}` not found at {path}")]
    KeyNotFound { key: String, path: Path },

    /// An enumerated key could not be read as the map's key type
    #[error("key `{key}` at {path} is not a valid key: {reason}")]
    InvalidKey {
        key: String,
        path: Path,
        reason: String,
    },

    /// Raised by the consuming type's own decode logic
    #[error("{0}")]
    Custom(String),
}

impl serde::de::Error for DeriveError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DeriveError::Custom(msg.to_string())
    }
}

impl DeriveError {
    /// The path the error was raised at, if it carries one
    pub fn path(&self) -> Option<&Path> {
        match self {
            DeriveError::OutOfBounds { path, .. }
            | DeriveError::KeyNotFound { path, .. }
            | DeriveError::InvalidKey { path, .. } => Some(path),
            DeriveError::Custom(_) => None,
        }
    }
}
