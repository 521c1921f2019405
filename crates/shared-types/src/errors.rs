//! # Error Types
//!
//! Errors raised while interpreting shared types.

use thiserror::Error;

/// An unknown user event collection name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown event collection: {0}")]
pub struct ParseKindError(pub String);

/// A record key that cannot be used as a store path segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Empty key.
    #[error("key is empty")]
    Empty,

    /// Key contains a reserved character.
    #[error("key {key:?} contains reserved character {ch:?}")]
    ReservedCharacter {
        /// Offending key.
        key: String,
        /// First reserved character found.
        ch: char,
    },
}
