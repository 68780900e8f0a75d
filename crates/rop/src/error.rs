//! ROP codec error type.

use oxcrops_buffers::BufferError;
use thiserror::Error;

/// Error type for ROP encoding, decoding, dispatch and framing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RopError {
    #[error("out of bounds: {needed} byte(s) needed at offset {offset}, {available} available")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("unknown ROP opcode {opcode:#04x} at offset {offset}")]
    UnknownOpcode { opcode: u8, offset: usize },
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("unsupported: {0}")]
    Unsupported(&'static str),
    #[error("config error: {0}")]
    Config(String),
}

impl From<BufferError> for RopError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::OutOfBounds {
                offset,
                needed,
                available,
            } => RopError::OutOfBounds {
                offset,
                needed,
                available,
            },
            other => RopError::ParseError(other.to_string()),
        }
    }
}

impl RopError {
    /// Builds an [`RopError::InvalidState`] for a count field that disagrees
    /// with the length of its paired array.
    pub(crate) fn count_mismatch(field: &str, count: usize, len: usize) -> Self {
        RopError::InvalidState(format!(
            "{field} is {count} but {len} element(s) are present"
        ))
    }
}
