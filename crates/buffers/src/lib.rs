//! Little-endian binary cursor utilities for ROP buffers.
//!
//! Every multi-byte quantity in the MAPI ROP wire format is little-endian and
//! packed without padding. This crate provides the two halves of a cursor over
//! such data:
//!
//! - [`Reader`] - Reads from a byte slice with cursor tracking; every read is
//!   bounds-checked and fails with [`BufferError::OutOfBounds`]
//! - [`Writer`] - Appends to a growing buffer
//! - [`read_u8`], [`read_u16_le`], ... - Pure `(buffer, offset)` helpers that
//!   return the value together with the number of bytes consumed
//!
//! # Example
//!
//! ```
//! use oxcrops_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.u8(0xF9);
//! writer.u32(1000);
//! let data = writer.flush();
//! assert_eq!(data, [0xF9, 0xE8, 0x03, 0x00, 0x00]);
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.u8().unwrap(), 0xF9);
//! assert_eq!(reader.u32().unwrap(), 1000);
//! assert!(reader.u8().is_err());
//! ```

mod le;
mod print_octets;
mod reader;
mod writer;

pub use le::{copy_bytes, read_u16_le, read_u32_le, read_u64_le, read_u8};
pub use print_octets::{print_octets, print_octets_default};
pub use reader::Reader;
pub use writer::Writer;

/// Error type for buffer operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// A read or copy would run past the end of the buffer.
    OutOfBounds {
        offset: usize,
        needed: usize,
        available: usize,
    },
    /// A null-terminated string ran to the end of the buffer without a terminator.
    MissingTerminator { offset: usize },
    /// A UTF-16 string contained an unpaired surrogate.
    InvalidUtf16 { offset: usize },
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::OutOfBounds {
                offset,
                needed,
                available,
            } => write!(
                f,
                "out of bounds: {needed} byte(s) needed at offset {offset}, {available} available"
            ),
            BufferError::MissingTerminator { offset } => {
                write!(f, "string starting at offset {offset} has no terminator")
            }
            BufferError::InvalidUtf16 { offset } => {
                write!(f, "invalid UTF-16 string at offset {offset}")
            }
        }
    }
}

impl std::error::Error for BufferError {}
