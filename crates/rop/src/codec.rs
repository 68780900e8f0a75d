//! Encode/decode capabilities shared by every ROP structure.
//!
//! Encoding and decoding are separate traits: request-only structures
//! implement [`RopEncode`], response-only structures implement [`RopDecode`],
//! and anything used in round-trip tests implements both.

use oxcrops_buffers::{Reader, Writer};

use crate::{RopError, RopId};

/// A structure that can be written to the wire.
pub trait RopEncode {
    /// Exact number of bytes [`serialize`](RopEncode::serialize) produces.
    fn size(&self) -> usize;

    /// Appends the wire form to `writer`.
    fn write(&self, writer: &mut Writer) -> Result<(), RopError>;

    /// Returns the wire form as exactly [`size`](RopEncode::size) bytes.
    fn serialize(&self) -> Result<Vec<u8>, RopError> {
        let mut writer = Writer::with_capacity(self.size());
        self.write(&mut writer)?;
        let bytes = writer.flush();
        debug_assert_eq!(bytes.len(), self.size());
        Ok(bytes)
    }
}

/// A structure that can be read from the wire.
pub trait RopDecode: Sized {
    /// Reads one value at the reader's cursor.
    fn read(reader: &mut Reader<'_>) -> Result<Self, RopError>;

    /// Decodes a value from `buffer` starting at `start`.
    ///
    /// Returns the value and the number of bytes consumed, so the caller can
    /// advance its own offset. A `start` past the end of `buffer` is
    /// [`RopError::OutOfBounds`].
    fn deserialize(buffer: &[u8], start: usize) -> Result<(Self, usize), RopError> {
        if start > buffer.len() {
            return Err(RopError::OutOfBounds {
                offset: start,
                needed: 0,
                available: 0,
            });
        }
        let mut reader = Reader::at(buffer, start);
        let value = Self::read(&mut reader)?;
        Ok((value, reader.consumed_since(start)))
    }
}

/// Reads the leading RopId byte and checks it against `expected`.
pub(crate) fn read_rop_id(reader: &mut Reader<'_>, expected: RopId) -> Result<u8, RopError> {
    let offset = reader.x;
    let rop_id = reader.u8()?;
    if rop_id != expected as u8 {
        return Err(RopError::ParseError(format!(
            "expected {} ({:#04x}) at offset {offset}, found {rop_id:#04x}",
            expected.name(),
            expected as u8
        )));
    }
    Ok(rop_id)
}

/// Converts a collection length to the width of its wire count field.
pub(crate) fn wire_count<T: TryFrom<usize>>(field: &str, len: usize) -> Result<T, RopError> {
    T::try_from(len).map_err(|_| {
        RopError::InvalidState(format!("{field} of {len} does not fit its count field"))
    })
}

/// Checks that a wire count field matches the number of elements present.
pub(crate) fn check_count(field: &str, count: usize, len: usize) -> Result<(), RopError> {
    if count != len {
        return Err(RopError::count_mismatch(field, count, len));
    }
    Ok(())
}
