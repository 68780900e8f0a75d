//! Pure `(buffer, offset)` read helpers.
//!
//! Each helper returns the decoded value together with the number of bytes it
//! consumed, so larger structures can compose them without sharing a cursor.

use crate::{BufferError, Reader};

/// Reads a `u8` at `offset`.
pub fn read_u8(buffer: &[u8], offset: usize) -> Result<(u8, usize), BufferError> {
    Ok((Reader::at(buffer, offset).u8()?, 1))
}

/// Reads a little-endian `u16` at `offset`.
pub fn read_u16_le(buffer: &[u8], offset: usize) -> Result<(u16, usize), BufferError> {
    Ok((Reader::at(buffer, offset).u16()?, 2))
}

/// Reads a little-endian `u32` at `offset`.
pub fn read_u32_le(buffer: &[u8], offset: usize) -> Result<(u32, usize), BufferError> {
    Ok((Reader::at(buffer, offset).u32()?, 4))
}

/// Reads a little-endian `u64` at `offset`.
pub fn read_u64_le(buffer: &[u8], offset: usize) -> Result<(u64, usize), BufferError> {
    Ok((Reader::at(buffer, offset).u64()?, 8))
}

/// Copies `length` bytes starting at `offset`.
///
/// ```
/// use oxcrops_buffers::copy_bytes;
///
/// assert_eq!(copy_bytes(&[1, 2, 3, 4], 1, 2).unwrap(), vec![2, 3]);
/// assert!(copy_bytes(&[1, 2, 3, 4], 3, 2).is_err());
/// ```
pub fn copy_bytes(buffer: &[u8], offset: usize, length: usize) -> Result<Vec<u8>, BufferError> {
    Ok(Reader::at(buffer, offset).buf(length)?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_report_consumed() {
        let data = [0xAA, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        assert_eq!(read_u8(&data, 0), Ok((0xAA, 1)));
        assert_eq!(read_u16_le(&data, 1), Ok((0x0201, 2)));
        assert_eq!(read_u32_le(&data, 1), Ok((0x04030201, 4)));
        assert_eq!(read_u64_le(&data, 1), Ok((0x0807060504030201, 8)));
    }

    #[test]
    fn test_offset_at_end_fails() {
        let data = [0x01, 0x02];
        assert_eq!(
            read_u8(&data, 2),
            Err(BufferError::OutOfBounds {
                offset: 2,
                needed: 1,
                available: 0
            })
        );
        assert!(read_u16_le(&data, 1).is_err());
    }

    #[test]
    fn test_copy_never_truncates() {
        let data = [1, 2, 3];
        assert_eq!(copy_bytes(&data, 0, 3), Ok(vec![1, 2, 3]));
        assert_eq!(copy_bytes(&data, 3, 0), Ok(vec![]));
        assert!(copy_bytes(&data, 1, 3).is_err());
    }
}
