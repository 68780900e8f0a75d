//! Bounds-checked little-endian reader with cursor tracking.

use crate::BufferError;

/// A binary reader over a byte slice.
///
/// The reader keeps a cursor `x` into `uint8` and never reads at or past
/// `end`. Reads that do not fit return [`BufferError::OutOfBounds`] and leave
/// the cursor where it was.
///
/// # Example
///
/// ```
/// use oxcrops_buffers::Reader;
///
/// let data = [0x40, 0x01, 0x02, 0x00];
/// let mut reader = Reader::at(&data, 1);
///
/// assert_eq!(reader.u8().unwrap(), 0x01);
/// assert_eq!(reader.u16().unwrap(), 0x0002);
/// assert_eq!(reader.consumed_since(1), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
    /// End position (exclusive).
    pub end: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader positioned at the start of `uint8`.
    pub fn new(uint8: &'a [u8]) -> Self {
        Self::at(uint8, 0)
    }

    /// Creates a reader positioned at `x`.
    ///
    /// A start position past the end is allowed; the first read fails.
    pub fn at(uint8: &'a [u8], x: usize) -> Self {
        Self {
            uint8,
            x,
            end: uint8.len(),
        }
    }

    /// Returns the number of bytes left before `end`.
    pub fn size(&self) -> usize {
        self.end.saturating_sub(self.x)
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Number of bytes consumed since `start`. Zero if the cursor is
    /// behind `start`.
    pub fn consumed_since(&self, start: usize) -> usize {
        self.x.saturating_sub(start)
    }

    fn check(&self, needed: usize) -> Result<(), BufferError> {
        if needed > self.size() {
            return Err(BufferError::OutOfBounds {
                offset: self.x,
                needed,
                available: self.size(),
            });
        }
        Ok(())
    }

    /// Peeks at the current byte without advancing the cursor.
    pub fn peek(&self) -> Result<u8, BufferError> {
        self.check(1)?;
        Ok(self.uint8[self.x])
    }

    /// Advances the cursor by the given number of bytes.
    pub fn skip(&mut self, length: usize) -> Result<(), BufferError> {
        self.check(length)?;
        self.x += length;
        Ok(())
    }

    /// Returns the next `size` bytes and advances the cursor.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let bin = &self.uint8[self.x..self.x + size];
        self.x += size;
        Ok(bin)
    }

    /// Returns every remaining byte and moves the cursor to the end.
    ///
    /// An empty rest is fine at `end`; a cursor past `end` is out of bounds.
    pub fn rest(&mut self) -> Result<&'a [u8], BufferError> {
        if self.x > self.end {
            return Err(BufferError::OutOfBounds {
                offset: self.x,
                needed: 0,
                available: 0,
            });
        }
        let bin = &self.uint8[self.x..self.end];
        self.x = self.end;
        Ok(bin)
    }

    /// Reads a fixed-size byte array.
    pub fn array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.buf(N)?);
        Ok(out)
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        let val = self.uint8[self.x];
        self.x += 1;
        Ok(val)
    }

    /// Reads an unsigned 16-bit integer (little-endian).
    #[inline]
    pub fn u16(&mut self) -> Result<u16, BufferError> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    /// Reads a signed 16-bit integer (little-endian).
    #[inline]
    pub fn i16(&mut self) -> Result<i16, BufferError> {
        Ok(i16::from_le_bytes(self.array()?))
    }

    /// Reads an unsigned 32-bit integer (little-endian).
    #[inline]
    pub fn u32(&mut self) -> Result<u32, BufferError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    /// Reads a signed 32-bit integer (little-endian).
    #[inline]
    pub fn i32(&mut self) -> Result<i32, BufferError> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    /// Reads an unsigned 64-bit integer (little-endian).
    #[inline]
    pub fn u64(&mut self) -> Result<u64, BufferError> {
        Ok(u64::from_le_bytes(self.array()?))
    }

    /// Reads a signed 64-bit integer (little-endian).
    #[inline]
    pub fn i64(&mut self) -> Result<i64, BufferError> {
        Ok(i64::from_le_bytes(self.array()?))
    }

    /// Reads a 32-bit floating point number (little-endian).
    #[inline]
    pub fn f32(&mut self) -> Result<f32, BufferError> {
        Ok(f32::from_le_bytes(self.array()?))
    }

    /// Reads a 64-bit floating point number (little-endian).
    #[inline]
    pub fn f64(&mut self) -> Result<f64, BufferError> {
        Ok(f64::from_le_bytes(self.array()?))
    }

    /// Reads a null-terminated 8-bit string, returning the bytes without the
    /// terminator. The terminator is consumed.
    pub fn ascii_z(&mut self) -> Result<&'a [u8], BufferError> {
        let start = self.x;
        let window = &self.uint8[start.min(self.end)..self.end];
        let len = window
            .iter()
            .position(|&b| b == 0)
            .ok_or(BufferError::MissingTerminator { offset: start })?;
        self.x += len + 1;
        Ok(&window[..len])
    }

    /// Reads a null-terminated UTF-16LE string. The two-byte terminator is
    /// consumed.
    pub fn utf16_z(&mut self) -> Result<String, BufferError> {
        let start = self.x;
        let mut units = Vec::new();
        loop {
            if self.size() < 2 {
                self.x = start;
                return Err(BufferError::MissingTerminator { offset: start });
            }
            let unit = u16::from_le_bytes([self.uint8[self.x], self.uint8[self.x + 1]]);
            self.x += 2;
            if unit == 0 {
                break;
            }
            units.push(unit);
        }
        String::from_utf16(&units).map_err(|_| {
            self.x = start;
            BufferError::InvalidUtf16 { offset: start }
        })
    }
}
