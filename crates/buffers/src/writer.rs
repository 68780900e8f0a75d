//! Little-endian binary writer.

/// A binary writer that appends to a growing buffer.
///
/// Bytes written since the last [`flush`](Writer::flush) (or
/// [`reset`](Writer::reset)) form the current segment.
///
/// # Example
///
/// ```
/// use oxcrops_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0x01);
/// writer.u16(0x0203);
/// let data = writer.flush();
/// assert_eq!(data, [0x01, 0x03, 0x02]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Writer {
    /// The underlying byte buffer.
    pub uint8: Vec<u8>,
    /// Position where the current segment starts.
    pub x0: usize,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer with room for `capacity` bytes before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            uint8: Vec::with_capacity(capacity),
            x0: 0,
        }
    }

    /// Current cursor position.
    pub fn x(&self) -> usize {
        self.uint8.len()
    }

    /// Number of bytes in the current segment.
    pub fn len(&self) -> usize {
        self.uint8.len() - self.x0
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Starts a new segment, dropping everything written so far.
    pub fn reset(&mut self) {
        self.uint8.clear();
        self.x0 = 0;
    }

    /// Returns the current segment and starts a new one.
    pub fn flush(&mut self) -> Vec<u8> {
        let result = if self.x0 == 0 {
            std::mem::take(&mut self.uint8)
        } else {
            self.uint8[self.x0..].to_vec()
        };
        self.x0 = self.uint8.len();
        result
    }

    /// Writes an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.uint8.push(val);
    }

    /// Writes an unsigned 16-bit integer (little-endian).
    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.uint8.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes a signed 16-bit integer (little-endian).
    #[inline]
    pub fn i16(&mut self, val: i16) {
        self.uint8.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes an unsigned 32-bit integer (little-endian).
    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.uint8.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes a signed 32-bit integer (little-endian).
    #[inline]
    pub fn i32(&mut self, val: i32) {
        self.uint8.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes an unsigned 64-bit integer (little-endian).
    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.uint8.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes a signed 64-bit integer (little-endian).
    #[inline]
    pub fn i64(&mut self, val: i64) {
        self.uint8.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes a 32-bit floating point number (little-endian).
    #[inline]
    pub fn f32(&mut self, val: f32) {
        self.uint8.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes a 64-bit floating point number (little-endian).
    #[inline]
    pub fn f64(&mut self, val: f64) {
        self.uint8.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes raw bytes.
    pub fn buf(&mut self, bytes: &[u8]) {
        self.uint8.extend_from_slice(bytes);
    }

    /// Writes bytes followed by a single null terminator.
    pub fn ascii_z(&mut self, bytes: &[u8]) {
        self.buf(bytes);
        self.u8(0);
    }

    /// Writes a string as UTF-16LE followed by a two-byte null terminator.
    pub fn utf16_z(&mut self, s: &str) {
        for unit in s.encode_utf16() {
            self.u16(unit);
        }
        self.u16(0);
    }
}
