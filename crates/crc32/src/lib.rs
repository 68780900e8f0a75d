//! Streaming CRC-32 accumulator.
//!
//! A 256-entry lookup table is built from a reflected polynomial at
//! construction time. The default polynomial is IEEE 802.3, which yields
//! CRC-32/ISO-HDLC values (the checksum used by zip containers and the
//! OneNote package chunk headers).
//!
//! # Example
//!
//! ```
//! use oxcrops_crc32::Crc32;
//!
//! let mut crc = Crc32::new();
//! crc.update(b"12345", 0, 5).unwrap();
//! crc.update(b"6789", 0, 4).unwrap();
//! assert_eq!(crc.finalize(), 0xCBF4_3926);
//! ```

mod constants;

pub use constants::{POLYNOMIAL_CASTAGNOLI, POLYNOMIAL_IEEE, SEED};

/// Error type for CRC accumulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crc32Error {
    /// `start + length` runs past the end of the supplied buffer.
    OutOfBounds {
        start: usize,
        length: usize,
        available: usize,
    },
}

impl std::fmt::Display for Crc32Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Crc32Error::OutOfBounds {
                start,
                length,
                available,
            } => write!(
                f,
                "range {start}..{start}+{length} exceeds buffer of {available} byte(s)"
            ),
        }
    }
}

impl std::error::Error for Crc32Error {}

/// Builds the 256-entry lookup table for a reflected polynomial.
pub const fn make_table(polynomial: u32) -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            c = if c & 1 != 0 {
                polynomial ^ (c >> 1)
            } else {
                c >> 1
            };
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

const IEEE_TABLE: [u32; 256] = make_table(POLYNOMIAL_IEEE);

/// Streaming CRC-32 accumulator.
#[derive(Clone)]
pub struct Crc32 {
    table: [u32; 256],
    polynomial: u32,
    value: u32,
}

impl std::fmt::Debug for Crc32 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crc32")
            .field("polynomial", &format_args!("{:#010x}", self.polynomial))
            .field("value", &format_args!("{:#010x}", self.value))
            .finish()
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc32 {
    /// Creates an IEEE accumulator, already initialized.
    pub fn new() -> Self {
        Self {
            table: IEEE_TABLE,
            polynomial: POLYNOMIAL_IEEE,
            value: SEED,
        }
    }

    /// Creates an accumulator for another reflected polynomial.
    pub fn with_polynomial(polynomial: u32) -> Self {
        Self {
            table: make_table(polynomial),
            polynomial,
            value: SEED,
        }
    }

    pub fn polynomial(&self) -> u32 {
        self.polynomial
    }

    /// Resets the running value to the all-ones seed.
    pub fn initialize(&mut self) {
        self.value = SEED;
    }

    /// Folds `buffer[start..start + length]` into the running value.
    pub fn update(&mut self, buffer: &[u8], start: usize, length: usize) -> Result<(), Crc32Error> {
        let end = start
            .checked_add(length)
            .filter(|&end| end <= buffer.len())
            .ok_or(Crc32Error::OutOfBounds {
                start,
                length,
                available: buffer.len(),
            })?;
        self.update_slice(&buffer[start..end]);
        Ok(())
    }

    /// Folds a whole slice into the running value.
    pub fn update_slice(&mut self, bytes: &[u8]) {
        let mut c = self.value;
        for &b in bytes {
            c = self.table[((c ^ b as u32) & 0xFF) as usize] ^ (c >> 8);
        }
        self.value = c;
    }

    /// Returns the bitwise inverse of the running value.
    ///
    /// The accumulator is left untouched, so more data may still be folded in.
    pub fn finalize(&self) -> u32 {
        !self.value
    }
}

/// One-shot IEEE CRC-32 of `bytes`.
///
/// ```
/// assert_eq!(oxcrops_crc32::checksum(b""), 0);
/// ```
pub fn checksum(bytes: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update_slice(bytes);
    crc.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_entries() {
        assert_eq!(IEEE_TABLE[0], 0);
        assert_eq!(IEEE_TABLE[1], 0x7707_3096);
        assert_eq!(IEEE_TABLE[255], 0x2D02_EF8D);
    }

    #[test]
    fn test_empty_input() {
        let crc = Crc32::new();
        assert_eq!(crc.finalize(), 0x0000_0000);
    }

    #[test]
    fn test_check_value() {
        assert_eq!(checksum(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_castagnoli_check_value() {
        let mut crc = Crc32::with_polynomial(POLYNOMIAL_CASTAGNOLI);
        crc.update(b"123456789", 0, 9).unwrap();
        assert_eq!(crc.finalize(), 0xE306_9283);
    }

    #[test]
    fn test_initialize_resets() {
        let mut crc = Crc32::new();
        crc.update_slice(b"garbage");
        crc.initialize();
        crc.update_slice(b"123456789");
        assert_eq!(crc.finalize(), 0xCBF4_3926);
    }

    #[test]
    fn test_update_range() {
        let mut crc = Crc32::new();
        crc.update(b"xx123456789yy", 2, 9).unwrap();
        assert_eq!(crc.finalize(), 0xCBF4_3926);
        assert_eq!(
            crc.update(b"abc", 2, 2),
            Err(Crc32Error::OutOfBounds {
                start: 2,
                length: 2,
                available: 3
            })
        );
        assert!(crc.update(b"abc", usize::MAX, 2).is_err());
    }
}
