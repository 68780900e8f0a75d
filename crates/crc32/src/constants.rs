/// Reflected IEEE 802.3 polynomial (CRC-32/ISO-HDLC).
pub const POLYNOMIAL_IEEE: u32 = 0xEDB8_8320;

/// Reflected Castagnoli polynomial (CRC-32C).
pub const POLYNOMIAL_CASTAGNOLI: u32 = 0x82F6_3B78;

/// Register value after [`Crc32::initialize`](crate::Crc32::initialize).
pub const SEED: u32 = 0xFFFF_FFFF;
