//! Hex formatting of octets for logs and diagnostics.

/// Formats up to `max` bytes as space-separated upper-case hex.
///
/// Bytes beyond `max` are summarised by count.
///
/// # Example
///
/// ```
/// use oxcrops_buffers::print_octets;
///
/// assert_eq!(print_octets(&[0xF9, 0x00, 0xE8, 0x03], 16), "F9 00 E8 03");
/// assert_eq!(print_octets(&[1, 2, 3], 2), "01 02 ... (1 more)");
/// assert_eq!(print_octets(&[], 16), "");
/// ```
pub fn print_octets(octets: &[u8], max: usize) -> String {
    let mut result = octets
        .iter()
        .take(max)
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ");

    if octets.len() > max {
        result.push_str(&format!(" ... ({} more)", octets.len() - max));
    }

    result
}

/// Formats octets with a cap of 32 bytes, the amount logged per ROP record.
///
/// ```
/// use oxcrops_buffers::print_octets_default;
///
/// assert_eq!(print_octets_default(&[0xFF, 0x10]), "FF 10");
/// ```
pub fn print_octets_default(octets: &[u8]) -> String {
    print_octets(octets, 32)
}
