//! Table-driven CRC-32 (polynomial `0x04C11DB7`, MSB first, initial value
//! all-ones, no final XOR) and the single check byte derived from it.
//!
//! Only the low 8 bits travel on the wire. That is an integrity guard
//! against line noise, nothing more: one corrupted frame in 256 passes.

pub const POLYNOMIAL: u32 = 0x04C1_1DB7;
pub const INITIAL_VALUE: u32 = 0xFFFF_FFFF;
pub const FINAL_XOR: u32 = 0x0000_0000;

/// Lookup table shared by every [`crc32`] call. Computed at compile time.
pub static CRC32_TABLE: [u32; 256] = build_table();

/// Build the 256-entry lookup table for [`POLYNOMIAL`].
///
/// Pure: every call returns the same table.
pub const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut dividend = 0usize;
    while dividend < 256 {
        let mut remainder = (dividend as u32) << 24;
        let mut bit = 0;
        while bit < 8 {
            remainder = if remainder & 0x8000_0000 != 0 {
                (remainder << 1) ^ POLYNOMIAL
            } else {
                remainder << 1
            };
            bit += 1;
        }
        table[dividend] = remainder;
        dividend += 1;
    }
    table
}

/// CRC-32 of `data`.
pub fn crc32(data: &[u8]) -> u32 {
    let crc = data.iter().fold(INITIAL_VALUE, |crc, &byte| {
        let index = ((crc >> 24) as u8 ^ byte) as usize;
        CRC32_TABLE[index] ^ (crc << 8)
    });
    crc ^ FINAL_XOR
}

/// The frame check byte: the least significant byte of [`crc32`].
pub fn checksum(data: &[u8]) -> u8 {
    (crc32(data) & 0xFF) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_known_entries() {
        assert_eq!(CRC32_TABLE[0], 0);
        assert_eq!(CRC32_TABLE[1], POLYNOMIAL);
        assert_eq!(CRC32_TABLE[255], 0xB1F7_40B4);
    }

    #[test]
    fn test_build_table_is_idempotent() {
        assert_eq!(build_table(), build_table());
        assert_eq!(build_table(), CRC32_TABLE);
    }

    #[test]
    fn test_check_value() {
        // CRC-32/MPEG-2 catalogue check value.
        assert_eq!(crc32(b"123456789"), 0x0376_E6E7);
        assert_eq!(checksum(b"123456789"), 0xE7);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(crc32(&[]), INITIAL_VALUE);
        assert_eq!(checksum(&[]), 0xFF);
    }

    #[test]
    fn test_known_payloads() {
        assert_eq!(crc32(&[0xAA, 0xBB]), 0x1E57_1181);
        assert_eq!(checksum(&[0xAA, 0xBB]), 0x81);
        assert_eq!(checksum(b"hello"), 0xC2);
    }

    #[test]
    fn test_single_byte_change_changes_check_byte() {
        assert_ne!(checksum(&[0xAA, 0xBB]), checksum(&[0xAA, 0xBC]));
    }

    #[test]
    fn test_deterministic() {
        let data: Vec<u8> = (0..=255).collect();
        assert_eq!(crc32(&data), crc32(&data));
    }
}
