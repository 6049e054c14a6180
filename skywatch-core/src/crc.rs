//! CRC-24 validation for Mode S messages.
//!
//! ICAO standard polynomial, generator 0xFFF409. The last 3 bytes of a
//! frame carry the remainder; dividing the payload and XOR-ing that field
//! leaves 0 for an intact ADS-B frame.

const GENERATOR: u32 = 0xFFF409;

// ---------------------------------------------------------------------------
// CRC lookup table (compile-time)
// ---------------------------------------------------------------------------

const fn build_crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u32) << 16;
        let mut bit = 0;
        while bit < 8 {
            if crc & 0x800000 != 0 {
                crc = (crc << 1) ^ GENERATOR;
            } else {
                crc <<= 1;
            }
            crc &= 0xFFFFFF;
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

static CRC_TABLE: [u32; 256] = build_crc_table();

// ---------------------------------------------------------------------------
// Core CRC functions
// ---------------------------------------------------------------------------

/// Checksum remainder of a full frame.
///
/// Polynomial division of the first (n-3) bytes, XOR'd with the embedded
/// remainder field (last 3 bytes). Returns 0 for an intact frame.
pub fn remainder(data: &[u8]) -> u32 {
    if data.len() <= 3 {
        let mut val = 0u32;
        for &b in data {
            val = (val << 8) | b as u32;
        }
        return val & 0xFFFFFF;
    }

    let payload_len = data.len() - 3;
    let mut crc = payload_remainder(data);

    crc ^= (data[payload_len] as u32) << 16
        | (data[payload_len + 1] as u32) << 8
        | data[payload_len + 2] as u32;
    crc
}

/// Polynomial division of the payload bytes alone (all except the last 3).
///
/// This is the value a transmitter embeds in the remainder field; frame
/// fixtures in tests are sealed with it.
pub fn payload_remainder(data: &[u8]) -> u32 {
    if data.len() <= 3 {
        return 0;
    }
    let mut crc = 0u32;
    for &byte in &data[..data.len() - 3] {
        crc = ((crc << 8) ^ CRC_TABLE[((crc >> 16) ^ byte as u32) as usize & 0xFF]) & 0xFFFFFF;
    }
    crc
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{hex_decode, hex_encode};

    // Real captured DF17 frames
    const VALID_FRAMES: &[&str] = &[
        "8D4840D6202CC371C32CE0576098",
        "8D40621D58C382D690C8AC2863A7",
        "8D485020994409940838175B284F",
    ];

    #[test]
    fn test_crc_table_entry_zero() {
        assert_eq!(CRC_TABLE[0], 0);
    }

    #[test]
    fn test_valid_frames_remainder_zero() {
        for hex in VALID_FRAMES {
            let data = hex_decode(hex).unwrap();
            assert_eq!(remainder(&data), 0, "remainder should be 0 for {hex}");
        }
    }

    #[test]
    fn test_single_bit_flip_detected() {
        let reference = hex_decode(VALID_FRAMES[0]).unwrap();
        for bit in 0..reference.len() * 8 {
            let mut data = reference.clone();
            data[bit / 8] ^= 1 << (7 - (bit % 8));
            assert_ne!(
                remainder(&data),
                0,
                "flipped bit {bit} should break the checksum ({})",
                hex_encode(&data)
            );
        }
    }

    #[test]
    fn test_payload_remainder_matches_embedded_field() {
        let data = hex_decode(VALID_FRAMES[0]).unwrap();
        let embedded = (data[11] as u32) << 16 | (data[12] as u32) << 8 | data[13] as u32;
        assert_eq!(payload_remainder(&data), embedded);
    }

    #[test]
    fn test_short_input_total() {
        assert_eq!(remainder(&[]), 0);
        assert_eq!(remainder(&[0xAB]), 0xAB);
        assert_eq!(payload_remainder(&[0x01, 0x02]), 0);
    }
}
