//! Candidate frames from the demodulator and structural validation.
//!
//! A `RawFrame` is one demodulated Mode S message: up to 14 bytes plus a
//! seconds-of-day capture timestamp. `validate()` is the gate every frame
//! passes before decoding: checksum, address extraction, DF extraction.

use crate::crc;
use crate::types::{hex_decode, Address, Rejected, Result, SkywatchError};

/// Longest Mode S message: 112 bits.
pub const MAX_FRAME_BYTES: usize = 14;

/// One demodulated candidate message. Immutable after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrame {
    bytes: [u8; MAX_FRAME_BYTES],
    len: usize,
    /// Capture time, seconds since midnight.
    timestamp: u32,
}

impl RawFrame {
    /// Build a frame from demodulated bytes. Fails only on over-length input.
    pub fn from_bytes(data: &[u8], timestamp: u32) -> Result<Self> {
        if data.len() > MAX_FRAME_BYTES {
            return Err(SkywatchError::FrameTooLong(data.len()));
        }
        let mut bytes = [0u8; MAX_FRAME_BYTES];
        bytes[..data.len()].copy_from_slice(data);
        Ok(RawFrame {
            bytes,
            len: data.len(),
            timestamp,
        })
    }

    /// Build a frame from a hex string (capture files, test vectors).
    pub fn from_hex(hex: &str, timestamp: u32) -> Result<Self> {
        let data =
            hex_decode(hex).ok_or_else(|| SkywatchError::InvalidHex(hex.trim().to_string()))?;
        RawFrame::from_bytes(&data, timestamp)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Capture time, seconds since midnight.
    pub fn timestamp(&self) -> u32 {
        self.timestamp
    }

    /// True if this is a 112-bit (long) message.
    pub fn is_long(&self) -> bool {
        self.len == MAX_FRAME_BYTES
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Outcome of structural validation: the fields every accepted frame has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validated {
    pub address: Address,
    pub downlink_format: u8,
}

/// Check structural integrity and extract address + downlink format.
///
/// Pure function of the frame bytes, total over arbitrary input:
/// - checksum remainder must be 0 (`Rejected::ChecksumMismatch`);
///   frames too short to carry address and remainder fail the same way
/// - address (bytes 1-3) must be nonzero (`Rejected::ZeroAddress`)
/// - downlink format is the top 5 bits of byte 0
pub fn validate(frame: &RawFrame) -> std::result::Result<Validated, Rejected> {
    let data = frame.bytes();

    // Shortest Mode S message is 56 bits; anything less has no checksum
    // to match.
    if data.len() < 7 {
        return Err(Rejected::ChecksumMismatch);
    }

    if crc::remainder(data) != 0 {
        return Err(Rejected::ChecksumMismatch);
    }

    let address =
        ((data[1] as u32) << 16) | ((data[2] as u32) << 8) | data[3] as u32;
    if address == 0 {
        return Err(Rejected::ZeroAddress);
    }

    Ok(Validated {
        address,
        downlink_format: (data[0] >> 3) & 0x1F,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::address_to_string;

    #[test]
    fn test_validate_df17_identification() {
        let frame = RawFrame::from_hex("8D4840D6202CC371C32CE0576098", 0).unwrap();
        let v = validate(&frame).unwrap();
        assert_eq!(v.downlink_format, 17);
        assert_eq!(address_to_string(v.address), "4840D6");
    }

    #[test]
    fn test_validate_df17_position() {
        let frame = RawFrame::from_hex("8D40621D58C382D690C8AC2863A7", 0).unwrap();
        let v = validate(&frame).unwrap();
        assert_eq!(v.downlink_format, 17);
        assert_eq!(v.address, 0x40621D);
    }

    #[test]
    fn test_validate_rejects_any_single_bit_flip() {
        let reference = RawFrame::from_hex("8D4840D6202CC371C32CE0576098", 0).unwrap();
        for bit in 0..reference.len() * 8 {
            let mut data = reference.bytes().to_vec();
            data[bit / 8] ^= 1 << (7 - (bit % 8));
            let frame = RawFrame::from_bytes(&data, 0).unwrap();
            assert_eq!(validate(&frame), Err(Rejected::ChecksumMismatch));
        }
    }

    #[test]
    fn test_validate_rejects_zero_address() {
        // DF17 frame with address 000000, remainder sealed by the encoder
        let mut data = vec![0x8Du8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let r = crate::crc::payload_remainder(&data);
        data[11] = (r >> 16) as u8;
        data[12] = (r >> 8) as u8;
        data[13] = r as u8;
        let frame = RawFrame::from_bytes(&data, 0).unwrap();
        assert_eq!(validate(&frame), Err(Rejected::ZeroAddress));
    }

    #[test]
    fn test_validate_short_frame_is_checksum_mismatch() {
        let frame = RawFrame::from_bytes(&[0x8D, 0x48, 0x40], 0).unwrap();
        assert_eq!(validate(&frame), Err(Rejected::ChecksumMismatch));
        let empty = RawFrame::from_bytes(&[], 0).unwrap();
        assert_eq!(validate(&empty), Err(Rejected::ChecksumMismatch));
    }

    #[test]
    fn test_from_bytes_rejects_over_length() {
        assert!(RawFrame::from_bytes(&[0u8; 15], 0).is_err());
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert!(RawFrame::from_hex("ZZZZZZZZZZZZZZ", 0).is_err());
        assert!(RawFrame::from_hex("8D4", 0).is_err()); // odd length
    }

    #[test]
    fn test_timestamp_carried() {
        let frame = RawFrame::from_hex("8D4840D6202CC371C32CE0576098", 43754).unwrap();
        assert_eq!(frame.timestamp(), 43754);
        assert!(frame.is_long());
    }
}
