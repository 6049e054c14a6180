//! Shared types and error enums for skywatch-core.

use serde::Serialize;
use thiserror::Error;

/// Fallible-surface errors (frame construction, config I/O).
#[derive(Debug, Error)]
pub enum SkywatchError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    #[error("frame too long: {0} bytes (max {max})", max = crate::frame::MAX_FRAME_BYTES)]
    FrameTooLong(usize),
    #[error("config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SkywatchError>;

/// Why a candidate frame was discarded by the validator.
///
/// Rejected frames are dropped silently; each radio frame is independent
/// and un-retriable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("checksum mismatch")]
    ChecksumMismatch,
    #[error("zero ICAO address")]
    ZeroAddress,
}

/// The even/odd CPR fragment pair does not describe one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("CPR fragment pair is inconsistent")]
pub struct Unresolvable;

// ---------------------------------------------------------------------------
// ICAO address
// ---------------------------------------------------------------------------

/// 24-bit ICAO transponder address, the table's primary key.
pub type Address = u32;

/// Downlink Format of ADS-B extended squitter frames.
pub const DF_ADSB: u8 = 17;

/// Format an address as a 6-digit uppercase hex string.
pub fn address_to_string(address: Address) -> String {
    format!("{:06X}", address & 0xFFFFFF)
}

/// Parse a 6-digit hex string into an address.
pub fn address_from_hex(hex: &str) -> Option<Address> {
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

// ---------------------------------------------------------------------------
// Hex utilities
// ---------------------------------------------------------------------------

/// Decode a hex string into bytes. Case-insensitive, must be even length.
pub fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    let hex = hex.trim();
    if hex.len() % 2 != 0 {
        return None;
    }
    let mut bytes = Vec::with_capacity(hex.len() / 2);
    for chunk in hex.as_bytes().chunks(2) {
        let high = hex_digit(chunk[0])?;
        let low = hex_digit(chunk[1])?;
        bytes.push((high << 4) | low);
    }
    Some(bytes)
}

/// Encode bytes as uppercase hex string.
pub fn hex_encode(data: &[u8]) -> String {
    let mut s = String::with_capacity(data.len() * 2);
    for &b in data {
        s.push(HEX_CHARS[(b >> 4) as usize] as char);
        s.push(HEX_CHARS[(b & 0x0F) as usize] as char);
    }
    s
}

const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Callsign character set
// ---------------------------------------------------------------------------

/// ADS-B callsign alphabet, 6 bits per character. All 64 codes map to a
/// defined character, so callsign decoding is total.
pub const CALLSIGN_CHARSET: &[u8; 64] =
    b"#ABCDEFGHIJKLMNOPQRSTUVWXYZ##### ###############0123456789######";

// ---------------------------------------------------------------------------
// Decoded message kinds
// ---------------------------------------------------------------------------

/// CPR frame parity flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Parity {
    Even,
    Odd,
}

/// Typed payload of a validated frame, keyed by DF and type code.
///
/// `Unhandled` covers every frame the tracker has no use for: non-ADS-B
/// downlink formats and type codes outside identification and airborne
/// position. It is a normal, frequent case, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MessageKind {
    /// TC 1-4: aircraft identification.
    Identification { callsign: String },
    /// TC 9-18: airborne position, CPR-encoded.
    AirbornePosition {
        parity: Parity,
        altitude_code: u16,
        lat_fragment: u32,
        lon_fragment: u32,
    },
    Unhandled,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_roundtrip() {
        let address = address_from_hex("4840D6").unwrap();
        assert_eq!(address, 0x4840D6);
        assert_eq!(address_to_string(address), "4840D6");
    }

    #[test]
    fn test_address_from_hex_rejects_bad_input() {
        assert!(address_from_hex("4840D").is_none()); // wrong length
        assert!(address_from_hex("ZZZZZZ").is_none());
    }

    #[test]
    fn test_hex_decode() {
        assert_eq!(hex_decode("4840D6"), Some(vec![0x48, 0x40, 0xD6]));
        assert_eq!(hex_decode("odd"), None); // odd length
        assert_eq!(hex_decode("ZZZZ"), None); // invalid chars
    }

    #[test]
    fn test_hex_encode() {
        assert_eq!(hex_encode(&[0x48, 0x40, 0xD6]), "4840D6");
    }

    #[test]
    fn test_charset_covers_all_codes() {
        assert_eq!(CALLSIGN_CHARSET.len(), 64);
        assert_eq!(CALLSIGN_CHARSET[1], b'A');
        assert_eq!(CALLSIGN_CHARSET[26], b'Z');
        assert_eq!(CALLSIGN_CHARSET[32], b' ');
        assert_eq!(CALLSIGN_CHARSET[48], b'0');
        assert_eq!(CALLSIGN_CHARSET[57], b'9');
    }
}
