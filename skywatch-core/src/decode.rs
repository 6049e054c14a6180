//! Decode validated frames into typed messages.
//!
//! Only DF17 (ADS-B extended squitter) carries anything the tracker uses:
//! - TC 1-4:  aircraft identification (callsign)
//! - TC 9-18: airborne position (12-bit altitude code + CPR fragments)
//!
//! Everything else is `MessageKind::Unhandled`, a normal and frequent case.

use crate::frame::RawFrame;
use crate::types::{MessageKind, Parity, CALLSIGN_CHARSET, DF_ADSB};

/// Classify a validated frame by DF and type code and extract its payload.
///
/// Total over arbitrary frame bytes; malformed content degrades to
/// `Unhandled`, never an error.
pub fn decode(frame: &RawFrame, downlink_format: u8) -> MessageKind {
    if downlink_format != DF_ADSB || !frame.is_long() {
        return MessageKind::Unhandled;
    }

    match type_code(frame) {
        Some(1..=4) => MessageKind::Identification {
            callsign: decode_callsign(frame),
        },
        Some(9..=18) => {
            let fields = position_fields(frame);
            MessageKind::AirbornePosition {
                parity: fields.parity,
                altitude_code: fields.altitude_code,
                lat_fragment: fields.lat_fragment,
                lon_fragment: fields.lon_fragment,
            }
        }
        _ => MessageKind::Unhandled,
    }
}

/// ADS-B type code: top 5 bits of the first ME byte. None for short frames.
pub fn type_code(frame: &RawFrame) -> Option<u8> {
    if !frame.is_long() {
        return None;
    }
    Some((frame.bytes()[4] >> 3) & 0x1F)
}

/// ME field (bytes 4-10) packed into the low 56 bits of a u64.
fn me_bits(frame: &RawFrame) -> u64 {
    let mut buf = [0u8; 8];
    buf[1..8].copy_from_slice(&frame.bytes()[4..11]);
    u64::from_be_bytes(buf)
}

// ---------------------------------------------------------------------------
// Identification
// ---------------------------------------------------------------------------

/// Decode the 8-character callsign from a TC 1-4 frame.
///
/// Each character is a 6-bit index into the fixed 64-symbol alphabet;
/// every index is defined, so decoding cannot fail.
pub fn decode_callsign(frame: &RawFrame) -> String {
    let bits = me_bits(frame);
    let mut callsign = String::with_capacity(8);
    for i in 0..8 {
        let idx = ((bits >> (42 - i * 6)) & 0x3F) as usize;
        callsign.push(CALLSIGN_CHARSET[idx] as char);
    }
    callsign
}

/// Encode up to 8 callsign characters into their packed 48-bit form
/// (6 bits each, MSB-first). Characters outside the alphabet map to the
/// pad symbol. Used for fixture construction.
pub fn encode_callsign(callsign: &str) -> u64 {
    let mut packed = 0u64;
    let mut chars = callsign.bytes();
    for i in 0..8 {
        let c = chars.next().unwrap_or(b' ');
        let idx = CALLSIGN_CHARSET
            .iter()
            .position(|&s| s == c && s != b'#')
            .unwrap_or(0) as u64;
        packed |= idx << (42 - i * 6);
    }
    packed
}

// ---------------------------------------------------------------------------
// Airborne position
// ---------------------------------------------------------------------------

/// Raw fields of a TC 9-18 airborne position message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionFields {
    pub parity: Parity,
    pub altitude_code: u16,
    pub lat_fragment: u32,
    pub lon_fragment: u32,
}

/// Extract the CPR fragments, parity flag, and altitude code.
///
/// Shared by `decode()` and the position resolver, which re-reads the
/// fragments from the stored even/odd frames.
pub fn position_fields(frame: &RawFrame) -> PositionFields {
    let bits = me_bits(frame);
    PositionFields {
        parity: if (bits >> 34) & 1 == 1 {
            Parity::Odd
        } else {
            Parity::Even
        },
        altitude_code: ((bits >> 36) & 0x0FFF) as u16,
        lat_fragment: ((bits >> 17) & 0x1FFFF) as u32,
        lon_fragment: (bits & 0x1FFFF) as u32,
    }
}

// ---------------------------------------------------------------------------
// Altitude
// ---------------------------------------------------------------------------

/// Decode the 12-bit altitude code into feet.
///
/// The Q-bit (bit 4) selects the encoding:
/// - Q=1: 25 ft resolution, linear
/// - Q=0: 100 ft Gillham gray code
pub fn decode_altitude(alt_code: u16) -> Option<i32> {
    if alt_code == 0 {
        return None;
    }

    let q_bit = (alt_code >> 4) & 1;

    if q_bit == 1 {
        // Remove the Q-bit to get the 11-bit linear code
        let n = ((alt_code >> 5) << 4) | (alt_code & 0x0F);
        Some(n as i32 * 25 - 1000)
    } else {
        decode_gillham_altitude(alt_code)
    }
}

/// Decode the 100 ft Gillham gray code altitude variant.
fn decode_gillham_altitude(alt_code: u16) -> Option<i32> {
    let c1 = (alt_code >> 12) & 1;
    let a1 = (alt_code >> 11) & 1;
    let c2 = (alt_code >> 10) & 1;
    let a2 = (alt_code >> 9) & 1;
    let c4 = (alt_code >> 8) & 1;
    let a4 = (alt_code >> 7) & 1;
    // bit 6 = M (metric, should be 0)
    let b1 = (alt_code >> 5) & 1;
    // bit 4 = Q (0 if we got here)
    let b2 = (alt_code >> 3) & 1;
    let _d2 = (alt_code >> 2) & 1;
    let b4 = (alt_code >> 1) & 1;
    let _d4 = alt_code & 1;

    // 100 ft component from the C digit (gray code)
    let c_digit = c4 * 4 + c2 * 2 + c1;
    let mut c_bin = c_digit;
    c_bin ^= c_bin >> 2;
    c_bin ^= c_bin >> 1;

    if c_bin == 0 || c_bin >= 6 {
        return None;
    }

    // 500 ft component: gray code over the combined A and B digits
    let ab_gray = ((a4 * 4 + a2 * 2 + a1) << 3) | (b4 * 4 + b2 * 2 + b1);
    let mut ab_bin = ab_gray;
    ab_bin ^= ab_bin >> 4;
    ab_bin ^= ab_bin >> 2;
    ab_bin ^= ab_bin >> 1;

    Some(ab_bin as i32 * 500 + c_bin as i32 * 100 - 1200)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
