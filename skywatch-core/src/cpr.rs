//! Compact Position Reporting — global decode from an even/odd frame pair.
//!
//! Each airborne position frame carries latitude/longitude modulo a grid
//! whose cell size depends on the frame's parity. One even and one odd
//! fragment disambiguate latitude through a zone-count formula, then
//! longitude through a per-latitude zone count.
//!
//! Key constants:
//! - NZ = 15 (latitude zones per hemisphere for even frames)
//! - Nb = 17 (bits per coordinate)
//! - Dlat_even = 360 / (4 * NZ) = 6.0 degrees
//! - Dlat_odd = 360 / (4 * NZ - 1) ≈ 6.1017 degrees
//!
//! Pairing uses the most recent frame of each parity with no maximum time
//! gap between them; zone-index disagreement is the only consistency check.

use crate::decode::{decode_altitude, position_fields};
use crate::frame::RawFrame;
use crate::types::{Parity, Unresolvable};

/// Number of latitude zones per hemisphere.
const NZ: f64 = 15.0;

/// Bits per CPR coordinate.
const NB: u32 = 17;

/// Maximum CPR value (2^17 = 131072).
const CPR_MAX: f64 = (1u32 << NB) as f64;

/// Number of longitude zones at a given latitude (NL function).
///
/// Ranges from 1 near the poles to 59 at the equator.
pub fn nl(lat: f64) -> i32 {
    if lat.abs() >= 87.0 {
        return 1;
    }

    let a = 1.0 - (std::f64::consts::PI / (2.0 * NZ)).cos();
    let b = (std::f64::consts::PI / 180.0 * lat.abs()).cos().powi(2);
    let nl_val = (2.0 * std::f64::consts::PI / (1.0 - a / b).acos()).floor() as i32;
    nl_val.max(1)
}

/// Modulo that always returns a non-negative result.
fn modulo(x: f64, y: f64) -> f64 {
    x - y * (x / y).floor()
}

/// An absolute position resolved from a fragment pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
    /// Degrees, positive north.
    pub latitude: f64,
    /// Degrees in [-180, 180), positive east.
    pub longitude: f64,
    /// Feet, from the fresher fragment's altitude code; 0 when the code
    /// does not decode.
    pub altitude: i32,
}

/// Resolve an absolute position from the stored even and odd frames.
///
/// The fresher of the two frames (by capture timestamp) selects which
/// parity's candidate is reported. Fails with `Unresolvable` when the two
/// fragments' derived latitude zone counts disagree, meaning the pair does
/// not describe one underlying position; the caller keeps any previous
/// position unchanged.
pub fn resolve(even: &RawFrame, odd: &RawFrame) -> Result<Resolved, Unresolvable> {
    let even_fields = position_fields(even);
    let odd_fields = position_fields(odd);

    let newer = if even.timestamp() >= odd.timestamp() {
        Parity::Even
    } else {
        Parity::Odd
    };

    let (latitude, longitude) = global(
        even_fields.lat_fragment,
        even_fields.lon_fragment,
        odd_fields.lat_fragment,
        odd_fields.lon_fragment,
        newer,
    )?;

    let altitude_code = match newer {
        Parity::Even => even_fields.altitude_code,
        Parity::Odd => odd_fields.altitude_code,
    };

    Ok(Resolved {
        latitude,
        longitude,
        altitude: decode_altitude(altitude_code).unwrap_or(0),
    })
}

/// Global CPR decode over raw fragments.
///
/// `newer` names the parity of the more recently captured fragment, which
/// selects the reported candidate.
pub fn global(
    lat_even: u32,
    lon_even: u32,
    lat_odd: u32,
    lon_odd: u32,
    newer: Parity,
) -> Result<(f64, f64), Unresolvable> {
    let dlat_even = 360.0 / (4.0 * NZ); // 6.0
    let dlat_odd = 360.0 / (4.0 * NZ - 1.0); // ~6.1017

    let lat_even_cpr = lat_even as f64 / CPR_MAX;
    let lon_even_cpr = lon_even as f64 / CPR_MAX;
    let lat_odd_cpr = lat_odd as f64 / CPR_MAX;
    let lon_odd_cpr = lon_odd as f64 / CPR_MAX;

    // Latitude zone index j
    let j = (59.0 * lat_even_cpr - 60.0 * lat_odd_cpr + 0.5).floor();

    // Candidate latitudes
    let mut lat_e = dlat_even * (modulo(j, 60.0) + lat_even_cpr);
    let mut lat_o = dlat_odd * (modulo(j, 59.0) + lat_odd_cpr);

    // Normalize to [-90, 90]
    if lat_e >= 270.0 {
        lat_e -= 360.0;
    }
    if lat_o >= 270.0 {
        lat_o -= 360.0;
    }

    // Both candidates must fall in the same longitude zone band
    if nl(lat_e) != nl(lat_o) {
        return Err(Unresolvable);
    }

    let (lat, lon) = match newer {
        Parity::Even => {
            let nl_val = nl(lat_e);
            let n_lon = nl_val.max(1);
            let dlon = 360.0 / n_lon as f64;
            let m =
                (lon_even_cpr * (nl_val - 1) as f64 - lon_odd_cpr * nl_val as f64 + 0.5).floor();
            let lon = dlon * (modulo(m, n_lon as f64) + lon_even_cpr);
            (lat_e, lon)
        }
        Parity::Odd => {
            let nl_val = nl(lat_o);
            let n_lon = (nl_val - 1).max(1);
            let dlon = 360.0 / n_lon as f64;
            let m =
                (lon_even_cpr * (nl_val - 1) as f64 - lon_odd_cpr * nl_val as f64 + 0.5).floor();
            let lon = dlon * (modulo(m, n_lon as f64) + lon_odd_cpr);
            (lat_o, lon)
        }
    };

    // Normalize longitude to [-180, 180)
    let lon = if lon >= 180.0 { lon - 360.0 } else { lon };

    Ok((round6(lat), round6(lon)))
}

/// Round to 6 decimal places.
fn round6(val: f64) -> f64 {
    (val * 1_000_000.0).round() / 1_000_000.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
