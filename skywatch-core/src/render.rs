//! Presentation adapter: fixed-width summary strings and staleness tags.
//!
//! A thin layer over `TrackEntry`; the mapping from `Staleness` to colors
//! or font weight belongs to the consuming display, not here.

use crate::table::{TrackEntry, AGING_THRESHOLD_SECS, STALE_THRESHOLD_SECS};

/// Three-tier freshness classification for display emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    /// age < 10 s
    Fresh,
    /// 10 s <= age < 30 s
    Aging,
    /// age >= 30 s
    Stale,
}

impl Staleness {
    pub fn from_age(age_seconds: u32) -> Self {
        if age_seconds < AGING_THRESHOLD_SECS {
            Staleness::Fresh
        } else if age_seconds < STALE_THRESHOLD_SECS {
            Staleness::Aging
        } else {
            Staleness::Stale
        }
    }
}

/// One entry's fixed-width summary line:
/// hex address (6), callsign (8, space-padded), hits (4, capped), time.
pub fn summary(entry: &TrackEntry) -> String {
    format!(
        "{:06X} {:<8} {} {}",
        entry.address & 0xFFFFFF,
        entry.callsign,
        hits_display(entry.hit_count),
        entry.last_seen
    )
}

/// Hit counter for display, right-aligned in 4 columns, capped at "999+".
pub fn hits_display(hit_count: u32) -> String {
    if hit_count <= 999 {
        format!("{hit_count:>4}")
    } else {
        "999+".to_string()
    }
}

/// Seconds-of-day as HH:MM:SS.
pub fn time_string(seconds_of_day: u32) -> String {
    let s = seconds_of_day % 86_400;
    format!("{:02}:{:02}:{:02}", s / 3600, (s / 60) % 60, s % 60)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
