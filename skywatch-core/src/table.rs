//! Bounded, address-keyed table of track entries.
//!
//! Fixed capacity, upsert-by-address, one-second aging, deterministic
//! eviction under capacity pressure. Entries are owned exclusively by the
//! table; callers mutate them only through `upsert` effects and read them
//! through `iter`/`get`.

use crate::frame::RawFrame;
use crate::types::Address;

/// Default entry capacity: a few dozen aircraft, the practical limit of a
/// small receiver's sky.
pub const DEFAULT_CAPACITY: usize = 32;

/// Age at which an entry stops counting as fresh.
pub const AGING_THRESHOLD_SECS: u32 = 10;

/// Age at which an entry counts as stale.
pub const STALE_THRESHOLD_SECS: u32 = 30;

// ---------------------------------------------------------------------------
// Track entry
// ---------------------------------------------------------------------------

/// Resolved position state of one aircraft.
///
/// `valid` reflects the most recent successful resolution; a later failed
/// attempt leaves the previous coordinates in place.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    /// Degrees, positive north.
    pub latitude: f64,
    /// Degrees, positive east.
    pub longitude: f64,
    /// Feet.
    pub altitude: i32,
    pub valid: bool,
}

/// One aircraft's accumulated state.
#[derive(Debug, Clone)]
pub struct TrackEntry {
    /// Immutable once created.
    pub address: Address,
    /// ≤8 chars, space-padded; empty until an identification message arrives.
    pub callsign: String,
    /// Most recent position fragment of each parity, replaced independently.
    pub last_even_frame: Option<RawFrame>,
    pub last_odd_frame: Option<RawFrame>,
    pub position: Position,
    /// Accepted frames for this address, saturating.
    pub hit_count: u32,
    /// Seconds since the last accepted frame.
    pub age_seconds: u32,
    /// Human time of the last update, HH:MM:SS.
    pub last_seen: String,
}

impl TrackEntry {
    fn new(address: Address) -> Self {
        TrackEntry {
            address,
            callsign: String::new(),
            last_even_frame: None,
            last_odd_frame: None,
            position: Position::default(),
            hit_count: 0,
            age_seconds: 0,
            last_seen: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Aircraft table
// ---------------------------------------------------------------------------

/// Fixed-capacity collection of track entries, keyed by address.
///
/// Entries keep insertion order, so enumeration within one snapshot is
/// stable. Lookup is a linear scan; the table never holds more than a few
/// dozen entries.
pub struct AircraftTable {
    entries: Vec<TrackEntry>,
    capacity: usize,
}

impl AircraftTable {
    pub fn new() -> Self {
        AircraftTable::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        AircraftTable {
            entries: Vec::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Look up by address, creating a zero-initialized entry if absent,
    /// then apply `effect`. At capacity, a new address first evicts one
    /// existing entry: highest age, ties broken by lowest hit count, then
    /// by lowest address.
    pub fn upsert(&mut self, address: Address, effect: impl FnOnce(&mut TrackEntry)) {
        let idx = match self.entries.iter().position(|e| e.address == address) {
            Some(idx) => idx,
            None => {
                if self.entries.len() >= self.capacity {
                    self.evict_one();
                }
                self.entries.push(TrackEntry::new(address));
                self.entries.len() - 1
            }
        };
        effect(&mut self.entries[idx]);
    }

    fn evict_one(&mut self) {
        let victim = self
            .entries
            .iter()
            .enumerate()
            .max_by_key(|(_, e)| {
                (
                    e.age_seconds,
                    std::cmp::Reverse(e.hit_count),
                    std::cmp::Reverse(e.address),
                )
            })
            .map(|(idx, _)| idx);
        if let Some(idx) = victim {
            let evicted = self.entries.remove(idx);
            log::debug!(
                "evicted {:06X} (age {}s, {} hits)",
                evicted.address,
                evicted.age_seconds,
                evicted.hit_count
            );
        }
    }

    /// Advance every entry's age by one second. Returns the addresses whose
    /// age just crossed a staleness boundary, so the caller can redraw only
    /// those rows.
    pub fn tick_age(&mut self) -> Vec<Address> {
        let mut crossed = Vec::new();
        for entry in &mut self.entries {
            entry.age_seconds = entry.age_seconds.saturating_add(1);
            if entry.age_seconds == AGING_THRESHOLD_SECS
                || entry.age_seconds == STALE_THRESHOLD_SECS
            {
                crossed.push(entry.address);
            }
        }
        crossed
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TrackEntry> {
        self.entries.iter()
    }

    pub fn get(&self, address: Address) -> Option<&TrackEntry> {
        self.entries.iter().find(|e| e.address == address)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for AircraftTable {
    fn default() -> Self {
        AircraftTable::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(entry: &mut TrackEntry) {
        entry.age_seconds = 0;
        entry.hit_count = entry.hit_count.saturating_add(1);
    }

    #[test]
    fn test_upsert_creates_zero_initialized() {
        let mut table = AircraftTable::new();
        table.upsert(0xABCDEF, |_| {});

        let entry = table.get(0xABCDEF).unwrap();
        assert_eq!(entry.address, 0xABCDEF);
        assert!(entry.callsign.is_empty());
        assert!(!entry.position.valid);
        assert_eq!(entry.hit_count, 0);
        assert_eq!(entry.age_seconds, 0);
    }

    #[test]
    fn test_upsert_same_address_no_duplicate() {
        let mut table = AircraftTable::new();
        table.upsert(0x4840D6, touch);
        table.upsert(0x4840D6, touch);

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0x4840D6).unwrap().hit_count, 2);
    }

    #[test]
    fn test_eviction_keeps_size_constant() {
        let mut table = AircraftTable::with_capacity(4);
        for address in 1..=4u32 {
            table.upsert(address, touch);
        }
        // Age everyone, then refresh entry 2 so it is the youngest
        table.tick_age();
        table.upsert(2, touch);

        table.upsert(0x999999, touch);
        assert_eq!(table.len(), 4);
        assert!(table.get(0x999999).is_some());
        assert!(table.get(2).is_some());
    }

    #[test]
    fn test_eviction_prefers_oldest() {
        let mut table = AircraftTable::with_capacity(3);
        table.upsert(1, touch);
        table.tick_age(); // entry 1 -> age 1
        table.upsert(2, touch);
        table.upsert(3, touch);

        table.upsert(4, touch);
        assert!(table.get(1).is_none(), "oldest entry should be evicted");
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_eviction_tie_break_lowest_hits_then_address() {
        let mut table = AircraftTable::with_capacity(3);
        table.upsert(0x30, touch);
        table.upsert(0x20, touch);
        table.upsert(0x10, touch);
        table.upsert(0x20, touch); // 0x20 has 2 hits, 0x10/0x30 have 1

        // All ages equal (0); lowest hits then lowest address -> 0x10
        table.upsert(0x40, touch);
        assert!(table.get(0x10).is_none());
        assert!(table.get(0x20).is_some());
        assert!(table.get(0x30).is_some());
    }

    #[test]
    fn test_tick_age_increments_and_reports_boundaries() {
        let mut table = AircraftTable::new();
        table.upsert(0xABCDEF, touch);

        let mut boundary_hits = 0;
        for _ in 0..10 {
            let crossed = table.tick_age();
            boundary_hits += crossed.iter().filter(|&&a| a == 0xABCDEF).count();
        }
        assert_eq!(table.get(0xABCDEF).unwrap().age_seconds, 10);
        assert_eq!(boundary_hits, 1, "10s boundary crossed exactly once");
    }

    #[test]
    fn test_tick_age_stale_boundary() {
        let mut table = AircraftTable::new();
        table.upsert(0x4840D6, touch);

        let mut crossings = Vec::new();
        for age in 1..=35u32 {
            let crossed = table.tick_age();
            if !crossed.is_empty() {
                crossings.push(age);
            }
        }
        assert_eq!(crossings, vec![10, 30]);
    }

    #[test]
    fn test_age_reset_not_reported_again() {
        let mut table = AircraftTable::new();
        table.upsert(0x4840D6, touch);
        for _ in 0..10 {
            table.tick_age();
        }
        table.upsert(0x4840D6, touch); // age back to 0
        assert_eq!(table.get(0x4840D6).unwrap().age_seconds, 0);

        // Crossing 10s again reports again
        let mut crossed_again = false;
        for _ in 0..10 {
            if !table.tick_age().is_empty() {
                crossed_again = true;
            }
        }
        assert!(crossed_again);
    }

    #[test]
    fn test_iteration_stable_insertion_order() {
        let mut table = AircraftTable::new();
        for address in [0x30u32, 0x10, 0x20] {
            table.upsert(address, touch);
        }
        let order: Vec<Address> = table.iter().map(|e| e.address).collect();
        assert_eq!(order, vec![0x30, 0x10, 0x20]);
    }
}
