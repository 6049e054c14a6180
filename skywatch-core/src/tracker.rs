//! The accepted-frame path: validate, decode, upsert, resolve.
//!
//! `Tracker` owns the aircraft table and is the single writer for both
//! event sources (frame arrival and the one-second tick). Callers serialize
//! the two through one `Event` channel; see `clock`.

use crate::clock::Event;
use crate::cpr;
use crate::decode::decode;
use crate::frame::{validate, RawFrame};
use crate::render;
use crate::table::{AircraftTable, Position};
use crate::types::{Address, MessageKind, Parity};

/// Stateful decode-and-aggregate engine over one aircraft table.
pub struct Tracker {
    table: AircraftTable,

    // Counters
    pub frames_seen: u64,
    pub frames_accepted: u64,
    pub positions_resolved: u64,
}

impl Tracker {
    pub fn new() -> Self {
        Tracker::with_table(AircraftTable::new())
    }

    pub fn with_table(table: AircraftTable) -> Self {
        Tracker {
            table,
            frames_seen: 0,
            frames_accepted: 0,
            positions_resolved: 0,
        }
    }

    pub fn table(&self) -> &AircraftTable {
        &self.table
    }

    /// Process one candidate frame.
    ///
    /// Returns the touched address for accepted frames (the row-changed
    /// signal for the presentation layer), `None` for rejected frames.
    /// Every accepted frame refreshes recency, even when its subtype is
    /// unhandled; only DF17 identification and airborne-position payloads
    /// change more than that.
    pub fn on_frame(&mut self, frame: &RawFrame) -> Option<Address> {
        self.frames_seen += 1;

        let validated = match validate(frame) {
            Ok(v) => v,
            Err(rejected) => {
                log::debug!("frame dropped: {rejected}");
                return None;
            }
        };

        self.frames_accepted += 1;
        let kind = decode(frame, validated.downlink_format);
        let time_string = render::time_string(frame.timestamp());
        let stored_frame = *frame;

        let mut resolved_position = false;
        self.table.upsert(validated.address, |entry| {
            entry.age_seconds = 0;
            entry.hit_count = entry.hit_count.saturating_add(1);
            entry.last_seen = time_string;

            match kind {
                MessageKind::Identification { callsign } => {
                    entry.callsign = callsign;
                }
                MessageKind::AirbornePosition { parity, .. } => {
                    match parity {
                        Parity::Even => entry.last_even_frame = Some(stored_frame),
                        Parity::Odd => entry.last_odd_frame = Some(stored_frame),
                    }
                    if let (Some(even), Some(odd)) =
                        (&entry.last_even_frame, &entry.last_odd_frame)
                    {
                        // A failed attempt leaves the previous position
                        // untouched.
                        if let Ok(r) = cpr::resolve(even, odd) {
                            entry.position = Position {
                                latitude: r.latitude,
                                longitude: r.longitude,
                                altitude: r.altitude,
                                valid: true,
                            };
                            resolved_position = true;
                        }
                    }
                }
                MessageKind::Unhandled => {}
            }
        });

        if resolved_position {
            self.positions_resolved += 1;
        }

        Some(validated.address)
    }

    /// Process one aging tick. Returns the addresses whose staleness class
    /// just changed.
    pub fn on_tick(&mut self) -> Vec<Address> {
        self.table.tick_age()
    }

    /// Dispatch one serialized event. Returns the addresses whose rows
    /// need redrawing.
    pub fn handle(&mut self, event: Event) -> Vec<Address> {
        match event {
            Event::Frame(frame) => self.on_frame(&frame).into_iter().collect(),
            Event::Tick => self.on_tick(),
        }
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Tracker::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
