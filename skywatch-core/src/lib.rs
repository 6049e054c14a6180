//! skywatch-core: Mode S / ADS-B decode + bounded aircraft tracking.
//!
//! No async, no hardware I/O — a pure decode-and-aggregate engine. Frames
//! come in from a demodulation front end, a bounded table of aircraft
//! tracks comes out, aged once per second. The `skywatch` binary wires it
//! to capture files and a terminal display.

pub mod clock;
pub mod config;
pub mod cpr;
pub mod crc;
pub mod decode;
pub mod frame;
pub mod radio;
pub mod render;
pub mod table;
pub mod tracker;
pub mod types;

// Re-export commonly used types at crate root
pub use clock::{AgingClock, Event};
pub use decode::decode;
pub use frame::{validate, RawFrame, Validated};
pub use render::Staleness;
pub use table::{AircraftTable, Position, TrackEntry};
pub use tracker::Tracker;
pub use types::*;
