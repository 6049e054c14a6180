//! skywatch: terminal frontend for the decode-and-aggregate core.
//!
//! `decode` replays a capture file offline and prints the final table;
//! `watch` consumes frames live (stdin or file) with the one-second aging
//! clock running, redrawing rows as they change.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use chrono::Timelike;
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Color, Table};

use skywatch_core::config;
use skywatch_core::radio::{self, RadioControl};
use skywatch_core::render::{self, Staleness};
use skywatch_core::{AgingClock, Event, RawFrame, Tracker};

mod logging;

#[derive(Parser)]
#[command(name = "skywatch", version, about = "ADS-B aircraft watcher")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode hex frames from a capture file and print the aircraft table
    Decode {
        /// Path to file containing hex frames (one per line), or - for stdin
        file: PathBuf,

        /// Print each decoded message instead of only the summary table
        #[arg(short, long)]
        raw: bool,
    },

    /// Watch frames live with the aging clock running
    Watch {
        /// Path to frame source, or - for stdin
        #[arg(default_value = "-")]
        file: PathBuf,
    },
}

fn main() {
    logging::setup_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode { file, raw } => cmd_decode(file, raw),
        Commands::Watch { file } => cmd_watch(file),
    }
}

/// Radio front-end stub for capture replay: logs each property set where a
/// real SDR wrapper would program hardware.
struct LoggedRadio;

impl RadioControl for LoggedRadio {
    fn set_frequency(&mut self, hz: u64) {
        log::info!("radio: frequency {hz} Hz");
    }
    fn set_rf_amp(&mut self, enabled: bool) {
        log::info!("radio: rf amp {}", if enabled { "on" } else { "off" });
    }
    fn set_lna_gain(&mut self, db: u8) {
        log::info!("radio: lna gain {db} dB");
    }
    fn set_vga_gain(&mut self, db: u8) {
        log::info!("radio: vga gain {db} dB");
    }
    fn set_sample_rate(&mut self, samples_per_sec: u32) {
        log::info!("radio: sample rate {samples_per_sec}");
    }
    fn set_baseband_bandwidth(&mut self, hz: u32) {
        log::info!("radio: baseband bandwidth {hz} Hz");
    }
}

fn open_reader(file: &PathBuf) -> Box<dyn BufRead + Send> {
    if file.to_str() == Some("-") {
        Box::new(io::BufReader::new(io::stdin()))
    } else {
        let f = std::fs::File::open(file).unwrap_or_else(|e| {
            eprintln!("Error opening {}: {e}", file.display());
            std::process::exit(1);
        });
        Box::new(io::BufReader::new(f))
    }
}

/// Parse a capture line: "HEX" or "HEX;seconds-of-day".
fn parse_line(line: &str, default_ts: u32) -> Option<RawFrame> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (hex, ts) = match line.split_once(';') {
        Some((h, t)) => (h.trim(), t.trim().parse::<u32>().unwrap_or(default_ts)),
        None => (line, default_ts),
    };

    match RawFrame::from_hex(hex, ts) {
        Ok(frame) => Some(frame),
        Err(e) => {
            log::debug!("skipping line: {e}");
            None
        }
    }
}

fn seconds_of_day() -> u32 {
    chrono::Local::now().num_seconds_from_midnight()
}

// ---------------------------------------------------------------------------
// decode
// ---------------------------------------------------------------------------

fn cmd_decode(file: PathBuf, raw: bool) {
    let reader = open_reader(&file);
    let cfg = config::load_config();
    let mut tracker = Tracker::with_table(skywatch_core::AircraftTable::with_capacity(
        cfg.tracker.table_capacity,
    ));

    let mut timestamp = 0u32;
    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };
        let frame = match parse_line(&line, timestamp) {
            Some(f) => f,
            None => continue,
        };
        timestamp = frame.timestamp();

        if tracker.on_frame(&frame).is_some() && raw {
            if let Ok(validated) = skywatch_core::validate(&frame) {
                println!("{:?}", skywatch_core::decode(&frame, validated.downlink_format));
            }
        }
    }

    if !raw {
        print_table(&tracker);
    }
    log::info!(
        "{} frames seen, {} accepted, {} positions resolved, {} aircraft",
        tracker.frames_seen,
        tracker.frames_accepted,
        tracker.positions_resolved,
        tracker.table().len()
    );
}

// ---------------------------------------------------------------------------
// watch
// ---------------------------------------------------------------------------

fn cmd_watch(file: PathBuf) {
    let cfg = config::load_config();

    // Pass the receive-chain settings through to the radio boundary.
    let mut front_end = LoggedRadio;
    radio::tune(&mut front_end, &cfg.radio);

    let mut tracker = Tracker::with_table(skywatch_core::AircraftTable::with_capacity(
        cfg.tracker.table_capacity,
    ));

    let (tx, rx) = mpsc::channel();
    let clock = AgingClock::start(tx.clone());

    let eof = Arc::new(AtomicBool::new(false));
    let reader_eof = Arc::clone(&eof);
    let reader = thread::spawn(move || {
        let source = open_reader(&file);
        for line in source.lines() {
            let line = match line {
                Ok(l) => l,
                Err(_) => break,
            };
            if let Some(frame) = parse_line(&line, seconds_of_day()) {
                if tx.send(Event::Frame(frame)).is_err() {
                    break;
                }
            }
        }
        reader_eof.store(true, Ordering::Relaxed);
    });

    // Single writer: frames and ticks are applied strictly in arrival order.
    for event in rx.iter() {
        let is_tick = event == Event::Tick;
        let changed = tracker.handle(event);
        if !changed.is_empty() {
            print_table(&tracker);
        }
        if is_tick && eof.load(Ordering::Relaxed) {
            break;
        }
    }

    // No tick fires after detach returns; the reader is already done.
    clock.detach();
    let _ = reader.join();

    print_table(&tracker);
    log::info!(
        "{} frames seen, {} accepted, {} positions resolved",
        tracker.frames_seen,
        tracker.frames_accepted,
        tracker.positions_resolved
    );
}

// ---------------------------------------------------------------------------
// rendering
// ---------------------------------------------------------------------------

fn staleness_color(staleness: Staleness) -> Color {
    match staleness {
        Staleness::Fresh => Color::Green,
        Staleness::Aging => Color::Grey,
        Staleness::Stale => Color::DarkGrey,
    }
}

fn print_table(tracker: &Tracker) {
    if tracker.table().is_empty() {
        println!("(no aircraft)");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ICAO", "Callsign", "Hits", "Last seen", "Lat", "Lon", "Alt (ft)",
    ]);

    for entry in tracker.table().iter() {
        let color = staleness_color(Staleness::from_age(entry.age_seconds));
        let (lat, lon, alt) = if entry.position.valid {
            (
                format!("{:.4}", entry.position.latitude),
                format!("{:.4}", entry.position.longitude),
                entry.position.altitude.to_string(),
            )
        } else {
            ("-".into(), "-".into(), "-".into())
        };

        table.add_row(vec![
            Cell::new(skywatch_core::address_to_string(entry.address)).fg(color),
            Cell::new(&entry.callsign).fg(color),
            Cell::new(render::hits_display(entry.hit_count)).fg(color),
            Cell::new(&entry.last_seen).fg(color),
            Cell::new(lat).fg(color),
            Cell::new(lon).fg(color),
            Cell::new(alt).fg(color),
        ]);
    }

    println!("{table}");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_plain_hex() {
        let frame = parse_line("8D4840D6202CC371C32CE0576098", 42).unwrap();
        assert_eq!(frame.timestamp(), 42);
        assert_eq!(frame.len(), 14);
    }

    #[test]
    fn test_parse_line_with_timestamp() {
        let frame = parse_line("8D4840D6202CC371C32CE0576098;43754", 0).unwrap();
        assert_eq!(frame.timestamp(), 43754);
    }

    #[test]
    fn test_parse_line_skips_comments_and_blanks() {
        assert!(parse_line("# comment", 0).is_none());
        assert!(parse_line("", 0).is_none());
        assert!(parse_line("   ", 0).is_none());
    }

    #[test]
    fn test_parse_line_skips_garbage() {
        assert!(parse_line("not hex at all", 0).is_none());
    }
}
