//! The serialized event queue and the one-second aging driver.
//!
//! The aircraft table has exactly two mutation sources: frame arrival and
//! the aging tick. Both are carried as `Event`s over one single-consumer
//! channel, so a tick can never observe an entry mid-update from a frame.
//!
//! `AgingClock` runs the tick source on its own thread. Detaching is
//! synchronous: once `detach()` returns the thread has been joined and no
//! further tick can be delivered.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::frame::RawFrame;

/// One unit of work for the single table writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Frame(RawFrame),
    Tick,
}

/// Posts `Event::Tick` once per wall-clock second until detached.
pub struct AgingClock {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl AgingClock {
    /// Spawn the tick thread. The clock also stops on its own when the
    /// receiving end of `sender` is dropped.
    pub fn start(sender: Sender<Event>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = thread::spawn(move || loop {
            let deadline = Instant::now() + Duration::from_secs(1);
            while Instant::now() < deadline {
                if flag.load(Ordering::Relaxed) {
                    return;
                }
                thread::sleep(Duration::from_millis(20));
            }
            if flag.load(Ordering::Relaxed) || sender.send(Event::Tick).is_err() {
                return;
            }
        });

        AgingClock {
            stop,
            handle: Some(handle),
        }
    }

    /// Stop the clock and wait for the thread to exit. No tick is delivered
    /// after this returns.
    pub fn detach(mut self) {
        self.shut_down();
    }

    fn shut_down(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for AgingClock {
    fn drop(&mut self) {
        self.shut_down();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_clock_ticks() {
        let (tx, rx) = mpsc::channel();
        let clock = AgingClock::start(tx);

        let event = rx.recv_timeout(Duration::from_secs(3)).expect("a tick");
        assert_eq!(event, Event::Tick);

        clock.detach();
    }

    #[test]
    fn test_detach_stops_delivery() {
        let (tx, rx) = mpsc::channel();
        let clock = AgingClock::start(tx);
        clock.detach();

        // The thread is joined and its sender dropped: after draining any
        // tick sent before detachment, the channel is disconnected.
        loop {
            match rx.try_recv() {
                Ok(Event::Tick) => continue,
                Ok(other) => panic!("unexpected event {other:?}"),
                Err(mpsc::TryRecvError::Disconnected) => break,
                Err(mpsc::TryRecvError::Empty) => {
                    panic!("sender should be gone after detach")
                }
            }
        }
    }

    #[test]
    fn test_clock_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel();
        let clock = AgingClock::start(tx);
        drop(rx);

        // The next send fails and the thread exits; detach just joins.
        clock.detach();
    }
}
