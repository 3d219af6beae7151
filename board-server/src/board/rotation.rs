//! Which stop and destination are on screen.
//!
//! Indices are plain counters. They are advanced modulo the counts in the
//! current snapshot and clamped again on every read, so a snapshot that
//! shrinks between ticks can never produce an out-of-range selection. The
//! selected identity may change in that case; nothing tracks it across
//! snapshots.

use crate::domain::{Snapshot, StopBoard};

/// Rotation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rotation {
    stop: usize,
    destination: usize,
}

impl Rotation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to the next stop and back to the first destination.
    ///
    /// Without a snapshot, or with an empty one, the stop stays at 0.
    pub fn advance_stop(&mut self, snapshot: Option<&Snapshot>) {
        let count = snapshot.map_or(0, Snapshot::len);
        self.stop = if count == 0 {
            0
        } else {
            (self.stop + 1) % count
        };
        self.destination = 0;
    }

    /// Move to the next destination of the selected stop.
    ///
    /// Destinations are derived from the stop's departures on each call.
    pub fn advance_destination(&mut self, snapshot: Option<&Snapshot>) {
        let count = snapshot
            .and_then(|s| self.selected_stop(s))
            .map_or(0, |board| board.destinations().len());
        self.destination = if count == 0 {
            0
        } else {
            (self.destination + 1) % count
        };
    }

    /// Index of the selected stop within `snapshot`.
    pub fn stop_index(&self, snapshot: &Snapshot) -> Option<usize> {
        if snapshot.is_empty() {
            None
        } else {
            Some(self.stop % snapshot.len())
        }
    }

    /// The selected stop.
    pub fn selected_stop<'a>(&self, snapshot: &'a Snapshot) -> Option<&'a StopBoard> {
        snapshot.stop_wrapped(self.stop)
    }

    /// Index of the selected destination within `board`.
    pub fn destination_index(&self, board: &StopBoard) -> Option<usize> {
        let count = board.destinations().len();
        if count == 0 {
            None
        } else {
            Some(self.destination % count)
        }
    }

    /// Raw counters, for logging.
    pub fn counters(&self) -> (usize, usize) {
        (self.stop, self.destination)
    }
}
