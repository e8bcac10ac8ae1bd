// Copyright (c) The k6-to-junit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stopwatch for tracking how long a conversion run takes.
//!
//! A run needs both a start time and a duration. For that we use a
//! combination of a realtime clock (for the start timestamp) and an
//! `Instant` (monotonic, for the elapsed time), so that a wall-clock
//! adjustment mid-run cannot produce a negative duration.

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// Starts a new stopwatch.
pub fn stopwatch() -> StopwatchStart {
    StopwatchStart::new()
}

/// The start state of a stopwatch.
#[derive(Clone, Debug)]
pub struct StopwatchStart {
    start_time: DateTime<Utc>,
    instant: Instant,
}

impl StopwatchStart {
    fn new() -> Self {
        Self {
            // These two syscalls will happen imperceptibly close to each
            // other, which is good enough for our purposes.
            start_time: Utc::now(),
            instant: Instant::now(),
        }
    }

    /// The realtime instant the stopwatch was started.
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Captures the current elapsed state of the stopwatch.
    pub fn snapshot(&self) -> StopwatchSnapshot {
        StopwatchSnapshot {
            start_time: self.start_time,
            duration: self.instant.elapsed(),
        }
    }
}

/// A snapshot of a stopwatch's state.
#[derive(Clone, Debug)]
pub struct StopwatchSnapshot {
    /// The realtime instant the stopwatch was started.
    pub start_time: DateTime<Utc>,

    /// The time elapsed since the start, per the monotonic clock.
    pub duration: Duration,
}

impl StopwatchSnapshot {
    /// The realtime instant corresponding to the end of this snapshot.
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_end_time_tracks_duration() {
        let start = stopwatch();
        let snapshot = start.snapshot();
        assert_eq!(
            snapshot.end_time(),
            snapshot.start_time + snapshot.duration
        );
        assert!(snapshot.end_time() >= start.start_time());
    }
}
