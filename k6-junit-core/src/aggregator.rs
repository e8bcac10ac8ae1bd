// Copyright (c) The k6-to-junit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The suite aggregation state machine.
//!
//! The aggregator holds at most one open suite plus a growing list of sealed
//! suites. Each incoming line is captured verbatim, classified, and applied
//! to the open suite; a boundary marker (or the end of the stream) seals the
//! open suite and starts a fresh one.
//!
//! Timestamps are injected by the caller rather than read from the wall
//! clock, which keeps the state machine deterministic under test.

use crate::parser::{self, Threshold};
use chrono::{DateTime, Utc};
use tracing::debug;

/// One sealed test suite: a named group of checks with its timing bounds and
/// captured output.
///
/// A record is never mutated after it is sealed.
#[derive(Clone, Debug)]
pub struct SuiteRecord {
    /// The suite name, taken from the suite's `script:` marker line.
    pub name: String,

    /// The thresholds observed for this suite, in encounter order.
    /// Duplicate names are preserved.
    pub thresholds: Vec<Threshold>,

    /// The instant the first line of this suite was received.
    pub start_time: Option<DateTime<Utc>>,

    /// The instant the suite was sealed.
    ///
    /// Always at or after `start_time` when both are present.
    pub end_time: Option<DateTime<Utc>>,

    /// The raw text of every line attributed to this suite, each followed by
    /// a newline.
    pub stdout: String,
}

impl SuiteRecord {
    /// The number of failed thresholds in this suite.
    pub fn failure_count(&self) -> usize {
        self.thresholds.iter().filter(|t| !t.passed).count()
    }
}

/// Options for the initial open suite.
#[derive(Clone, Debug, Default)]
pub struct SuiteOptions {
    /// The suite name, if already known. When absent, the name is discovered
    /// from a `script:` line.
    pub name: Option<String>,

    /// The suite start time, if already known. When absent, the start time
    /// is the timestamp of the first line received.
    pub start_time: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug)]
struct OpenSuite {
    name: Option<String>,
    thresholds: Vec<Threshold>,
    start_time: Option<DateTime<Utc>>,
    stdout: String,
}

impl OpenSuite {
    fn new(options: SuiteOptions) -> Self {
        Self {
            name: options.name,
            thresholds: Vec::new(),
            start_time: options.start_time,
            stdout: String::new(),
        }
    }

    /// Seals this suite. Suites that never saw a `script:` marker have no
    /// name to report under and are dropped.
    fn seal(self, end_time: DateTime<Utc>) -> Option<SuiteRecord> {
        let name = self.name?;
        Some(SuiteRecord {
            name,
            thresholds: self.thresholds,
            start_time: self.start_time,
            end_time: Some(end_time),
            stdout: self.stdout,
        })
    }
}

/// Stateful accumulator that turns a sequence of console lines into sealed
/// [`SuiteRecord`]s.
#[derive(Clone, Debug)]
pub struct SuiteAggregator {
    current: OpenSuite,
    completed: Vec<SuiteRecord>,
}

impl SuiteAggregator {
    /// Creates an aggregator whose first suite starts with no name and no
    /// start time.
    pub fn new() -> Self {
        Self::with_options(SuiteOptions::default())
    }

    /// Creates an aggregator whose first suite starts from the given options.
    pub fn with_options(options: SuiteOptions) -> Self {
        Self {
            current: OpenSuite::new(options),
            completed: Vec::new(),
        }
    }

    /// Consumes one line of output, observed at `now`.
    ///
    /// The line is always captured into the open suite's stdout, whether or
    /// not it classifies as anything.
    pub fn consume_line(&mut self, line: &str, now: DateTime<Utc>) {
        self.current.stdout.push_str(line);
        self.current.stdout.push('\n');

        if self.current.start_time.is_none() {
            self.current.start_time = Some(now);
        }

        if let Some(threshold) = parser::classify_threshold(line) {
            self.current.thresholds.push(threshold);
        }

        if self.current.name.is_none()
            && let Some(name) = parser::classify_name(line)
        {
            self.current.name = Some(name.to_owned());
        }

        // Boundary detection runs last: a line can match both the threshold
        // and boundary patterns, and the threshold belongs to the suite being
        // sealed.
        if parser::is_suite_boundary(line) {
            self.finalize_current(now);
        }
    }

    /// Finalizes the still-open suite when the input stream ends.
    ///
    /// Suites are sealed here even if no boundary marker was ever seen, so
    /// already-classified thresholds are never lost to a missing marker.
    pub fn finalize_stream(&mut self, now: DateTime<Utc>) {
        self.finalize_current(now);
    }

    /// The suites sealed so far, in encounter order. Safe to call at any
    /// time; the open suite is not included.
    pub fn completed_suites(&self) -> &[SuiteRecord] {
        &self.completed
    }

    /// Consumes the aggregator, returning the sealed suites. Call
    /// [`finalize_stream`](Self::finalize_stream) first to seal any suite
    /// still open.
    pub fn into_suites(self) -> Vec<SuiteRecord> {
        self.completed
    }

    /// True if every threshold across every sealed suite passed; vacuously
    /// true when there are no thresholds at all.
    pub fn all_passed(&self) -> bool {
        self.completed
            .iter()
            .all(|suite| suite.thresholds.iter().all(|t| t.passed))
    }

    fn finalize_current(&mut self, end_time: DateTime<Utc>) {
        let open = std::mem::replace(&mut self.current, OpenSuite::new(SuiteOptions::default()));
        match open.seal(end_time) {
            Some(record) => {
                debug!(
                    suite = %record.name,
                    thresholds = record.thresholds.len(),
                    "sealed suite"
                );
                self.completed.push(record);
            }
            None => {
                debug!("dropping suite with no script name");
            }
        }
    }
}

impl Default for SuiteAggregator {
    fn default() -> Self {
        Self::new()
    }
}
