// Copyright (c) The k6-to-junit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Line classification for k6 console output.
//!
//! k6 prints one line per checked threshold, prefixed with a pass or fail
//! glyph, plus a `script:` line naming the executed script and a `vus_max`
//! metric line once per run summary. The functions here recognize those
//! patterns on a single line at a time; lines that match nothing are simply
//! not classified, never rejected.

use regex::Regex;
use std::sync::LazyLock;

static THRESHOLD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([✓✗]) (\w*?)\.").expect("threshold pattern is valid"));

static SCRIPT_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"script: (.*)").expect("script name pattern is valid"));

/// The metric name k6 emits once per run summary, used as an end-of-suite
/// delimiter.
///
/// This is a detection heuristic, not part of any stable protocol: if the
/// marker never appears, suites are still finalized at end of stream.
static SUITE_BOUNDARY_MARKER: &str = "vus_max";

/// One named pass/fail check extracted from the run log.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Threshold {
    /// The name of the check: the word token between the glyph and the first
    /// period.
    pub name: String,

    /// Whether the check passed (✓) or failed (✗).
    pub passed: bool,

    /// The raw line the check was extracted from, preserved verbatim for
    /// diagnostics.
    pub system_out: String,
}

/// Extracts a threshold result from a line.
///
/// Matches `<glyph> <name>.` anywhere in the line, where the glyph is ✓ or ✗
/// and the name is word characters up to the first period. Returns `None`
/// for anything else, including malformed glyph/name pairs.
pub fn classify_threshold(line: &str) -> Option<Threshold> {
    let captures = THRESHOLD_REGEX.captures(line)?;
    Some(Threshold {
        name: captures[2].to_owned(),
        passed: &captures[1] == "✓",
        system_out: line.to_owned(),
    })
}

/// Extracts a suite name from a `script: <name>` line, returning the
/// remainder of the line after the marker.
pub fn classify_name(line: &str) -> Option<&str> {
    SCRIPT_NAME_REGEX
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Returns true if this line marks the end of one suite's output.
pub fn is_suite_boundary(line: &str) -> bool {
    line.contains(SUITE_BOUNDARY_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_threshold_pass_and_fail() {
        let threshold = classify_threshold("✓ check1.").expect("pass line matches");
        assert_eq!(threshold.name, "check1");
        assert!(threshold.passed);
        assert_eq!(threshold.system_out, "✓ check1.");

        let threshold = classify_threshold("✗ check2.").expect("fail line matches");
        assert_eq!(threshold.name, "check2");
        assert!(!threshold.passed);
        assert_eq!(threshold.system_out, "✗ check2.");
    }

    #[test]
    fn classify_threshold_mid_line() {
        // k6 indents threshold lines and pads names with dots.
        let threshold = classify_threshold("  ✓ http_req_duration..............: avg=120ms")
            .expect("indented line matches");
        assert_eq!(threshold.name, "http_req_duration");
        assert!(threshold.passed);
    }

    #[test]
    fn classify_threshold_misses() {
        assert_eq!(classify_threshold(""), None);
        assert_eq!(classify_threshold("some ordinary output"), None);
        // No trailing period after the name.
        assert_eq!(classify_threshold("✓ check1"), None);
        // A pipe is not a pass/fail glyph.
        assert_eq!(classify_threshold("| check1."), None);
    }

    #[test]
    fn classify_name_extracts_remainder() {
        assert_eq!(
            classify_name("  script: /tests/example.k6.js"),
            Some("/tests/example.k6.js")
        );
        assert_eq!(classify_name("script: foo"), Some("foo"));
        assert_eq!(classify_name("no marker here"), None);
    }

    #[test]
    fn suite_boundary_detection() {
        assert!(is_suite_boundary("    vus_max........: 10"));
        assert!(is_suite_boundary("vus_max=1"));
        assert!(!is_suite_boundary("vus............: 10"));
        assert!(!is_suite_boundary(""));
    }
}
