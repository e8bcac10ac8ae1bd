// Copyright (c) The k6-to-junit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering sealed suites as a JUnit report.

use crate::{
    aggregator::SuiteRecord,
    report::{Report, TestCase, TestCaseStatus, TestSuite},
};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Converts sealed suites into a JUnit [`Report`], preserving suite order.
///
/// This is a pure function of its input: timing attributes come from the
/// timestamps recorded on the suite records, never from the wall clock.
pub fn render_report(suites: &[SuiteRecord]) -> Report {
    let mut report = Report::new();
    if let Some(span) = overall_span(suites) {
        report.set_time(span);
    }
    report.add_test_suites(suites.iter().map(render_suite));
    report
}

fn render_suite(suite: &SuiteRecord) -> TestSuite {
    let mut test_suite = TestSuite::new(suite.name.clone());
    if let Some(start) = suite.start_time {
        test_suite.set_timestamp(start);
        let end = suite.end_time.unwrap_or(start);
        if let Ok(duration) = (end - start).to_std() {
            test_suite.set_time(duration);
        }
    }

    test_suite.add_test_cases(suite.thresholds.iter().map(|threshold| {
        let status = if threshold.passed {
            TestCaseStatus::success()
        } else {
            let mut status = TestCaseStatus::failure();
            status
                .set_message(threshold.system_out.clone())
                .set_description(threshold.system_out.clone());
            status
        };
        let mut test_case = TestCase::new(threshold.name.clone(), status);
        if !threshold.system_out.is_empty() {
            test_case.set_system_out(&threshold.system_out);
        }
        test_case
    }));

    if !suite.stdout.is_empty() {
        test_suite.set_system_out(&suite.stdout);
    }
    test_suite
}

/// The span from the earliest suite start to the latest suite end.
///
/// Omitted whenever any suite is missing either bound, so reports never
/// carry a garbage overall time derived from incomplete timestamps.
fn overall_span(suites: &[SuiteRecord]) -> Option<Duration> {
    let mut earliest_start: Option<DateTime<Utc>> = None;
    let mut latest_end: Option<DateTime<Utc>> = None;
    for suite in suites {
        let start = suite.start_time?;
        let end = suite.end_time?;
        earliest_start = Some(earliest_start.map_or(start, |t| t.min(start)));
        latest_end = Some(latest_end.map_or(end, |t| t.max(end)));
    }
    (latest_end? - earliest_start?).to_std().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Threshold;

    fn instant(offset_secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + offset_secs, 0).expect("timestamp is valid")
    }

    fn suite(name: &str, start: Option<i64>, end: Option<i64>, passed: &[bool]) -> SuiteRecord {
        SuiteRecord {
            name: name.to_owned(),
            thresholds: passed
                .iter()
                .enumerate()
                .map(|(index, &passed)| Threshold {
                    name: format!("check{index}"),
                    passed,
                    system_out: format!("{} check{index}.", if passed { "✓" } else { "✗" }),
                })
                .collect(),
            start_time: start.map(instant),
            end_time: end.map(instant),
            stdout: String::new(),
        }
    }

    #[test]
    fn counts_roll_up_to_the_root() {
        let suites = [
            suite("first", Some(0), Some(5), &[true, false]),
            suite("second", Some(5), Some(8), &[true]),
        ];
        let report = render_report(&suites);
        assert_eq!(report.tests, 3);
        assert_eq!(report.failures, 1);
        assert_eq!(report.time, Some(Duration::from_secs(8)));
        assert_eq!(report.test_suites.len(), 2);
        assert_eq!(report.test_suites[0].failures, 1);
        assert_eq!(report.test_suites[1].failures, 0);
    }

    #[test]
    fn zero_thresholds_render_empty_suite() {
        let suites = [suite("empty", Some(0), Some(1), &[])];
        let report = render_report(&suites);
        assert_eq!(report.tests, 0);
        assert_eq!(report.failures, 0);
        assert!(report.test_suites[0].test_cases.is_empty());
    }

    #[test]
    fn overall_time_omitted_when_a_bound_is_missing() {
        let suites = [
            suite("timed", Some(0), Some(5), &[true]),
            suite("untimed", None, Some(6), &[true]),
        ];
        let report = render_report(&suites);
        assert_eq!(report.time, None);
        // The timed suite still carries its own timing attributes.
        assert_eq!(report.test_suites[0].time, Some(Duration::from_secs(5)));
        assert_eq!(report.test_suites[1].time, None);
        assert_eq!(report.test_suites[1].timestamp, None);
    }

    #[test]
    fn failed_threshold_carries_message_and_output() {
        let suites = [suite("s", Some(0), Some(1), &[false])];
        let report = render_report(&suites);
        let test_case = &report.test_suites[0].test_cases[0];
        match &test_case.status {
            TestCaseStatus::Failure {
                message,
                description,
            } => {
                assert_eq!(message.as_deref(), Some("✗ check0."));
                assert_eq!(description.as_deref(), Some("✗ check0."));
            }
            TestCaseStatus::Success => panic!("expected a failure status"),
        }
        let system_out = test_case.system_out.as_ref().expect("system-out is set");
        assert_eq!(system_out.as_str(), "✗ check0.");
    }
}
