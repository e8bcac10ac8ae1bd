// Copyright (c) The k6-to-junit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end fixtures: console lines in, exact XML bytes out.

use chrono::{DateTime, Utc};
use indoc::indoc;
use k6_junit_core::{SuiteAggregator, SuiteRecord, render_report};
use pretty_assertions::assert_eq;

fn instant(offset_secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + offset_secs, 0).expect("timestamp is valid")
}

/// Feeds `lines` through an aggregator with a fixed clock, one second per
/// line, and returns the sealed suites.
fn aggregate(lines: &[&str]) -> Vec<SuiteRecord> {
    let mut aggregator = SuiteAggregator::new();
    for (index, line) in lines.iter().enumerate() {
        aggregator.consume_line(line, instant(index as i64));
    }
    aggregator.finalize_stream(instant(lines.len() as i64));
    aggregator.into_suites()
}

#[test]
fn single_suite_report() {
    let suites = aggregate(&["script: foo", "✓ check1.", "✗ check2.", "vus_max=1"]);
    let report = render_report(&suites);

    let expected = indoc! {r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <testsuites tests="2" failures="1" time="3.000">
            <testsuite name="foo" tests="2" failures="1" time="3.000" timestamp="2023-11-14T22:13:20+00:00">
                <testcase name="check1">
                    <system-out>✓ check1.</system-out>
                </testcase>
                <testcase name="check2">
                    <failure message="✗ check2.">✗ check2.</failure>
                    <system-out>✗ check2.</system-out>
                </testcase>
                <system-out><![CDATA[script: foo
        ✓ check1.
        ✗ check2.
        vus_max=1
        ]]></system-out>
            </testsuite>
        </testsuites>
    "#};
    assert_eq!(report.to_string().expect("report renders"), expected);
}

#[test]
fn multi_suite_report_preserves_order_and_spans_both() {
    let suites = aggregate(&[
        "script: first",
        "✓ check1.",
        "vus_max=1",
        "script: second",
        "✗ check2.",
        "vus_max=1",
    ]);
    let report = render_report(&suites);

    let expected = indoc! {r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <testsuites tests="2" failures="1" time="5.000">
            <testsuite name="first" tests="1" failures="0" time="2.000" timestamp="2023-11-14T22:13:20+00:00">
                <testcase name="check1">
                    <system-out>✓ check1.</system-out>
                </testcase>
                <system-out><![CDATA[script: first
        ✓ check1.
        vus_max=1
        ]]></system-out>
            </testsuite>
            <testsuite name="second" tests="1" failures="1" time="2.000" timestamp="2023-11-14T22:13:23+00:00">
                <testcase name="check2">
                    <failure message="✗ check2.">✗ check2.</failure>
                    <system-out>✗ check2.</system-out>
                </testcase>
                <system-out><![CDATA[script: second
        ✗ check2.
        vus_max=1
        ]]></system-out>
            </testsuite>
        </testsuites>
    "#};
    assert_eq!(report.to_string().expect("report renders"), expected);
}

#[test]
fn nameless_input_renders_an_empty_report() {
    let suites = aggregate(&["✓ floating.", "✗ another."]);
    assert!(suites.is_empty());

    let report = render_report(&suites);
    let expected = indoc! {r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <testsuites tests="0" failures="0">
        </testsuites>
    "#};
    assert_eq!(report.to_string().expect("report renders"), expected);
}

#[test]
fn captured_output_with_markup_stays_well_formed() {
    let suites = aggregate(&["script: cdata", "<b>&amp;</b> ]]> tail", "vus_max=1"]);
    let report = render_report(&suites);

    let expected = indoc! {r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <testsuites tests="0" failures="0" time="2.000">
            <testsuite name="cdata" tests="0" failures="0" time="2.000" timestamp="2023-11-14T22:13:20+00:00">
                <system-out><![CDATA[script: cdata
        <b>&amp;</b> ]]]]><![CDATA[> tail
        vus_max=1
        ]]></system-out>
            </testsuite>
        </testsuites>
    "#};
    assert_eq!(report.to_string().expect("report renders"), expected);
}

#[test]
fn rendering_is_idempotent() {
    let suites = aggregate(&["script: foo", "✓ check1.", "vus_max=1"]);
    let first = render_report(&suites)
        .to_string()
        .expect("report renders");
    let second = render_report(&suites)
        .to_string()
        .expect("report renders");
    assert_eq!(first, second);
}

#[test]
fn streaming_and_buffered_serialization_agree() {
    let suites = aggregate(&["script: foo", "✓ check1.", "✗ check2.", "vus_max=1"]);
    let report = render_report(&suites);

    let mut streamed: Vec<u8> = vec![];
    report.serialize(&mut streamed).expect("report serializes");
    let buffered = report.to_string().expect("report renders");
    assert_eq!(String::from_utf8(streamed).expect("output is UTF-8"), buffered);
}
