// Copyright (c) The k6-to-junit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The JUnit report data model.
//!
//! The model mirrors the subset of the JUnit XML schema this tool emits:
//! a `testsuites` root with per-suite `testsuite` children, `testcase`
//! elements per threshold, and `system-out` diagnostics at both levels.
//! Counts are maintained by the `add_*` methods so the root attributes always
//! agree with the elements beneath them.

use crate::errors::SerializeError;
use crate::serialize::serialize_report;
use chrono::{DateTime, Utc};
use std::{io, time::Duration};

/// The root element of a JUnit report.
#[derive(Clone, Debug)]
pub struct Report {
    /// The overall time taken across all suites.
    ///
    /// This is serialized as the number of seconds.
    pub time: Option<Duration>,

    /// The total number of test cases from all suites.
    pub tests: usize,

    /// The total number of failed test cases from all suites.
    pub failures: usize,

    /// The test suites contained in this report.
    pub test_suites: Vec<TestSuite>,
}

impl Report {
    /// Creates a new, empty `Report`.
    pub fn new() -> Self {
        Self {
            time: None,
            tests: 0,
            failures: 0,
            test_suites: vec![],
        }
    }

    /// Sets the time taken for overall execution.
    pub fn set_time(&mut self, time: Duration) -> &mut Self {
        self.time = Some(time);
        self
    }

    /// Adds a new test suite and updates the `tests` and `failures` counts.
    ///
    /// When generating a new report, use of this method is recommended over
    /// adding to `self.test_suites` directly.
    pub fn add_test_suite(&mut self, test_suite: TestSuite) -> &mut Self {
        self.tests += test_suite.tests;
        self.failures += test_suite.failures;
        self.test_suites.push(test_suite);
        self
    }

    /// Adds several test suites and updates the `tests` and `failures`
    /// counts.
    pub fn add_test_suites(&mut self, test_suites: impl IntoIterator<Item = TestSuite>) -> &mut Self {
        for test_suite in test_suites {
            self.add_test_suite(test_suite);
        }
        self
    }

    /// Serializes this report to the given writer.
    ///
    /// Streaming to a writer and rendering to a string produce identical
    /// bytes for the same report.
    pub fn serialize(&self, writer: impl io::Write) -> Result<(), SerializeError> {
        serialize_report(self, writer)?;
        Ok(())
    }

    /// Serializes this report to a string.
    #[allow(clippy::inherent_to_string)]
    pub fn to_string(&self) -> Result<String, SerializeError> {
        let mut buf: Vec<u8> = vec![];
        self.serialize(&mut buf)?;
        String::from_utf8(buf).map_err(|utf8_err| SerializeError::Utf8(utf8_err.utf8_error()))
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

/// Represents a single test suite.
///
/// A `TestSuite` groups together several [`TestCase`] instances.
#[derive(Clone, Debug)]
pub struct TestSuite {
    /// The name of this test suite.
    pub name: String,

    /// The total number of test cases in this suite.
    pub tests: usize,

    /// The total number of test cases in this suite that failed.
    pub failures: usize,

    /// The time at which the suite began execution.
    pub timestamp: Option<DateTime<Utc>>,

    /// The overall time taken by the suite.
    pub time: Option<Duration>,

    /// The test cases that form this suite.
    pub test_cases: Vec<TestCase>,

    /// Output captured while the suite was executed.
    pub system_out: Option<Output>,
}

impl TestSuite {
    /// Creates a new `TestSuite`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: 0,
            failures: 0,
            timestamp: None,
            time: None,
            test_cases: vec![],
            system_out: None,
        }
    }

    /// Sets the start timestamp for the suite.
    pub fn set_timestamp(&mut self, timestamp: impl Into<DateTime<Utc>>) -> &mut Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Sets the time taken for the suite.
    pub fn set_time(&mut self, time: Duration) -> &mut Self {
        self.time = Some(time);
        self
    }

    /// Adds a test case to this suite and updates the counts.
    ///
    /// When generating a new report, use of this method is recommended over
    /// adding to `self.test_cases` directly.
    pub fn add_test_case(&mut self, test_case: TestCase) -> &mut Self {
        self.tests += 1;
        if !test_case.status.is_success() {
            self.failures += 1;
        }
        self.test_cases.push(test_case);
        self
    }

    /// Adds several test cases to this suite and updates the counts.
    pub fn add_test_cases(&mut self, test_cases: impl IntoIterator<Item = TestCase>) -> &mut Self {
        for test_case in test_cases {
            self.add_test_case(test_case);
        }
        self
    }

    /// Sets output captured during suite execution.
    pub fn set_system_out(&mut self, system_out: impl AsRef<str>) -> &mut Self {
        self.system_out = Some(Output::new(system_out.as_ref()));
        self
    }
}

/// Represents a single test case.
#[derive(Clone, Debug)]
pub struct TestCase {
    /// The name of the test case.
    pub name: String,

    /// The status of this test case.
    pub status: TestCaseStatus,

    /// Output captured for this test case.
    pub system_out: Option<Output>,
}

impl TestCase {
    /// Creates a new test case.
    pub fn new(name: impl Into<String>, status: TestCaseStatus) -> Self {
        Self {
            name: name.into(),
            status,
            system_out: None,
        }
    }

    /// Sets output captured for this test case.
    pub fn set_system_out(&mut self, system_out: impl AsRef<str>) -> &mut Self {
        self.system_out = Some(Output::new(system_out.as_ref()));
        self
    }
}

/// Represents the success or failure of a test case.
#[derive(Clone, Debug)]
pub enum TestCaseStatus {
    /// This test case passed.
    Success,

    /// This test case did not pass.
    Failure {
        /// The failure message.
        message: Option<String>,

        /// The description of the failure.
        ///
        /// This is serialized as the text node of the `failure` element.
        description: Option<String>,
    },
}

impl TestCaseStatus {
    /// Creates a new `TestCaseStatus` that represents a successful test.
    pub fn success() -> Self {
        TestCaseStatus::Success
    }

    /// Creates a new `TestCaseStatus` that represents a failed test.
    pub fn failure() -> Self {
        TestCaseStatus::Failure {
            message: None,
            description: None,
        }
    }

    /// Sets the message. No-op if this is a success case.
    pub fn set_message(&mut self, message: impl Into<String>) -> &mut Self {
        if let TestCaseStatus::Failure { message: m, .. } = self {
            *m = Some(message.into());
        }
        self
    }

    /// Sets the description (text node). No-op if this is a success case.
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        if let TestCaseStatus::Failure { description: d, .. } = self {
            *d = Some(description.into());
        }
        self
    }

    /// Returns true if this status represents a passed test.
    pub fn is_success(&self) -> bool {
        matches!(self, TestCaseStatus::Success)
    }
}

/// Represents text captured while a suite or test case executed.
///
/// XUnit consumers assume output is valid, printable Unicode; k6 output is
/// also frequently colorized. `Output` therefore strips ANSI escape
/// sequences and removes non-printable control characters on construction.
#[derive(Clone, Debug)]
pub struct Output {
    output: Box<str>,
}

impl Output {
    /// Creates a new output, sanitizing it for XML embedding.
    pub fn new(output: impl AsRef<str>) -> Self {
        let stripped = strip_ansi_escapes::strip_str(output.as_ref());
        let output = stripped
            .replace(
                |c| matches!(c, '\x00'..='\x08' | '\x0b' | '\x0c' | '\x0e'..='\x1f'),
                "",
            )
            .into_boxed_str();
        Self { output }
    }

    /// Returns the output.
    pub fn as_str(&self) -> &str {
        &self.output
    }

    /// Returns true if the sanitized output is empty.
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Converts the output into a string.
    pub fn into_string(self) -> String {
        self.output.into_string()
    }
}

impl AsRef<str> for Output {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<Output> for String {
    fn from(output: Output) -> Self {
        output.into_string()
    }
}
