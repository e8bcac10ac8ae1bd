// Copyright (c) The k6-to-junit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Expected errors and exit codes for the CLI.

use crate::output::StderrStyles;
use camino::Utf8PathBuf;
use k6_junit_core::errors::{CollectStreamError, SerializeError, SignalHandlerSetupError};
use owo_colors::OwoColorize;
use std::{error::Error, io};
use thiserror::Error;

/// Documented exit codes for `k6-to-junit` runs.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum K6ToJunitExitCode {}

impl K6ToJunitExitCode {
    /// The report was produced and every threshold passed.
    pub const OK: i32 = 0;

    /// The report was produced but at least one threshold failed.
    pub const THRESHOLDS_FAILED: i32 = 99;

    /// A setup issue prevented the conversion from starting.
    pub const SETUP_ERROR: i32 = 96;

    /// Reading the input or writing the report failed.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;

    /// The input stream was interrupted; no report was produced.
    pub const INTERRUPTED: i32 = 130;
}

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

/// An error expected during normal CLI operation.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("error setting up signal handler")]
    SignalHandlerSetup {
        #[from]
        err: SignalHandlerSetupError,
    },
    #[error("error building the async runtime")]
    RuntimeBuild {
        #[source]
        err: io::Error,
    },
    #[error("input stream interrupted, discarding partial report")]
    Interrupted,
    #[error("error reading input")]
    ReadInput {
        #[source]
        err: io::Error,
    },
    #[error("error opening output file `{file}`")]
    OutputFileOpen {
        file: Utf8PathBuf,
        #[source]
        err: io::Error,
    },
    #[error("error writing JUnit report to `{destination}`")]
    WriteReport {
        destination: String,
        #[source]
        err: SerializeError,
    },
    #[error("error flushing output file `{file}`")]
    OutputFileFlush {
        file: Utf8PathBuf,
        #[source]
        err: io::Error,
    },
}

impl From<CollectStreamError> for ExpectedError {
    fn from(err: CollectStreamError) -> Self {
        match err {
            CollectStreamError::Interrupted => ExpectedError::Interrupted,
            CollectStreamError::Read(err) => ExpectedError::ReadInput { err },
            // `CollectStreamError` is `#[non_exhaustive]`; all current variants
            // are handled above, so this arm is unreachable today.
            _ => unreachable!("unhandled CollectStreamError variant"),
        }
    }
}

impl ExpectedError {
    /// The exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::SignalHandlerSetup { .. } | Self::RuntimeBuild { .. } => {
                K6ToJunitExitCode::SETUP_ERROR
            }
            Self::Interrupted => K6ToJunitExitCode::INTERRUPTED,
            Self::ReadInput { .. }
            | Self::OutputFileOpen { .. }
            | Self::WriteReport { .. }
            | Self::OutputFileFlush { .. } => K6ToJunitExitCode::WRITE_OUTPUT_ERROR,
        }
    }

    /// Displays this error to stderr, along with its causes.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        eprintln!("{}: {}", "error".style(styles.error), self);
        let mut source = self.source();
        while let Some(error) = source {
            eprintln!("{}: {}", "caused by".style(styles.cause), error);
            source = error.source();
        }
    }
}
