// Copyright (c) The k6-to-junit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing and command execution.

use crate::{
    errors::{ExpectedError, K6ToJunitExitCode, Result},
    output::{OutputContext, OutputOpts},
};
use camino::Utf8PathBuf;
use clap::Parser;
use k6_junit_core::{
    Report, SignalHandlerKind, SuiteAggregator, collect_lines, render_report, stopwatch,
};
use std::{
    fs::File,
    io::{BufWriter, Write},
};
use tokio::io::BufReader;
use tracing::debug;

/// Convert k6 console output on stdin into a JUnit XML report.
#[derive(Debug, Parser)]
#[command(name = "k6-to-junit", version, about)]
pub struct K6ToJunitApp {
    /// The output file; the report goes to stdout when omitted
    #[arg(long = "out", short = 'o', value_name = "OUTPUT_FILE")]
    out: Option<Utf8PathBuf>,

    #[command(flatten)]
    output: OutputOpts,
}

impl K6ToJunitApp {
    /// Initializes the output context: color handling and the logger.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the conversion, returning the process exit code.
    ///
    /// The exit code reflects the aggregated thresholds: 0 when every
    /// threshold passed, [`K6ToJunitExitCode::THRESHOLDS_FAILED`] otherwise.
    pub fn exec(self) -> Result<i32> {
        let watch = stopwatch();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| ExpectedError::RuntimeBuild { err })?;

        let mut aggregator = SuiteAggregator::new();
        runtime.block_on(async {
            let mut signal_handler = SignalHandlerKind::Standard.build()?;
            let input = BufReader::new(tokio::io::stdin());
            collect_lines(input, &mut aggregator, &mut signal_handler)
                .await
                .map_err(ExpectedError::from)
        })?;

        let all_passed = aggregator.all_passed();
        let suites = aggregator.into_suites();
        let report = render_report(&suites);
        self.write_report(&report)?;

        debug!(
            suites = report.test_suites.len(),
            tests = report.tests,
            failures = report.failures,
            elapsed_secs = watch.snapshot().duration.as_secs_f64(),
            "conversion finished"
        );

        if all_passed {
            Ok(K6ToJunitExitCode::OK)
        } else {
            Ok(K6ToJunitExitCode::THRESHOLDS_FAILED)
        }
    }

    fn write_report(&self, report: &Report) -> Result<()> {
        match &self.out {
            Some(path) => {
                let file = File::create(path).map_err(|err| ExpectedError::OutputFileOpen {
                    file: path.clone(),
                    err,
                })?;
                let mut writer = BufWriter::new(file);
                report
                    .serialize(&mut writer)
                    .map_err(|err| ExpectedError::WriteReport {
                        destination: path.to_string(),
                        err,
                    })?;
                writer
                    .flush()
                    .map_err(|err| ExpectedError::OutputFileFlush {
                        file: path.clone(),
                        err,
                    })
            }
            None => {
                let stdout = std::io::stdout();
                let mut stdout = stdout.lock();
                report
                    .serialize(&mut stdout)
                    .map_err(|err| ExpectedError::WriteReport {
                        destination: "stdout".to_owned(),
                        err,
                    })
            }
        }
    }
}
