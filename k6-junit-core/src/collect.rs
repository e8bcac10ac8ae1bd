// Copyright (c) The k6-to-junit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Driving the aggregator from an asynchronous line stream.

use crate::{aggregator::SuiteAggregator, errors::CollectStreamError, signal::SignalHandler};
use chrono::Utc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

/// Consumes `input` line by line into `aggregator` until the stream ends.
///
/// Lines are processed synchronously and in order; `\r\n` and `\n` endings
/// are both tolerated. When the stream ends, any still-open suite is
/// finalized.
///
/// If a shutdown signal arrives first, collection fails with
/// [`CollectStreamError::Interrupted`]: the open suite is discarded rather
/// than finalized, and no report should be written from the aggregator.
pub async fn collect_lines<R>(
    input: R,
    aggregator: &mut SuiteAggregator,
    signal_handler: &mut SignalHandler,
) -> Result<(), CollectStreamError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut signals_done = false;
    loop {
        tokio::select! {
            event = signal_handler.recv(), if !signals_done => {
                match event {
                    Some(event) => {
                        debug!(?event, "shutdown signal received, discarding open suite");
                        return Err(CollectStreamError::Interrupted);
                    }
                    None => signals_done = true,
                }
            }
            line = lines.next_line() => {
                match line.map_err(CollectStreamError::Read)? {
                    Some(line) => aggregator.consume_line(&line, Utc::now()),
                    None => break,
                }
            }
        }
    }
    aggregator.finalize_stream(Utc::now());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::SignalHandlerKind;

    #[tokio::test]
    async fn collects_suites_from_a_buffered_stream() {
        let input = &b"script: foo\n\xe2\x9c\x93 check1.\r\n\xe2\x9c\x97 check2.\nvus_max=1\n"[..];
        let mut aggregator = SuiteAggregator::new();
        let mut signal_handler = SignalHandlerKind::Noop
            .build()
            .expect("noop handler builds");

        collect_lines(input, &mut aggregator, &mut signal_handler)
            .await
            .expect("collection succeeds");

        let suites = aggregator.completed_suites();
        assert_eq!(suites.len(), 1);
        assert_eq!(suites[0].name, "foo");
        assert_eq!(suites[0].thresholds.len(), 2);
        assert!(!aggregator.all_passed());
        // Carriage returns are stripped with the line ending.
        assert_eq!(
            suites[0].stdout,
            "script: foo\n✓ check1.\n✗ check2.\nvus_max=1\n"
        );
    }

    #[test]
    fn finalizes_open_suite_at_end_of_stream() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime builds");
        runtime.block_on(async {
            let input = &b"script: foo\n\xe2\x9c\x93 check1.\n"[..];
            let mut aggregator = SuiteAggregator::new();
            let mut signal_handler = SignalHandlerKind::Noop
                .build()
                .expect("noop handler builds");

            collect_lines(input, &mut aggregator, &mut signal_handler)
                .await
                .expect("collection succeeds");

            assert_eq!(aggregator.completed_suites().len(), 1);
            assert!(aggregator.all_passed());
        });
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn shutdown_signal_interrupts_collection() {
        use tokio::io::{AsyncWriteExt, BufReader};

        let (read_half, mut write_half) = tokio::io::duplex(64);
        let mut aggregator = SuiteAggregator::new();
        let mut signal_handler = SignalHandlerKind::Standard
            .build()
            .expect("standard handler builds");

        write_half
            .write_all(b"script: foo\n\xe2\x9c\x93 check1.\n")
            .await
            .expect("write succeeds");

        // The write half stays open, so the stream never ends on its own.
        // SIGHUP is the only way out of the loop.
        unsafe {
            libc::raise(libc::SIGHUP);
        }

        let result = collect_lines(
            BufReader::new(read_half),
            &mut aggregator,
            &mut signal_handler,
        )
        .await;

        assert!(matches!(result, Err(CollectStreamError::Interrupted)));
        // The open suite was discarded, not finalized.
        assert!(aggregator.completed_suites().is_empty());
    }
}
