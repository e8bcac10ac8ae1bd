// Copyright (c) The k6-to-junit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced while collecting input and rendering reports.

use std::io;
use thiserror::Error;

/// An error that occurs while consuming the input line stream.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CollectStreamError {
    /// A shutdown signal arrived before the stream ended.
    ///
    /// The suite that was open at the time is discarded; no report should be
    /// produced from a partially-collected stream.
    #[error("input stream interrupted by signal")]
    Interrupted,

    /// Reading from the input stream failed.
    #[error("error reading input stream")]
    Read(#[source] io::Error),
}

/// An error that occurs while serializing a [`Report`](crate::Report).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SerializeError {
    /// Writing the XML document failed.
    #[error("error serializing XML")]
    Xml(#[from] quick_xml::Error),

    /// The serialized document was not valid UTF-8.
    #[error("serialized report is not valid UTF-8")]
    Utf8(#[source] std::str::Utf8Error),
}

/// An error that occurs while setting up the signal handler.
#[derive(Debug, Error)]
#[error("error setting up signal handler")]
pub struct SignalHandlerSetupError(#[from] io::Error);
