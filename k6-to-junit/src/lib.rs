// Copyright (c) The k6-to-junit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Convert k6 load-test console output into JUnit XML for CI systems.
//!
//! This crate is the command-line front end; the parsing, aggregation and
//! rendering logic lives in `k6-junit-core`.

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::*;
