// Copyright (c) The k6-to-junit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::Parser;
use color_eyre::Result;
use k6_to_junit::K6ToJunitApp;

fn main() -> Result<()> {
    color_eyre::install()?;

    let app = K6ToJunitApp::parse();
    let output = app.init_output();

    match app.exec() {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            error.display_to_stderr(&output.stderr_styles());
            std::process::exit(error.process_exit_code())
        }
    }
}
