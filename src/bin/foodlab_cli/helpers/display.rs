// ABOUTME: Output helpers for the foodlab CLI
// ABOUTME: Every command result is written to stdout as pretty JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use foodlab::{AppError, AppResult};
use serde::Serialize;
use std::io::{self, Write};

/// Write `value` to stdout as pretty JSON followed by a newline
pub fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout).map_err(|e| AppError::internal(format!("failed to write output: {e}")))
}
