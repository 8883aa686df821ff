// ABOUTME: Interactive recipe composer driven by NDB search and the recipe persistence layer
// ABOUTME: Works over any BufRead/Write pair so it runs on a terminal or scripted input
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

/// Prompting and answer parsing
pub mod prompt;
/// Composition state machine
pub mod session;

pub use session::{ComposeOutcome, ComposerConfig, ComposerSession};
