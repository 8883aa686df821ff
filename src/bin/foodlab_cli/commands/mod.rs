// ABOUTME: Command implementations for the foodlab CLI
// ABOUTME: One module per top-level subcommand
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

pub mod compose;
pub mod ndb;
pub mod recipe;
pub mod schema;
