// ABOUTME: Shared helpers for the foodlab CLI
// ABOUTME: JSON output and graph store selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

pub mod display;
pub mod store;
