// ABOUTME: Error handling re-exported from exposure-core for crate-internal use
// ABOUTME: Keeps `crate::errors::AppError` stable for all modules and downstream users
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! All error types live in the `exposure-core` crate so that they compile
//! once and can be shared across the workspace.

pub use exposure_core::errors::{AppError, AppResult, ErrorCode, ModelError};
