// ABOUTME: Core types and constants for cyclist inhaled-dose estimation
// ABOUTME: Foundation crate with error handling and physical/physiological constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Exposure Core
//!
//! Foundation crate providing shared types and constants for the exposure
//! estimation and routing workspace. This crate is designed to change
//! infrequently, enabling incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `ModelError`
//! - **constants**: Physical, physiological and routing defaults organized by domain

/// Unified error handling system with standard error codes
pub mod errors;

/// Model constants and default values organized by domain
pub mod constants;
