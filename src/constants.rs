// ABOUTME: Model constants re-exported from exposure-core
// ABOUTME: Physics, deposition, routing, unit and environment-variable constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use exposure_core::constants::*;
