// ABOUTME: Configuration module for scenario parameters and subject profiles
// ABOUTME: Handles defaults, environment overrides, JSON profile loading and validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! - **Scenario**: physics constants, deposition, power-history policy,
//!   composite cost, exposure baseline, Monte-Carlo and trajectory settings
//! - **Profiles**: immutable subject profiles keyed by subject id
//! - **Error**: configuration error variants, all fatal before annotation

/// Configuration error types
pub mod error;
/// Subject profile records and profile sets
pub mod profiles;
/// Scenario-level configuration
pub mod scenario;

pub use error::ConfigError;
pub use profiles::{ProfileSet, Sex, SubjectId, SubjectProfile};
pub use scenario::{
    CompositeCost, DepositionConfig, ExposureConfig, HistoryConfig, MonteCarloConfig,
    PhysicsConstants, ScenarioConfig, TrajectoryConfig,
};
