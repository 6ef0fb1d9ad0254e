// ABOUTME: Main library entry point for cyclist inhaled-dose estimation and routing
// ABOUTME: Couples power, heart-rate and deposition models with graph search and statistics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Cycle Exposure
//!
//! Estimates the particulate dose a cyclist inhales along a route and uses
//! that estimate to search a road network for exposure-minimising paths.
//!
//! ## Architecture
//!
//! Data flows one way, leaf to root:
//!
//! - **Physiology**: mechanical power, heart-rate kinetics with a
//!   perceived-power memory, and the received deposition dose (pure functions)
//! - **Network**: the road multigraph and the annotation engine that writes
//!   per-subject energy, dose, time and cost onto every edge
//! - **Routing**: shortest-path search under a chosen weight key and
//!   aggregation of every metric along the returned route
//! - **Comparator**: Monte-Carlo sampling of origin/destination pairs and a
//!   one-sided two-sample t-test between routing strategies
//! - **Trajectory**: dose along a recorded, calibrated commute
//!
//! Annotation takes the network mutably; search and comparison borrow it
//! immutably, so "annotate, then query" is enforced by the borrow checker.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cycle_exposure::config::{ScenarioConfig, ProfileSet};
//! use cycle_exposure::network::{AnnotationEngine, RoadNetwork};
//! use cycle_exposure::routing::{DijkstraSearch, RouteAggregator};
//! use cycle_exposure::errors::AppResult;
//!
//! fn run(mut network: RoadNetwork, profiles: &ProfileSet) -> AppResult<()> {
//!     let config = ScenarioConfig::from_env()?;
//!     AnnotationEngine::new(&config).annotate(&mut network, profiles)?;
//!
//!     let aggregator = RouteAggregator::new(&network, DijkstraSearch);
//!     let key = "rdd_A".parse()?;
//!     if let Some(summary) = aggregator.evaluate(1, 42, &key)? {
//!         println!("{:.2} ug over {:.0} m", summary.rdd_ug, summary.length_m);
//!     }
//!     Ok(())
//! }
//! ```

/// Unified error handling re-exported from the core crate
pub mod errors;

/// Model constants re-exported from the core crate
pub mod constants;

/// Logging configuration and subscriber setup
pub mod logging;

/// Scenario configuration and subject profiles
pub mod config;

/// Power, heart-rate and deposition-dose models
pub mod physiology;

/// Road network storage and per-subject edge annotation
pub mod network;

/// Route search and route-level metric aggregation
pub mod routing;

/// Dose evaluation along recorded trajectories
pub mod trajectory;

/// Descriptive statistics and two-sample significance tests
pub mod statistics;

/// Monte-Carlo comparison of routing strategies
pub mod comparator;

/// Summary rows consumed by reporting collaborators
pub mod reporting;
