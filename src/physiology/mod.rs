// ABOUTME: Physiological and physical models turning a road segment into a received dose
// ABOUTME: Power demand, heart-rate kinetics, power-history memory and particle deposition
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Physiology models
//!
//! Evaluation order for one segment is fixed:
//!
//! 1. [`power`]: mechanical power demand from speed, gradient and mass
//! 2. [`heart_rate`]: heart rate from rider power plus a perceived-power memory
//! 3. [`deposition`]: dose from ventilation, deposition fraction, duration and exposure
//!
//! [`segment::SubjectModel`] bundles the three for one subject. Every function
//! here is pure; the only state is the [`power_history::PowerHistory`], which
//! is owned by whoever walks a trajectory or route.

/// Particle deposition and received dose
pub mod deposition;
/// Heart-rate kinetics
pub mod heart_rate;
/// Biomechanical power demand
pub mod power;
/// Bounded perceived-power memory and its reset policy
pub mod power_history;
/// Per-subject segment evaluation
pub mod segment;

pub use deposition::{DoseModel, RespiratoryRegion};
pub use heart_rate::HeartRateModel;
pub use power::{PowerComponents, PowerModel};
pub use power_history::{HistoryReset, HistorySession, PowerHistory};
pub use segment::{SegmentInput, SegmentTraversal, SubjectModel};
