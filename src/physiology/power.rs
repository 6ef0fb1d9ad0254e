// ABOUTME: Biomechanical power model for cycling a road segment at constant speed
// ABOUTME: Sums gravitational, aerodynamic and rolling terms, floored at zero
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Mechanical power demand
//!
//! `P = g·m·(Δh / l)·v + ½·Cd·ρ·A·v³ + Cr·m·g·v`
//!
//! The sum is floored at zero so that a descent cannot produce negative
//! power that would cancel climbing cost elsewhere on a route. Degenerate
//! geometry (`l ≤ 0`, `v ≤ 0`) or non-finite input yields exactly zero
//! rather than a division-by-zero artefact.

use crate::config::PhysicsConstants;
use serde::{Deserialize, Serialize};

/// The three additive power terms of a segment (W), before flooring
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerComponents {
    /// Work against gravity; negative downhill
    pub gravitational_w: f64,
    /// Aerodynamic drag
    pub aerodynamic_w: f64,
    /// Rolling resistance
    pub rolling_w: f64,
}

impl PowerComponents {
    /// Net mechanical power, floored at zero
    #[must_use]
    pub fn total(&self) -> f64 {
        (self.gravitational_w + self.aerodynamic_w + self.rolling_w).max(0.0)
    }
}

/// Power model bound to a set of physical constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerModel {
    constants: PhysicsConstants,
}

impl PowerModel {
    /// Create a power model
    #[must_use]
    pub const fn new(constants: PhysicsConstants) -> Self {
        Self { constants }
    }

    /// Constants in use
    #[must_use]
    pub const fn constants(&self) -> &PhysicsConstants {
        &self.constants
    }

    /// Split the demand into its three terms.
    ///
    /// Returns all-zero components for degenerate or non-finite input.
    #[must_use]
    pub fn components(
        &self,
        velocity_mps: f64,
        d_height_m: f64,
        length_m: f64,
        mass_kg: f64,
    ) -> PowerComponents {
        let inputs = [velocity_mps, d_height_m, length_m, mass_kg];
        if inputs.iter().any(|x| !x.is_finite()) || length_m <= 0.0 || velocity_mps <= 0.0 {
            return PowerComponents::default();
        }

        let c = &self.constants;
        let slope = d_height_m / length_m;
        PowerComponents {
            gravitational_w: c.gravity * mass_kg * slope * velocity_mps,
            aerodynamic_w: 0.5
                * c.drag_coefficient
                * c.air_density
                * c.frontal_area_m2
                * velocity_mps.powi(3),
            rolling_w: c.rolling_resistance * mass_kg * c.gravity * velocity_mps,
        }
    }

    /// Mechanical power needed to hold `velocity_mps` over the segment (W, ≥ 0)
    #[must_use]
    pub fn segment_power(
        &self,
        velocity_mps: f64,
        d_height_m: f64,
        length_m: f64,
        mass_kg: f64,
    ) -> f64 {
        self.components(velocity_mps, d_height_m, length_m, mass_kg)
            .total()
    }

    /// Power the rider must deliver at the pedals, i.e. mechanical power
    /// divided by drivetrain efficiency (W, ≥ 0)
    #[must_use]
    pub fn rider_power(
        &self,
        velocity_mps: f64,
        d_height_m: f64,
        length_m: f64,
        mass_kg: f64,
    ) -> f64 {
        self.segment_power(velocity_mps, d_height_m, length_m, mass_kg)
            / self.constants.mechanical_efficiency
    }
}

impl Default for PowerModel {
    fn default() -> Self {
        Self::new(PhysicsConstants::default())
    }
}
