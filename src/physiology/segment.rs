// ABOUTME: Per-subject evaluation of one segment through power, heart rate and dose
// ABOUTME: Shared by graph annotation, route replay and trajectory evaluation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::deposition::DoseModel;
use super::heart_rate::HeartRateModel;
use super::power::PowerModel;
use crate::config::{ScenarioConfig, SubjectProfile};
use crate::constants::units::SECONDS_PER_MINUTE;
use crate::errors::ModelError;
use serde::{Deserialize, Serialize};

/// Geometry, timing and exposure of a segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentInput {
    /// Planar length (m)
    pub length_m: f64,
    /// Elevation change, end minus start (m)
    pub d_height_m: f64,
    /// Time spent on the segment (s)
    pub duration_s: f64,
    /// PM2.5 concentration while on the segment (µg/m³)
    pub exposure_ug_m3: f64,
}

/// Everything derived for one subject on one segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentTraversal {
    /// The segment evaluated
    pub input: SegmentInput,
    /// Mean velocity (m/s)
    pub velocity_mps: f64,
    /// Mechanical power demand (W, ≥ 0)
    pub mechanical_power_w: f64,
    /// Power delivered by the rider (W, ≥ 0)
    pub rider_power_w: f64,
    /// Sum of prior powers fed into the perceived-power term (W)
    pub prior_power_sum_w: f64,
    /// Heart rate at the end of the segment (bpm)
    pub heart_rate_bpm: f64,
    /// Received deposition dose (µg)
    pub dose_ug: f64,
}

impl SegmentTraversal {
    /// Mechanical energy demanded by the segment (J)
    #[must_use]
    pub fn energy_j(&self) -> f64 {
        self.mechanical_power_w * self.input.duration_s
    }
}

/// Power, heart-rate and dose models bound to one subject
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubjectModel {
    mass_kg: f64,
    power: PowerModel,
    heart_rate: HeartRateModel,
    dose: DoseModel,
}

impl SubjectModel {
    /// Build the models for `profile` under `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the configured particle diameter is out of domain
    pub fn new(profile: &SubjectProfile, config: &ScenarioConfig) -> Result<Self, ModelError> {
        Ok(Self {
            mass_kg: profile.mass_kg,
            power: PowerModel::new(config.physics),
            heart_rate: HeartRateModel::from_profile(profile),
            dose: DoseModel::new(
                profile.sex,
                config.deposition.mmd_um,
                config.deposition.region,
            )?,
        })
    }

    /// Heart-rate model in use
    #[must_use]
    pub const fn heart_rate_model(&self) -> &HeartRateModel {
        &self.heart_rate
    }

    /// Power model in use
    #[must_use]
    pub const fn power_model(&self) -> &PowerModel {
        &self.power
    }

    /// Evaluate a segment given the sum of prior segment powers
    ///
    /// # Errors
    ///
    /// Returns `ModelError` when the dose model rejects its input
    pub fn traverse(
        &self,
        input: SegmentInput,
        prior_power_sum_w: f64,
    ) -> Result<SegmentTraversal, ModelError> {
        let velocity_mps = if input.duration_s > 0.0 {
            input.length_m / input.duration_s
        } else {
            0.0
        };
        let mechanical_power_w = self.power.segment_power(
            velocity_mps,
            input.d_height_m,
            input.length_m,
            self.mass_kg,
        );
        let rider_power_w = mechanical_power_w / self.power.constants().mechanical_efficiency;
        let heart_rate_bpm = self.heart_rate.segment_heart_rate(
            rider_power_w,
            input.duration_s,
            prior_power_sum_w,
        );
        let dose_ug = self.dose.dose(
            heart_rate_bpm,
            input.duration_s.max(0.0) / SECONDS_PER_MINUTE,
            input.exposure_ug_m3,
        )?;

        Ok(SegmentTraversal {
            input,
            velocity_mps,
            mechanical_power_w,
            rider_power_w,
            prior_power_sum_w,
            heart_rate_bpm,
            dose_ug,
        })
    }
}
