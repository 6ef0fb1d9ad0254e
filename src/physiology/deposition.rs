// ABOUTME: Received deposition dose from ventilation, particle deposition and exposure
// ABOUTME: Sex-specific ventilation fits and ICRP-66 simplified regional deposition curves
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Received deposition dose (RDD)
//!
//! `RDD = VE(hr) × DF(d) × t × C / 1000`
//!
//! - `VE`: minute ventilation (L/min) from heart rate
//! - `DF`: fraction of inhaled particle mass deposited, from the
//!   mass-median diameter `d` (µm)
//! - `t`: duration (min), `C`: concentration (µg/m³)
//!
//! # Scientific References
//!
//! - ICRP Publication 66 (1994). Human Respiratory Tract Model for Radiological Protection.
//! - Hinds, W.C. (1999). *Aerosol Technology*, 2nd ed., eq. 11.1–11.5.
//! - Ramos, C.A. et al. (2015). "Estimating the inhaled dose of pollutants during
//!   indoor physical activity." *Sci Total Environ*, 527, 111-118.
//!
//! Out-of-domain input (non-finite heart rate, non-positive diameter,
//! negative duration or concentration) is rejected with [`ModelError`]
//! instead of producing NaN.

use crate::config::Sex;
use crate::constants::{deposition, units::LITRES_PER_CUBIC_METRE};
use crate::errors::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minute ventilation (L/min) at heart rate `hr_bpm`
///
/// # Errors
///
/// Returns `ModelError::NonFinite` if the heart rate or the result is not finite
pub fn ventilation_rate(sex: Sex, hr_bpm: f64) -> Result<f64, ModelError> {
    let hr = ModelError::ensure_finite("heart rate", hr_bpm)?;
    let exponent = match sex {
        Sex::Male => {
            deposition::MALE_VENTILATION_SLOPE.mul_add(hr, deposition::MALE_VENTILATION_INTERCEPT)
        }
        Sex::Female => deposition::FEMALE_VENTILATION_SLOPE
            .mul_add(hr, deposition::FEMALE_VENTILATION_INTERCEPT),
    };
    ModelError::ensure_finite("ventilation rate", exponent.exp())
}

/// Fraction of ambient particles entering the nose and mouth
///
/// # Errors
///
/// Returns an error unless `mmd_um` is finite and positive
pub fn inhaled_fraction(mmd_um: f64) -> Result<f64, ModelError> {
    let d = ModelError::ensure_positive("mass-median diameter", mmd_um)?;
    Ok(1.0 - 0.5 * (1.0 - 1.0 / 0.00076f64.mul_add(d.powf(2.8), 1.0)))
}

/// Total respiratory deposition fraction, see [`RespiratoryRegion::Total`]
///
/// # Errors
///
/// Returns an error unless `mmd_um` is finite and positive
pub fn deposition_fraction(mmd_um: f64) -> Result<f64, ModelError> {
    RespiratoryRegion::Total.deposition_fraction(mmd_um)
}

/// Region of the respiratory tract in which particles deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RespiratoryRegion {
    /// Nose, mouth, pharynx and larynx
    HeadAirways,
    /// Trachea down to the terminal bronchioles
    Tracheobronchial,
    /// Gas-exchange region
    Alveolar,
    /// Whole respiratory tract
    Total,
}

impl RespiratoryRegion {
    /// All regions, outermost first
    pub const ALL: [Self; 4] = [
        Self::HeadAirways,
        Self::Tracheobronchial,
        Self::Alveolar,
        Self::Total,
    ];

    /// Deposition fraction of inhaled particle mass for this region
    ///
    /// # Errors
    ///
    /// Returns an error unless `mmd_um` is finite and positive
    pub fn deposition_fraction(self, mmd_um: f64) -> Result<f64, ModelError> {
        let d = ModelError::ensure_positive("mass-median diameter", mmd_um)?;
        let ln_d = d.ln();

        let fraction = match self {
            Self::HeadAirways => {
                let inhaled = inhaled_fraction(d)?;
                inhaled
                    * (1.0 / (1.0 + 1.183f64.mul_add(ln_d, 6.84).exp())
                        + 1.0 / (1.0 + 1.885f64.mul_add(-ln_d, 0.924).exp()))
            }
            Self::Tracheobronchial => {
                (0.00352 / d)
                    * ((-0.234 * (ln_d + 3.40).powi(2)).exp()
                        + 63.9 * (-0.819 * (ln_d - 1.61).powi(2)).exp())
            }
            Self::Alveolar => {
                (0.0155 / d)
                    * ((-0.416 * (ln_d + 2.84).powi(2)).exp()
                        + 19.11 * (-0.482 * (ln_d - 1.362).powi(2)).exp())
            }
            Self::Total => {
                let inhaled = inhaled_fraction(d)?;
                inhaled
                    * (0.0587
                        + 0.911 / (1.0 + 1.485f64.mul_add(ln_d, 4.77).exp())
                        + 0.943 / (1.0 + 2.58f64.mul_add(-ln_d, 0.508).exp()))
            }
        };
        ModelError::ensure_finite("deposition fraction", fraction)
    }

    /// Region name as used in configuration
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::HeadAirways => "head_airways",
            Self::Tracheobronchial => "tracheobronchial",
            Self::Alveolar => "alveolar",
            Self::Total => "total",
        }
    }
}

impl fmt::Display for RespiratoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Received deposition dose (µg)
///
/// # Errors
///
/// Returns `ModelError` for a negative duration or exposure, a non-finite
/// heart rate, or a non-positive diameter. A zero duration returns exactly 0.
pub fn received_dose(
    sex: Sex,
    hr_bpm: f64,
    duration_min: f64,
    exposure_ug_m3: f64,
    mmd_um: f64,
) -> Result<f64, ModelError> {
    DoseModel::new(sex, mmd_um, RespiratoryRegion::Total)?.dose(
        hr_bpm,
        duration_min,
        exposure_ug_m3,
    )
}

/// Dose model for one subject with the deposition fraction precomputed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoseModel {
    sex: Sex,
    region: RespiratoryRegion,
    deposition_fraction: f64,
}

impl DoseModel {
    /// Create a dose model, evaluating the deposition fraction once
    ///
    /// # Errors
    ///
    /// Returns an error unless `mmd_um` is finite and positive
    pub fn new(sex: Sex, mmd_um: f64, region: RespiratoryRegion) -> Result<Self, ModelError> {
        Ok(Self {
            sex,
            region,
            deposition_fraction: region.deposition_fraction(mmd_um)?,
        })
    }

    /// Deposition fraction in use
    #[must_use]
    pub const fn deposition_fraction(&self) -> f64 {
        self.deposition_fraction
    }

    /// Region in use
    #[must_use]
    pub const fn region(&self) -> RespiratoryRegion {
        self.region
    }

    /// Dose (µg) received over `duration_min` minutes at `hr_bpm`
    ///
    /// # Errors
    ///
    /// See [`received_dose`]
    pub fn dose(
        &self,
        hr_bpm: f64,
        duration_min: f64,
        exposure_ug_m3: f64,
    ) -> Result<f64, ModelError> {
        let duration = ModelError::ensure_non_negative("duration", duration_min)?;
        if duration == 0.0 {
            return Ok(0.0);
        }
        let exposure = ModelError::ensure_non_negative("exposure", exposure_ug_m3)?;
        let ventilation = ventilation_rate(self.sex, hr_bpm)?;
        let dose = ventilation * self.deposition_fraction * duration * exposure
            / LITRES_PER_CUBIC_METRE;
        ModelError::ensure_finite("dose", dose)
    }
}
