// ABOUTME: Scenario configuration threading every model constant through explicit structs
// ABOUTME: Provides defaults, EXPOSURE_* environment overrides, and fail-fast validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Scenario configuration
//!
//! Every constant a model needs is carried by one of these structs instead of
//! module-level globals, so two scenarios with different physics or cost
//! weights can run side by side in the same process.

use super::error::ConfigError;
use crate::constants::{
    deposition, env_config, heart_rate, physics, routing, trajectory, units,
};
use crate::physiology::{HistoryReset, RespiratoryRegion};
use crate::statistics::TTestKind;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing::{debug, info};

/// Physical constants of the power model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConstants {
    /// Gravitational acceleration (m/s²)
    pub gravity: f64,
    /// Aerodynamic drag coefficient
    pub drag_coefficient: f64,
    /// Frontal area (m²)
    pub frontal_area_m2: f64,
    /// Rolling resistance coefficient
    pub rolling_resistance: f64,
    /// Air density (kg/m³)
    pub air_density: f64,
    /// Drivetrain efficiency in (0, 1]
    pub mechanical_efficiency: f64,
}

impl Default for PhysicsConstants {
    fn default() -> Self {
        Self {
            gravity: physics::GRAVITY,
            drag_coefficient: physics::DRAG_COEFFICIENT,
            frontal_area_m2: physics::FRONTAL_AREA_M2,
            rolling_resistance: physics::ROLLING_RESISTANCE,
            air_density: physics::AIR_DENSITY,
            mechanical_efficiency: physics::MECHANICAL_EFFICIENCY,
        }
    }
}

impl PhysicsConstants {
    fn validate(&self) -> Result<(), ConfigError> {
        let all_finite = [
            self.gravity,
            self.drag_coefficient,
            self.frontal_area_m2,
            self.rolling_resistance,
            self.air_density,
            self.mechanical_efficiency,
        ]
        .iter()
        .all(|value| value.is_finite());
        if !all_finite {
            return Err(ConfigError::InvalidRange("physics constants must be finite"));
        }
        if self.gravity <= 0.0 || self.air_density <= 0.0 {
            return Err(ConfigError::InvalidRange(
                "gravity and air density must be positive",
            ));
        }
        if self.drag_coefficient < 0.0
            || self.frontal_area_m2 < 0.0
            || self.rolling_resistance < 0.0
        {
            return Err(ConfigError::InvalidRange(
                "drag, frontal area and rolling resistance must be non-negative",
            ));
        }
        if self.mechanical_efficiency <= 0.0 || self.mechanical_efficiency > 1.0 {
            return Err(ConfigError::InvalidRange(
                "mechanical efficiency must lie in (0, 1]",
            ));
        }
        Ok(())
    }
}

/// Particle deposition settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepositionConfig {
    /// Mass-median diameter of the inhaled aerosol (µm)
    pub mmd_um: f64,
    /// Respiratory region whose deposition fraction drives the dose
    pub region: RespiratoryRegion,
}

impl Default for DepositionConfig {
    fn default() -> Self {
        Self {
            mmd_um: deposition::DEFAULT_MMD_UM,
            region: RespiratoryRegion::Total,
        }
    }
}

/// Perceived-power memory settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Number of prior segment powers remembered
    pub window: usize,
    /// When the memory is cleared during trajectory and route replay
    pub reset: HistoryReset,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            window: heart_rate::DEFAULT_HISTORY_WINDOW,
            reset: HistoryReset::PerRoute,
        }
    }
}

/// Composite routing cost `dose_weight·dose² + time_weight·(time / 60)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeCost {
    /// Weight of the squared dose term (per µg²)
    pub dose_weight: f64,
    /// Weight of the travel-time term (per minute)
    pub time_weight: f64,
}

impl Default for CompositeCost {
    fn default() -> Self {
        Self {
            dose_weight: routing::COST_DOSE_WEIGHT,
            time_weight: routing::COST_TIME_WEIGHT,
        }
    }
}

impl CompositeCost {
    /// Evaluate the cost of a segment given its dose (µg) and travel time (s)
    #[must_use]
    pub fn evaluate(&self, dose_ug: f64, travel_time_s: f64) -> f64 {
        let minutes = travel_time_s / units::SECONDS_PER_MINUTE;
        self.dose_weight
            .mul_add(dose_ug * dose_ug, self.time_weight * minutes)
    }
}

/// Exposure baseline used when annotating the network
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureConfig {
    /// Ambient PM2.5 concentration (µg/m³)
    pub ambient_pm25: f64,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            ambient_pm25: routing::DEFAULT_AMBIENT_PM25,
        }
    }
}

/// Monte-Carlo comparator settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    /// Number of origin/destination trials
    pub trials: usize,
    /// RNG seed; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Significance level used to label the outcome
    pub significance: f64,
    /// Variance assumption of the two-sample test
    pub test: TTestKind,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            trials: routing::DEFAULT_TRIALS,
            seed: None,
            significance: routing::DEFAULT_SIGNIFICANCE,
            test: TTestKind::Student,
        }
    }
}

/// Trajectory processing settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectoryConfig {
    /// Upper clamp on calibrated concentrations; `None` disables it
    pub concentration_cap: Option<f64>,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            concentration_cap: Some(trajectory::DEFAULT_CONCENTRATION_CAP),
        }
    }
}

/// Complete scenario configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Power model constants
    pub physics: PhysicsConstants,
    /// Deposition model settings
    pub deposition: DepositionConfig,
    /// Perceived-power memory settings
    pub history: HistoryConfig,
    /// Composite routing cost
    pub cost: CompositeCost,
    /// Annotation exposure baseline
    pub exposure: ExposureConfig,
    /// Monte-Carlo comparator settings
    pub monte_carlo: MonteCarloConfig,
    /// Trajectory settings
    pub trajectory: TrajectoryConfig,
}

impl ScenarioConfig {
    /// Load defaults overridden by `EXPOSURE_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for unparseable values and any error
    /// raised by [`ScenarioConfig::validate`]
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading scenario configuration from environment variables");
        let mut config = Self::default();

        if let Some(value) = env_parse(env_config::AMBIENT_PM25)? {
            config.exposure.ambient_pm25 = value;
        }
        if let Some(value) = env_parse(env_config::MMD_UM)? {
            config.deposition.mmd_um = value;
        }
        if let Some(value) = env_parse(env_config::HISTORY_WINDOW)? {
            config.history.window = value;
        }
        if let Some(value) = env_parse(env_config::HISTORY_RESET)? {
            config.history.reset = value;
        }
        if let Some(value) = env_parse(env_config::TRIALS)? {
            config.monte_carlo.trials = value;
        }
        if let Some(value) = env_parse(env_config::SEED)? {
            config.monte_carlo.seed = Some(value);
        }
        if let Some(value) = env_parse(env_config::COST_DOSE_WEIGHT)? {
            config.cost.dose_weight = value;
        }
        if let Some(value) = env_parse(env_config::COST_TIME_WEIGHT)? {
            config.cost.time_weight = value;
        }
        if let Ok(raw) = env::var(env_config::CONCENTRATION_CAP) {
            config.trajectory.concentration_cap = if raw.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(parse_value(env_config::CONCENTRATION_CAP, &raw)?)
            };
        }

        config.validate()?;
        debug!(?config, "Scenario configuration loaded");
        Ok(config)
    }

    /// Parse a JSON scenario document; missing sections take their defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` on malformed JSON, or a validation error
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;

        if !self.deposition.mmd_um.is_finite() || self.deposition.mmd_um <= 0.0 {
            return Err(ConfigError::InvalidRange(
                "mass-median diameter must be positive",
            ));
        }
        if self.history.window == 0 && self.history.reset != HistoryReset::PerEdge {
            return Err(ConfigError::InvalidRange(
                "history window must be at least 1 unless reset per edge",
            ));
        }
        if !self.cost.dose_weight.is_finite()
            || !self.cost.time_weight.is_finite()
            || self.cost.dose_weight < 0.0
            || self.cost.time_weight < 0.0
        {
            return Err(ConfigError::InvalidRange(
                "composite cost weights must be finite and non-negative",
            ));
        }
        if !self.exposure.ambient_pm25.is_finite() || self.exposure.ambient_pm25 < 0.0 {
            return Err(ConfigError::InvalidRange(
                "ambient concentration must be non-negative",
            ));
        }
        if self.monte_carlo.trials == 0 {
            return Err(ConfigError::InvalidRange("trial count must be positive"));
        }
        let alpha = self.monte_carlo.significance;
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(ConfigError::InvalidRange(
                "significance level must lie in (0, 1)",
            ));
        }
        if let Some(cap) = self.trajectory.concentration_cap {
            if !cap.is_finite() || cap <= 0.0 {
                return Err(ConfigError::InvalidRange(
                    "concentration cap must be positive",
                ));
            }
        }
        Ok(())
    }
}

fn env_parse<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ConfigError::Parse(format!("Invalid {key} value '{raw}': {e}")))
}
