// ABOUTME: Physical, physiological and routing constants organized by domain
// ABOUTME: Default values for scenario configuration; overridable at runtime
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Default constants for the exposure models.
//!
//! These are defaults only. Every value used by a model is threaded through
//! an explicit configuration structure so that scenarios can override it.

/// Bicycle and environment physics
///
/// References:
/// - Wilson, D.G. (2004). Bicycling Science, 3rd Edition. MIT Press.
pub mod physics {
    /// Gravitational acceleration (m/s²)
    pub const GRAVITY: f64 = 9.81;

    /// Aerodynamic drag coefficient of an upright commuter
    pub const DRAG_COEFFICIENT: f64 = 0.7;

    /// Frontal area of rider and bicycle (m²)
    pub const FRONTAL_AREA_M2: f64 = 0.5;

    /// Rolling resistance coefficient
    pub const ROLLING_RESISTANCE: f64 = 0.001;

    /// Air density at sea level, 15 °C (kg/m³)
    pub const AIR_DENSITY: f64 = 1.225;

    /// Drivetrain mechanical efficiency
    pub const MECHANICAL_EFFICIENCY: f64 = 0.97;
}

/// Ventilation and particle deposition
///
/// References:
/// - ICRP Publication 66 (1994). Human Respiratory Tract Model for Radiological Protection.
/// - Hinds, W.C. (1999). Aerosol Technology, 2nd Edition, ch. 11.
pub mod deposition {
    /// Male minute-ventilation fit: `exp(slope·hr + intercept)`
    pub const MALE_VENTILATION_SLOPE: f64 = 0.021;
    /// Male minute-ventilation intercept
    pub const MALE_VENTILATION_INTERCEPT: f64 = 1.03;
    /// Female minute-ventilation fit slope
    pub const FEMALE_VENTILATION_SLOPE: f64 = 0.023;
    /// Female minute-ventilation intercept
    pub const FEMALE_VENTILATION_INTERCEPT: f64 = 0.57;

    /// Average mass-median diameter of PM received while cycling (µm)
    pub const DEFAULT_MMD_UM: f64 = 0.53;
}

/// Heart-rate kinetics
pub mod heart_rate {
    /// Number of prior segment powers kept in the perceived-power memory
    pub const DEFAULT_HISTORY_WINDOW: usize = 20;
}

/// Graph annotation, routing and comparison defaults
pub mod routing {
    /// Ambient PM2.5 concentration used as the annotation baseline (µg/m³)
    pub const DEFAULT_AMBIENT_PM25: f64 = 10.0;

    /// Quadratic dose weight of the composite cost
    pub const COST_DOSE_WEIGHT: f64 = 0.05;

    /// Linear weight on travel minutes of the composite cost
    pub const COST_TIME_WEIGHT: f64 = 0.5;

    /// Number of Monte-Carlo origin/destination trials
    pub const DEFAULT_TRIALS: usize = 500;

    /// Significance level used to label comparator outcomes
    pub const DEFAULT_SIGNIFICANCE: f64 = 0.05;
}

/// Trajectory processing
pub mod trajectory {
    /// Upper clamp applied to calibrated PM2.5 concentrations (µg/m³)
    pub const DEFAULT_CONCENTRATION_CAP: f64 = 85.0;
}

/// Unit conversions
pub mod units {
    /// Seconds per minute
    pub const SECONDS_PER_MINUTE: f64 = 60.0;

    /// Litres per cubic metre
    pub const LITRES_PER_CUBIC_METRE: f64 = 1000.0;

    /// Metres per second in one kilometre per hour
    pub const MPS_PER_KPH: f64 = 1000.0 / 3600.0;

    /// Mean earth radius used for great-circle distances (m)
    pub const EARTH_RADIUS_M: f64 = 6_371_009.0;
}

/// Environment variable names for scenario overrides
pub mod env_config {
    /// Ambient PM2.5 baseline (µg/m³)
    pub const AMBIENT_PM25: &str = "EXPOSURE_AMBIENT_PM25";
    /// Particle mass-median diameter (µm)
    pub const MMD_UM: &str = "EXPOSURE_MMD_UM";
    /// Perceived-power memory window
    pub const HISTORY_WINDOW: &str = "EXPOSURE_HISTORY_WINDOW";
    /// Power-history reset policy (`per_edge`, `per_route`, `never`)
    pub const HISTORY_RESET: &str = "EXPOSURE_HISTORY_RESET";
    /// Monte-Carlo trial count
    pub const TRIALS: &str = "EXPOSURE_TRIALS";
    /// Monte-Carlo RNG seed
    pub const SEED: &str = "EXPOSURE_SEED";
    /// Composite cost dose weight
    pub const COST_DOSE_WEIGHT: &str = "EXPOSURE_COST_DOSE_WEIGHT";
    /// Composite cost time weight
    pub const COST_TIME_WEIGHT: &str = "EXPOSURE_COST_TIME_WEIGHT";
    /// Trajectory concentration cap; `none` disables clamping
    pub const CONCENTRATION_CAP: &str = "EXPOSURE_CONCENTRATION_CAP";
}
