// ABOUTME: Subject profiles describing each cyclist's physiology and nominal speed
// ABOUTME: Immutable records keyed by subject id, loaded from JSON and validated up front
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Subject profiles
//!
//! JSON documents use the short parameter names of the physiological model
//! (`hr_0`, `m`, `Tr`, `hr_max`, `c`, `kf`, `sex`, `v`):
//!
//! ```json
//! { "A": { "hr_0": 70, "m": 80, "Tr": 24, "hr_max": 180, "c": 0.2,
//!          "kf": 3e-5, "sex": "M", "v": 20 } }
//! ```

use super::error::ConfigError;
use crate::constants::units::MPS_PER_KPH;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Subject identifier, used verbatim in edge weight names (`rdd_{id}`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    /// Create a subject id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubjectId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for SubjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Biological sex category, selecting the ventilation-rate fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    /// Male ventilation fit
    #[serde(rename = "M", alias = "male", alias = "m")]
    Male,
    /// Female ventilation fit
    #[serde(rename = "F", alias = "female", alias = "f")]
    Female,
}

/// Physiological profile of one cyclist
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubjectProfile {
    /// Resting heart rate (bpm)
    #[serde(rename = "hr_0")]
    pub resting_hr: f64,
    /// Mass of rider and bicycle (kg)
    #[serde(rename = "m")]
    pub mass_kg: f64,
    /// Heart-rate rise time constant (s)
    #[serde(rename = "Tr")]
    pub rise_time_s: f64,
    /// Maximum heart rate (bpm)
    pub hr_max: f64,
    /// Heart-rate gain per watt (bpm/W)
    #[serde(rename = "c")]
    pub gain: f64,
    /// Weight of the perceived-power memory term
    #[serde(rename = "kf")]
    pub memory_weight: f64,
    /// Sex category
    pub sex: Sex,
    /// Nominal cruising speed (km/h); required for graph annotation only
    #[serde(rename = "v", default, skip_serializing_if = "Option::is_none")]
    pub speed_kph: Option<f64>,
}

impl SubjectProfile {
    /// Nominal speed in m/s
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` when the profile has no speed
    pub fn nominal_speed_mps(&self) -> Result<f64, ConfigError> {
        self.speed_kph
            .map(|kph| kph * MPS_PER_KPH)
            .ok_or(ConfigError::MissingField("v (nominal speed, km/h)"))
    }

    /// Check physiological plausibility of every field
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidProfile` describing the first bad field
    pub fn validate(&self, subject: &SubjectId) -> Result<(), ConfigError> {
        let fail = |reason: &str| ConfigError::InvalidProfile {
            subject: subject.to_string(),
            reason: reason.to_owned(),
        };

        let fields = [
            self.resting_hr,
            self.mass_kg,
            self.rise_time_s,
            self.hr_max,
            self.gain,
            self.memory_weight,
        ];
        if fields.iter().any(|value| !value.is_finite()) {
            return Err(fail("all parameters must be finite"));
        }
        if self.resting_hr <= 0.0 {
            return Err(fail("resting heart rate must be positive"));
        }
        if self.hr_max <= self.resting_hr {
            return Err(fail("maximum heart rate must exceed resting heart rate"));
        }
        if self.mass_kg <= 0.0 {
            return Err(fail("mass must be positive"));
        }
        if self.rise_time_s <= 0.0 {
            return Err(fail("rise time constant must be positive"));
        }
        if self.gain < 0.0 || self.memory_weight < 0.0 {
            return Err(fail("gain and memory weight must be non-negative"));
        }
        if let Some(speed) = self.speed_kph {
            if !speed.is_finite() || speed <= 0.0 {
                return Err(fail("nominal speed must be positive"));
            }
        }
        Ok(())
    }
}

/// Mapping from subject id to profile, ordered by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileSet(BTreeMap<SubjectId, SubjectProfile>);

impl ProfileSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a profile
    #[must_use]
    pub fn with(mut self, id: impl Into<SubjectId>, profile: SubjectProfile) -> Self {
        self.0.insert(id.into(), profile);
        self
    }

    /// Parse a JSON document and validate every profile
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON or missing fields, and
    /// `ConfigError::InvalidProfile` for implausible values
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let set: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        set.validate()?;
        Ok(set)
    }

    /// Read and parse a JSON profile file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the file cannot be read or parsed
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Validate every profile
    ///
    /// # Errors
    ///
    /// Returns the first invalid profile
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.0.iter().try_for_each(|(id, profile)| profile.validate(id))
    }

    /// Validate for graph annotation, which additionally needs a nominal speed
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` for an empty set, and
    /// `ConfigError::InvalidProfile` for a profile without speed
    pub fn validate_for_routing(&self) -> Result<(), ConfigError> {
        if self.0.is_empty() {
            return Err(ConfigError::MissingField("at least one subject profile"));
        }
        self.validate()?;
        for (id, profile) in &self.0 {
            if profile.speed_kph.is_none() {
                return Err(ConfigError::InvalidProfile {
                    subject: id.to_string(),
                    reason: "nominal speed 'v' is required for routing".into(),
                });
            }
        }
        Ok(())
    }

    /// Look up a profile
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownSubject` if the id is absent
    pub fn get(&self, id: &SubjectId) -> Result<&SubjectProfile, ConfigError> {
        self.0
            .get(id)
            .ok_or_else(|| ConfigError::UnknownSubject(id.to_string()))
    }

    /// Iterate profiles in id order
    pub fn iter(&self) -> impl Iterator<Item = (&SubjectId, &SubjectProfile)> {
        self.0.iter()
    }

    /// Number of profiles
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
