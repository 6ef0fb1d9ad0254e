// ABOUTME: Heart-rate kinetics driven by rider power and a perceived-power memory term
// ABOUTME: Steady-state target with exponential, non-overshooting approach from resting HR
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Heart-rate kinetics
//!
//! Two stages:
//!
//! - **Steady state**: `hr_ss = hr0 + c·P_perceived`, capped at `hr_max`
//! - **Transient**: `hr = hr_ss + (hr0 − hr_ss)·exp(−t)` where `t` is the
//!   segment duration normalised by the rise time constant `Tr`
//!
//! The transient value is returned while it is still below the steady-state
//! target, otherwise the target itself, so the response rises
//! asymptotically and never overshoots. `P_perceived = P + kf·ΣP_prior`
//! carries fatigue from the preceding segments.

use crate::config::SubjectProfile;

/// Heart-rate response parameters of one subject
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartRateModel {
    /// Resting heart rate (bpm)
    pub resting_hr: f64,
    /// Maximum heart rate (bpm)
    pub hr_max: f64,
    /// Gain (bpm/W)
    pub gain: f64,
    /// Weight of prior power in the perceived-power term
    pub memory_weight: f64,
    /// Rise time constant (s)
    pub rise_time_s: f64,
}

impl HeartRateModel {
    /// Extract the heart-rate parameters of a profile
    #[must_use]
    pub const fn from_profile(profile: &SubjectProfile) -> Self {
        Self {
            resting_hr: profile.resting_hr,
            hr_max: profile.hr_max,
            gain: profile.gain,
            memory_weight: profile.memory_weight,
            rise_time_s: profile.rise_time_s,
        }
    }

    /// Instantaneous power plus the weighted sum of prior powers (W)
    #[must_use]
    pub fn perceived_power(&self, power_w: f64, prior_power_sum_w: f64) -> f64 {
        self.memory_weight.mul_add(prior_power_sum_w, power_w)
    }

    /// Segment duration expressed in rise-time constants
    #[must_use]
    pub fn normalized_duration(&self, duration_s: f64) -> f64 {
        if duration_s.is_finite() && duration_s > 0.0 {
            duration_s / self.rise_time_s
        } else {
            0.0
        }
    }

    /// Heart rate the subject settles to under constant `perceived_power_w`
    #[must_use]
    pub fn steady_state(&self, perceived_power_w: f64) -> f64 {
        self.gain
            .mul_add(perceived_power_w.max(0.0), self.resting_hr)
            .min(self.hr_max)
    }

    /// Heart rate reached after `normalized_t` rise-time constants.
    ///
    /// The result always lies in `[resting_hr, hr_max]`.
    #[must_use]
    pub fn transient(&self, perceived_power_w: f64, normalized_t: f64) -> f64 {
        let target = self.steady_state(perceived_power_w);
        if target >= self.hr_max {
            return self.hr_max;
        }
        let hr = (self.resting_hr - target).mul_add((-normalized_t.max(0.0)).exp(), target);
        let hr = if hr < target { hr } else { target };
        hr.max(self.resting_hr).min(self.hr_max)
    }

    /// Heart rate at the end of a segment of `duration_s` seconds at
    /// `power_w`, given the sum of prior segment powers
    #[must_use]
    pub fn segment_heart_rate(&self, power_w: f64, duration_s: f64, prior_power_sum_w: f64) -> f64 {
        let perceived = self.perceived_power(power_w, prior_power_sum_w);
        self.transient(perceived, self.normalized_duration(duration_s))
    }
}
