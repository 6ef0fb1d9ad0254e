// ABOUTME: Dose evaluation along a recorded, calibrated GPS trajectory
// ABOUTME: Converts timestamped points to segments and walks them with a carried power history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Trajectory evaluation
//!
//! Consecutive points form a segment: great-circle distance, elapsed time,
//! altitude change, and the concentration recorded at the segment's start.
//! A stationary segment is kept and evaluated at zero velocity.

use crate::config::{HistoryConfig, ScenarioConfig, SubjectId, SubjectProfile};
use crate::errors::{AppError, AppResult};
use crate::network::graph::great_circle_m;
use crate::physiology::{HistorySession, SegmentInput, SegmentTraversal, SubjectModel};
use crate::statistics::SummaryStatistics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One calibrated sample of a recorded ride
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// Sample time
    pub timestamp: DateTime<Utc>,
    /// Latitude (degrees)
    pub latitude: f64,
    /// Longitude (degrees)
    pub longitude: f64,
    /// Altitude (m)
    pub altitude_m: f64,
    /// Calibrated PM2.5 concentration (µg/m³)
    pub pm25: f64,
}

/// Convert points into segments.
///
/// # Errors
///
/// Returns `InvalidInput` for non-finite coordinates, negative
/// concentrations, or timestamps that are not strictly increasing
pub fn segments(
    points: &[TrajectoryPoint],
    concentration_cap: Option<f64>,
) -> AppResult<Vec<SegmentInput>> {
    for (i, point) in points.iter().enumerate() {
        let finite = [point.latitude, point.longitude, point.altitude_m, point.pm25]
            .iter()
            .all(|value| value.is_finite());
        if !finite || point.pm25 < 0.0 {
            return Err(AppError::invalid_input(format!(
                "Trajectory point {i} has non-finite values or a negative concentration"
            )));
        }
    }

    let mut inputs = Vec::with_capacity(points.len().saturating_sub(1));
    for (i, pair) in points.windows(2).enumerate() {
        let [start, end] = pair else { continue };
        if end.timestamp <= start.timestamp {
            return Err(AppError::invalid_input(format!(
                "Trajectory timestamps must strictly increase (point {} at {} follows {})",
                i + 1,
                end.timestamp,
                start.timestamp
            )));
        }
        let duration_s = (end.timestamp - start.timestamp)
            .to_std()
            .map_err(|e| AppError::internal(format!("negative duration: {e}")))?
            .as_secs_f64();
        let length_m = great_circle_m(start.latitude, start.longitude, end.latitude, end.longitude);
        let d_height_m = end.altitude_m - start.altitude_m;
        let exposure_ug_m3 = concentration_cap.map_or(start.pm25, |cap| start.pm25.min(cap));
        inputs.push(SegmentInput {
            length_m,
            d_height_m,
            duration_s,
            exposure_ug_m3,
        });
    }
    Ok(inputs)
}

/// Dose received along a trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryDose {
    /// Per-segment evaluations with the carried power history
    pub segments: Vec<SegmentTraversal>,
    /// Total dose with the power history (µg)
    pub total_rdd_ug: f64,
    /// Total dose with every segment evaluated on an empty history (µg)
    pub total_rdd_without_history_ug: f64,
}

impl TrajectoryDose {
    /// Relative change (%) of the dose when the history term is ignored.
    ///
    /// `None` when the history-carrying dose is zero.
    #[must_use]
    pub fn history_effect_percent(&self) -> Option<f64> {
        (self.total_rdd_ug > 0.0).then(|| {
            (self.total_rdd_without_history_ug - self.total_rdd_ug) / self.total_rdd_ug * 100.0
        })
    }

    /// Total mechanical energy (J)
    #[must_use]
    pub fn energy_j(&self) -> f64 {
        self.segments.iter().map(SegmentTraversal::energy_j).sum()
    }

    /// Summary of the per-segment doses
    #[must_use]
    pub fn dose_summary(&self) -> Option<SummaryStatistics> {
        let doses: Vec<f64> = self.segments.iter().map(|segment| segment.dose_ug).collect();
        SummaryStatistics::from_sample(&doses)
    }
}

/// Walks trajectories for one subject
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryEvaluator {
    subject: SubjectId,
    model: SubjectModel,
    history: HistoryConfig,
    concentration_cap: Option<f64>,
}

impl TrajectoryEvaluator {
    /// Bind a subject profile to a scenario
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid profile or scenario
    pub fn new(
        subject: SubjectId,
        profile: &SubjectProfile,
        config: &ScenarioConfig,
    ) -> AppResult<Self> {
        profile.validate(&subject)?;
        config.validate()?;
        Ok(Self {
            model: SubjectModel::new(profile, config)?,
            subject,
            history: config.history,
            concentration_cap: config.trajectory.concentration_cap,
        })
    }

    /// Subject being evaluated
    #[must_use]
    pub const fn subject(&self) -> &SubjectId {
        &self.subject
    }

    /// Evaluate one trajectory; the history starts empty unless the policy is `Never`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for malformed points and `NumericDomain` if a
    /// model rejects a segment
    pub fn evaluate(&self, points: &[TrajectoryPoint]) -> AppResult<TrajectoryDose> {
        let mut session = HistorySession::from_config(&self.history);
        self.evaluate_in(&mut session, points)
    }

    /// Evaluate consecutive trajectories sharing one history session
    ///
    /// # Errors
    ///
    /// As for [`TrajectoryEvaluator::evaluate`]
    pub fn evaluate_all(
        &self,
        trajectories: &[Vec<TrajectoryPoint>],
    ) -> AppResult<Vec<TrajectoryDose>> {
        let mut session = HistorySession::from_config(&self.history);
        trajectories
            .iter()
            .map(|points| self.evaluate_in(&mut session, points))
            .collect()
    }

    fn evaluate_in(
        &self,
        session: &mut HistorySession,
        points: &[TrajectoryPoint],
    ) -> AppResult<TrajectoryDose> {
        let inputs = segments(points, self.concentration_cap)?;
        session.start_route();

        let mut dose = TrajectoryDose {
            segments: Vec::with_capacity(inputs.len()),
            total_rdd_ug: 0.0,
            total_rdd_without_history_ug: 0.0,
        };
        for input in inputs {
            let carried = self.model.traverse(input, session.prior_power_sum())?;
            let isolated = self.model.traverse(input, 0.0)?;
            session.record(carried.rider_power_w);
            dose.total_rdd_ug += carried.dose_ug;
            dose.total_rdd_without_history_ug += isolated.dose_ug;
            dose.segments.push(carried);
        }

        debug!(
            subject = %self.subject,
            points = points.len(),
            segments = dose.segments.len(),
            "Trajectory evaluated"
        );
        info!(
            subject = %self.subject,
            rdd_ug = dose.total_rdd_ug,
            rdd_without_history_ug = dose.total_rdd_without_history_ug,
            history_effect_percent = ?dose.history_effect_percent(),
            "Trajectory dose"
        );
        Ok(dose)
    }
}
