// ABOUTME: Annotation pass writing per-subject energy, dose, travel time and cost onto every edge
// ABOUTME: Metrics are computed in parallel per edge and applied sequentially afterwards
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Graph annotation
//!
//! Each edge is evaluated at the subject's nominal speed as an independent
//! segment: the power history is empty (or the fixed prior sum supplied with
//! [`AnnotationEngine::with_prior_power`]) and carries nothing across edges.
//! Route-scoped memory is applied afterwards by
//! [`RouteAggregator::replay`](crate::routing::RouteAggregator::replay).

use super::accumulator::SegmentMetrics;
use super::exposure::ExposureField;
use super::graph::RoadNetwork;
use crate::config::{ProfileSet, ScenarioConfig, SubjectId};
use crate::errors::{AppError, AppResult};
use crate::physiology::{SegmentInput, SubjectModel};
use petgraph::graph::EdgeIndex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// How a new sample is combined with an edge's existing metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationMode {
    /// Replace existing metrics; re-running is idempotent
    #[default]
    Overwrite,
    /// Merge into a count-weighted cumulative mean
    RunningMean,
}

/// Outcome of one annotation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationReport {
    /// Subjects annotated
    pub subjects: Vec<SubjectId>,
    /// Edges visited per subject
    pub edges: usize,
    /// Combination mode used
    pub mode: AnnotationMode,
    /// Wall-clock duration of the pass (ms)
    pub elapsed_ms: u64,
}

/// Writes `{metric}_{subject}` weights onto a road network
#[derive(Debug, Clone)]
pub struct AnnotationEngine {
    config: ScenarioConfig,
    mode: AnnotationMode,
    exposure: ExposureField,
    prior_power_sum_w: f64,
}

impl AnnotationEngine {
    /// Engine using the scenario's uniform ambient concentration
    #[must_use]
    pub fn new(config: &ScenarioConfig) -> Self {
        Self {
            config: config.clone(),
            mode: AnnotationMode::Overwrite,
            exposure: ExposureField::Uniform(config.exposure.ambient_pm25),
            prior_power_sum_w: 0.0,
        }
    }

    /// Select the combination mode
    #[must_use]
    pub const fn with_mode(mut self, mode: AnnotationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replace the exposure baseline
    #[must_use]
    pub fn with_exposure(mut self, exposure: ExposureField) -> Self {
        self.exposure = exposure;
        self
    }

    /// Use a fixed prior power sum (W) in place of an empty history
    #[must_use]
    pub const fn with_prior_power(mut self, prior_power_sum_w: f64) -> Self {
        self.prior_power_sum_w = prior_power_sum_w;
        self
    }

    /// Scenario in use
    #[must_use]
    pub const fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Annotate every edge for every subject.
    ///
    /// Profiles and scenario are validated before any edge is touched, so a
    /// configuration error leaves the network unchanged.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid profiles or scenario, and
    /// `NumericDomain` if a model rejects an edge's input
    pub fn annotate(
        &self,
        network: &mut RoadNetwork,
        profiles: &ProfileSet,
    ) -> AppResult<AnnotationReport> {
        profiles.validate_for_routing()?;
        self.config.validate()?;
        if !self.prior_power_sum_w.is_finite() || self.prior_power_sum_w < 0.0 {
            return Err(AppError::invalid_input(format!(
                "Prior power sum must be finite and non-negative, got {}",
                self.prior_power_sum_w
            )));
        }

        let start = Instant::now();
        let indices = network.edge_indices();
        let mut subjects = Vec::with_capacity(profiles.len());

        // Evaluate every subject before writing so a model failure leaves no partial annotation
        let mut pending = Vec::with_capacity(profiles.len());
        for (subject, profile) in profiles.iter() {
            let model = SubjectModel::new(profile, &self.config)?;
            let speed_mps = profile.nominal_speed_mps()?;
            let samples = indices
                .par_iter()
                .map(|idx| self.edge_metrics(network, *idx, &model, speed_mps))
                .collect::<AppResult<Vec<_>>>()?;
            debug!(subject = %subject, edges = samples.len(), "Edge metrics computed");
            pending.push((subject.clone(), samples));
        }

        for (subject, samples) in pending {
            for (idx, sample) in samples {
                let edge = network
                    .edge_at_mut(idx)
                    .ok_or_else(|| AppError::internal("edge index vanished during annotation"))?;
                match self.mode {
                    AnnotationMode::Overwrite => edge.overwrite(&subject, sample),
                    AnnotationMode::RunningMean => edge.accumulate(&subject, sample),
                }
            }
            network.mark_annotated(subject.clone());
            subjects.push(subject);
        }

        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            subjects = subjects.len(),
            edges = indices.len(),
            mode = ?self.mode,
            elapsed_ms,
            "Network annotated"
        );

        Ok(AnnotationReport {
            subjects,
            edges: indices.len(),
            mode: self.mode,
            elapsed_ms,
        })
    }

    fn edge_metrics(
        &self,
        network: &RoadNetwork,
        idx: EdgeIndex,
        model: &SubjectModel,
        speed_mps: f64,
    ) -> AppResult<(EdgeIndex, SegmentMetrics)> {
        let edge = network
            .edge_at(idx)
            .ok_or_else(|| AppError::internal("edge index out of range"))?;
        let input = SegmentInput {
            length_m: edge.length_m,
            d_height_m: network.elevation_delta(&edge.key)?,
            duration_s: edge.length_m / speed_mps,
            exposure_ug_m3: self.exposure.concentration(&edge.key),
        };
        let traversal = model.traverse(input, self.prior_power_sum_w)?;
        Ok((idx, SegmentMetrics::from_traversal(&traversal, &self.config.cost)))
    }
}
