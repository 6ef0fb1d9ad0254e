// ABOUTME: Per-edge metric sample and the count-plus-mean accumulator attached to each edge
// ABOUTME: Pure merge operations allow annotation to be computed in parallel and applied later
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::weights::Metric;
use crate::config::CompositeCost;
use crate::physiology::SegmentTraversal;
use serde::{Deserialize, Serialize};

/// One subject's metrics on one edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentMetrics {
    /// Received deposition dose (µg)
    pub rdd_ug: f64,
    /// Mechanical energy (J)
    pub energy_j: f64,
    /// Travel time (s)
    pub travel_time_s: f64,
    /// Composite cost
    pub cost: f64,
}

impl SegmentMetrics {
    /// Derive edge metrics from an evaluated segment
    #[must_use]
    pub fn from_traversal(traversal: &SegmentTraversal, cost: &CompositeCost) -> Self {
        let travel_time_s = traversal.input.duration_s;
        Self {
            rdd_ug: traversal.dose_ug,
            energy_j: traversal.energy_j(),
            travel_time_s,
            cost: cost.evaluate(traversal.dose_ug, travel_time_s),
        }
    }

    /// Value of a single metric
    #[must_use]
    pub const fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Rdd => self.rdd_ug,
            Metric::Energy => self.energy_j,
            Metric::TravelTime => self.travel_time_s,
            Metric::Cost => self.cost,
        }
    }

    /// Set a single metric
    pub fn set(&mut self, metric: Metric, value: f64) {
        match metric {
            Metric::Rdd => self.rdd_ug = value,
            Metric::Energy => self.energy_j = value,
            Metric::TravelTime => self.travel_time_s = value,
            Metric::Cost => self.cost = value,
        }
    }

    fn zip_with(self, other: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            rdd_ug: f(self.rdd_ug, other.rdd_ug),
            energy_j: f(self.energy_j, other.energy_j),
            travel_time_s: f(self.travel_time_s, other.travel_time_s),
            cost: f(self.cost, other.cost),
        }
    }
}

/// Observation count and cumulative mean of an edge's metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeObservation {
    /// Number of samples merged into the mean
    pub count: u64,
    /// Mean of the merged samples
    pub mean: SegmentMetrics,
}

impl EdgeObservation {
    /// Accumulator holding a single sample
    #[must_use]
    pub const fn single(sample: SegmentMetrics) -> Self {
        Self {
            count: 1,
            mean: sample,
        }
    }

    /// Fold one more sample into the running mean
    #[must_use]
    pub fn merge(self, sample: SegmentMetrics) -> Self {
        self.combine(Self::single(sample))
    }

    /// Combine two accumulators, weighting each mean by its count
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        let count = self.count + other.count;
        if count == 0 {
            return self;
        }
        let weight = other.count as f64 / count as f64;
        Self {
            count,
            mean: self
                .mean
                .zip_with(other.mean, |a, b| (b - a).mul_add(weight, a)),
        }
    }
}
