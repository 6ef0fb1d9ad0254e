// ABOUTME: Metric names and profile-qualified weight keys such as `rdd_A`
// ABOUTME: Stable `{metric}_{subject}` naming shared by annotation, search and documents
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::SubjectId;
use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Per-subject scalar written onto every edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Received deposition dose (µg)
    Rdd,
    /// Mechanical energy (J)
    Energy,
    /// Travel time (s)
    TravelTime,
    /// Composite dose/time cost
    Cost,
}

impl Metric {
    /// Every metric, in document order
    pub const ALL: [Self; 4] = [Self::Rdd, Self::Energy, Self::TravelTime, Self::Cost];

    /// Attribute prefix of the metric
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Rdd => "rdd",
            Self::Energy => "energy",
            Self::TravelTime => "travel_time",
            Self::Cost => "cost",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A metric qualified by the subject it was computed for
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeightKey {
    /// The metric
    pub metric: Metric,
    /// The subject
    pub subject: SubjectId,
}

impl WeightKey {
    /// Build a weight key
    pub fn new(metric: Metric, subject: impl Into<SubjectId>) -> Self {
        Self {
            metric,
            subject: subject.into(),
        }
    }

    /// Same subject, different metric
    #[must_use]
    pub fn with_metric(&self, metric: Metric) -> Self {
        Self {
            metric,
            subject: self.subject.clone(),
        }
    }
}

impl fmt::Display for WeightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.metric.name(), self.subject)
    }
}

impl FromStr for WeightKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Longest prefix first so `travel_time_x` is not read as metric `travel`.
        let mut metrics = Metric::ALL;
        metrics.sort_by_key(|m| std::cmp::Reverse(m.name().len()));

        metrics
            .iter()
            .find_map(|metric| {
                s.strip_prefix(metric.name())
                    .and_then(|rest| rest.strip_prefix('_'))
                    .filter(|subject| !subject.is_empty())
                    .map(|subject| Self::new(*metric, subject))
            })
            .ok_or_else(|| {
                AppError::invalid_input(format!(
                    "Unknown weight key '{s}'. Expected {{metric}}_{{subject}} \
                     with metric one of: rdd, energy, travel_time, cost"
                ))
            })
    }
}
