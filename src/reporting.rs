// ABOUTME: Summary log rows (min, quartiles, mean, max, total dose) for reporting collaborators
// ABOUTME: One row per evaluated trajectory, route replay, or comparator strategy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::comparator::ComparatorReport;
use crate::config::SubjectId;
use crate::errors::AppResult;
use crate::routing::ReplaySummary;
use crate::statistics::SummaryStatistics;
use crate::trajectory::TrajectoryDose;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Dose summary of one evaluated trajectory or route set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Subject evaluated
    pub subject: SubjectId,
    /// Identifying label (file name, route, strategy)
    pub label: String,
    /// Number of doses summarised
    pub count: usize,
    /// Smallest dose (µg)
    pub min: f64,
    /// First quartile (µg)
    pub q25: f64,
    /// Mean dose (µg)
    pub mean: f64,
    /// Third quartile (µg)
    pub q75: f64,
    /// Largest dose (µg)
    pub max: f64,
    /// Sum of doses (µg)
    pub total: f64,
}

impl SummaryRow {
    /// Row from raw doses; `None` for an empty or non-finite sample
    #[must_use]
    pub fn from_doses(
        subject: SubjectId,
        label: impl Into<String>,
        doses: &[f64],
    ) -> Option<Self> {
        SummaryStatistics::from_sample(doses)
            .map(|stats| Self::from_statistics(subject, label, stats))
    }

    /// Row from precomputed statistics
    pub fn from_statistics(
        subject: SubjectId,
        label: impl Into<String>,
        stats: SummaryStatistics,
    ) -> Self {
        Self {
            subject,
            label: label.into(),
            count: stats.count,
            min: stats.min,
            q25: stats.q25,
            mean: stats.mean,
            q75: stats.q75,
            max: stats.max,
            total: stats.total,
        }
    }

    /// Per-segment doses of a trajectory
    #[must_use]
    pub fn from_trajectory(
        subject: SubjectId,
        label: impl Into<String>,
        dose: &TrajectoryDose,
    ) -> Option<Self> {
        dose.dose_summary()
            .map(|stats| Self::from_statistics(subject, label, stats))
    }

    /// Per-edge doses of a replayed route
    #[must_use]
    pub fn from_replay(
        subject: SubjectId,
        label: impl Into<String>,
        replay: &ReplaySummary,
    ) -> Option<Self> {
        let doses: Vec<f64> = replay.segments.iter().map(|segment| segment.dose_ug).collect();
        Self::from_doses(subject, label, &doses)
    }
}

/// Ordered collection of summary rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryLog {
    rows: Vec<SummaryRow>,
}

impl SummaryLog {
    /// Empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row
    pub fn push(&mut self, row: SummaryRow) {
        self.rows.push(row);
    }

    /// Rows, in insertion order
    #[must_use]
    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    /// Rows sorted by ascending total dose
    #[must_use]
    pub fn sorted_by_total(&self) -> Vec<&SummaryRow> {
        let mut rows: Vec<&SummaryRow> = self.rows.iter().collect();
        rows.sort_by(|a, b| a.total.total_cmp(&b.total));
        rows
    }

    /// One row per strategy of a comparator run, labelled by strategy
    #[must_use]
    pub fn from_comparator(report: &ComparatorReport) -> Self {
        let rows = report
            .samples
            .iter()
            .filter_map(|sample| {
                sample.summary.map(|stats| {
                    SummaryRow::from_statistics(
                        sample.dose_subject.clone(),
                        sample.label.clone(),
                        stats,
                    )
                })
            })
            .collect();
        Self { rows }
    }

    /// Write as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns a storage or serialization error
    pub fn to_path(&self, path: impl AsRef<Path>) -> AppResult<()> {
        fs::write(path.as_ref(), serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Read a log written by [`SummaryLog::to_path`]
    ///
    /// # Errors
    ///
    /// Returns a storage or serialization error
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        Ok(serde_json::from_str(&fs::read_to_string(path.as_ref())?)?)
    }
}

impl Extend<SummaryRow> for SummaryLog {
    fn extend<T: IntoIterator<Item = SummaryRow>>(&mut self, iter: T) {
        self.rows.extend(iter);
    }
}
