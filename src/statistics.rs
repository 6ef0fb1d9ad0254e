// ABOUTME: Descriptive statistics and the one-sided two-sample t-test used by the comparator
// ABOUTME: p-values come from the Student-t CDF in statrs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Sample statistics
//!
//! Quantiles use linear interpolation between closest ranks. Variances use
//! the unbiased (n − 1) estimator.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::fmt;
use std::str::FromStr;

/// Variance assumption of the two-sample t-test
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TTestKind {
    /// Pooled variance, `n1 + n2 − 2` degrees of freedom
    #[default]
    Student,
    /// Unequal variances, Welch–Satterthwaite degrees of freedom
    Welch,
}

impl TTestKind {
    /// Name used in configuration and reports
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Welch => "welch",
        }
    }
}

impl fmt::Display for TTestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TTestKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" | "pooled" => Ok(Self::Student),
            "welch" => Ok(Self::Welch),
            other => Err(format!(
                "Unknown t-test kind: '{other}'. Valid options: student, welch"
            )),
        }
    }
}

/// Outcome of a one-sided two-sample t-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TTestResult {
    /// Variance assumption used
    pub kind: TTestKind,
    /// t statistic, positive when the first sample's mean is larger
    pub statistic: f64,
    /// Probability of a statistic at least this large under equal means
    pub p_value: f64,
    /// Degrees of freedom
    pub degrees_of_freedom: f64,
}

impl TTestResult {
    /// Whether the null hypothesis is rejected at `alpha`
    #[must_use]
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Arithmetic mean; `None` for an empty sample
#[must_use]
pub fn mean(sample: &[f64]) -> Option<f64> {
    if sample.is_empty() {
        return None;
    }
    Some(sample.iter().sum::<f64>() / sample.len() as f64)
}

/// Unbiased sample variance; `None` with fewer than two values
#[must_use]
pub fn variance(sample: &[f64]) -> Option<f64> {
    if sample.len() < 2 {
        return None;
    }
    let m = mean(sample)?;
    let squares: f64 = sample.iter().map(|x| (x - m) * (x - m)).sum();
    Some(squares / (sample.len() - 1) as f64)
}

/// Quantile `q ∈ [0, 1]` of an ascending-sorted sample, linearly interpolated
#[must_use]
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let position = q.clamp(0.0, 1.0) * last as f64;
    let lower = position.floor();
    let fraction = position - lower;
    let index = lower as usize;
    let low = *sorted.get(index)?;
    let high = sorted.get(index + 1).copied().unwrap_or(low);
    Some((high - low).mul_add(fraction, low))
}

/// One-sided test of `mean(a) > mean(b)`
///
/// # Errors
///
/// Returns `InvalidInput` when either sample has fewer than two values or
/// contains non-finite values
pub fn one_sided_t_test(a: &[f64], b: &[f64], kind: TTestKind) -> AppResult<TTestResult> {
    if a.iter().chain(b).any(|x| !x.is_finite()) {
        return Err(AppError::invalid_input("t-test samples must be finite"));
    }
    let (Some(var_a), Some(var_b), Some(mean_a), Some(mean_b)) =
        (variance(a), variance(b), mean(a), mean(b))
    else {
        return Err(AppError::invalid_input(format!(
            "t-test needs at least two values per sample, got {} and {}",
            a.len(),
            b.len()
        )));
    };
    let (n_a, n_b) = (a.len() as f64, b.len() as f64);

    let (standard_error, degrees_of_freedom) = match kind {
        TTestKind::Student => {
            let df = n_a + n_b - 2.0;
            let pooled = (n_a - 1.0).mul_add(var_a, (n_b - 1.0) * var_b) / df;
            ((pooled * (1.0 / n_a + 1.0 / n_b)).sqrt(), df)
        }
        TTestKind::Welch => {
            let (ua, ub) = (var_a / n_a, var_b / n_b);
            let se2 = ua + ub;
            let denominator = (ua * ua) / (n_a - 1.0) + (ub * ub) / (n_b - 1.0);
            let df = if denominator > 0.0 {
                se2 * se2 / denominator
            } else {
                n_a + n_b - 2.0
            };
            (se2.sqrt(), df)
        }
    };

    let difference = mean_a - mean_b;
    // Zero spread: the means are either identical or infinitely far apart
    if standard_error <= 0.0 {
        let (statistic, p_value) = if difference > 0.0 {
            (f64::INFINITY, 0.0)
        } else if difference < 0.0 {
            (f64::NEG_INFINITY, 1.0)
        } else {
            (0.0, 0.5)
        };
        return Ok(TTestResult {
            kind,
            statistic,
            p_value,
            degrees_of_freedom,
        });
    }

    let statistic = difference / standard_error;
    let distribution = StudentsT::new(0.0, 1.0, degrees_of_freedom)
        .map_err(|e| AppError::internal(format!("Student-t distribution: {e}")))?;
    Ok(TTestResult {
        kind,
        statistic,
        p_value: 1.0 - distribution.cdf(statistic),
        degrees_of_freedom,
    })
}

/// Five-number summary plus mean and total
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Number of values
    pub count: usize,
    /// Minimum
    pub min: f64,
    /// First quartile
    pub q25: f64,
    /// Mean
    pub mean: f64,
    /// Third quartile
    pub q75: f64,
    /// Maximum
    pub max: f64,
    /// Sum of all values
    pub total: f64,
}

impl SummaryStatistics {
    /// Summarise a sample; `None` if it is empty or has non-finite values
    #[must_use]
    pub fn from_sample(sample: &[f64]) -> Option<Self> {
        if sample.iter().any(|x| !x.is_finite()) {
            return None;
        }
        let mut sorted = sample.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            count: sorted.len(),
            min: *sorted.first()?,
            q25: quantile_sorted(&sorted, 0.25)?,
            mean: mean(&sorted)?,
            q75: quantile_sorted(&sorted, 0.75)?,
            max: *sorted.last()?,
            total: sorted.iter().sum(),
        })
    }
}
