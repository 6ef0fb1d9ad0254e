// ABOUTME: PM2.5 concentration assigned to each edge during annotation
// ABOUTME: Uniform ambient baseline or per-edge observations with a uniform fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::graph::EdgeKey;
use crate::errors::{AppError, AppResult};
use std::collections::HashMap;

/// Concentration field over the network edges (µg/m³)
#[derive(Debug, Clone, PartialEq)]
pub enum ExposureField {
    /// Same concentration everywhere
    Uniform(f64),
    /// Observed concentrations for some edges
    PerEdge {
        /// Observed values by edge
        values: HashMap<EdgeKey, f64>,
        /// Concentration for edges without an observation
        fallback: f64,
    },
}

impl ExposureField {
    /// Field with a single uniform concentration
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a negative or non-finite concentration
    pub fn uniform(concentration: f64) -> AppResult<Self> {
        check(concentration)?;
        Ok(Self::Uniform(concentration))
    }

    /// Field of observed per-edge concentrations
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if any value is negative or non-finite
    pub fn per_edge(values: HashMap<EdgeKey, f64>, fallback: f64) -> AppResult<Self> {
        check(fallback)?;
        for value in values.values() {
            check(*value)?;
        }
        Ok(Self::PerEdge { values, fallback })
    }

    /// Concentration on an edge
    #[must_use]
    pub fn concentration(&self, edge: &EdgeKey) -> f64 {
        match self {
            Self::Uniform(value) => *value,
            Self::PerEdge { values, fallback } => values.get(edge).copied().unwrap_or(*fallback),
        }
    }
}

fn check(concentration: f64) -> AppResult<()> {
    if concentration.is_finite() && concentration >= 0.0 {
        Ok(())
    } else {
        Err(AppError::invalid_input(format!(
            "Concentration must be finite and non-negative, got {concentration}"
        )))
    }
}
