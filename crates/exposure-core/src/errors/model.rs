// ABOUTME: Numeric-domain error type for the power, heart-rate and deposition models
// ABOUTME: Replaces silent NaN/infinity propagation with an explicit, typed failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

/// Errors raised when a model receives input outside its valid domain.
///
/// In-domain input never produces one of these; they exist so that
/// `ln(0)`, `exp(inf)` and friends surface as errors instead of NaN doses.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Input was NaN or infinite
    #[error("{quantity} must be finite, got {value}")]
    NonFinite {
        /// Name of the offending quantity
        quantity: &'static str,
        /// The value received
        value: f64,
    },

    /// Input was finite but outside the formula's domain
    #[error("{quantity} is outside its valid domain ({constraint}), got {value}")]
    OutOfDomain {
        /// Name of the offending quantity
        quantity: &'static str,
        /// Human readable constraint, e.g. "> 0"
        constraint: &'static str,
        /// The value received
        value: f64,
    },
}

impl ModelError {
    /// Reject NaN and infinities
    ///
    /// # Errors
    ///
    /// Returns `ModelError::NonFinite` when `value` is not finite
    pub fn ensure_finite(quantity: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::NonFinite { quantity, value })
        }
    }

    /// Require a finite, strictly positive value
    ///
    /// # Errors
    ///
    /// Returns an error when `value` is not finite or not greater than zero
    pub fn ensure_positive(quantity: &'static str, value: f64) -> Result<f64, Self> {
        let value = Self::ensure_finite(quantity, value)?;
        if value > 0.0 {
            Ok(value)
        } else {
            Err(Self::OutOfDomain {
                quantity,
                constraint: "> 0",
                value,
            })
        }
    }

    /// Require a finite, non-negative value
    ///
    /// # Errors
    ///
    /// Returns an error when `value` is not finite or negative
    pub fn ensure_non_negative(quantity: &'static str, value: f64) -> Result<f64, Self> {
        let value = Self::ensure_finite(quantity, value)?;
        if value >= 0.0 {
            Ok(value)
        } else {
            Err(Self::OutOfDomain {
                quantity,
                constraint: ">= 0",
                value,
            })
        }
    }
}
