// ABOUTME: Bounded ring buffer of recent segment powers feeding the perceived-power term
// ABOUTME: Explicit reset policy (per edge, per route, never) owned by the traversal session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::HistoryConfig;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/// When a traversal session forgets its power history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryReset {
    /// Every segment starts with an empty history (static edge weights)
    PerEdge,
    /// History carries along a route and is cleared when a new route starts
    PerRoute,
    /// History is never cleared; consecutive routes share fatigue
    Never,
}

impl HistoryReset {
    /// Policy name as used in configuration
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PerEdge => "per_edge",
            Self::PerRoute => "per_route",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for HistoryReset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HistoryReset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "per_edge" | "edge" => Ok(Self::PerEdge),
            "per_route" | "route" => Ok(Self::PerRoute),
            "never" => Ok(Self::Never),
            other => Err(format!(
                "Unknown history reset policy: '{other}'. Valid options: per_edge, per_route, never"
            )),
        }
    }
}

/// The most recent `window` segment powers, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct PowerHistory {
    window: usize,
    powers: VecDeque<f64>,
}

impl PowerHistory {
    /// Create an empty history holding at most `window` powers
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            window,
            powers: VecDeque::with_capacity(window),
        }
    }

    /// Record a segment power, evicting the oldest when full.
    ///
    /// A zero-width window records nothing.
    pub fn push(&mut self, power_w: f64) {
        if self.window == 0 {
            return;
        }
        if self.powers.len() == self.window {
            self.powers.pop_front();
        }
        self.powers.push_back(power_w);
    }

    /// Sum of the remembered powers (W)
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.powers.iter().sum()
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.powers.clear();
    }

    /// Number of remembered powers
    #[must_use]
    pub fn len(&self) -> usize {
        self.powers.len()
    }

    /// Whether nothing is remembered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.powers.is_empty()
    }

    /// Capacity of the buffer
    #[must_use]
    pub const fn window(&self) -> usize {
        self.window
    }
}

/// A power history together with the policy deciding when it resets.
///
/// Callers announce route boundaries with [`HistorySession::start_route`] and
/// ask for the memory term of each segment with
/// [`HistorySession::prior_power_sum`] before recording that segment's power.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySession {
    history: PowerHistory,
    reset: HistoryReset,
}

impl HistorySession {
    /// Create a session with an explicit window and policy
    #[must_use]
    pub fn new(window: usize, reset: HistoryReset) -> Self {
        Self {
            history: PowerHistory::new(window),
            reset,
        }
    }

    /// Create a session from scenario configuration
    #[must_use]
    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(config.window, config.reset)
    }

    /// Mark the start of a new trajectory or route
    pub fn start_route(&mut self) {
        if self.reset != HistoryReset::Never {
            self.history.clear();
        }
    }

    /// Sum of prior powers to use for the next segment
    pub fn prior_power_sum(&mut self) -> f64 {
        if self.reset == HistoryReset::PerEdge {
            self.history.clear();
        }
        self.history.sum()
    }

    /// Record the power of the segment just evaluated
    pub fn record(&mut self, power_w: f64) {
        self.history.push(power_w);
    }

    /// Active policy
    #[must_use]
    pub const fn reset(&self) -> HistoryReset {
        self.reset
    }

    /// Underlying history
    #[must_use]
    pub const fn history(&self) -> &PowerHistory {
        &self.history
    }
}
