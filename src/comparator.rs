// ABOUTME: Monte-Carlo comparison of routing strategies over random origin/destination pairs
// ABOUTME: Trials run in parallel with per-trial seeded RNGs; results feed a one-sided t-test
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Strategy comparator
//!
//! Each trial draws two distinct nodes uniformly at random, routes between
//! them under every strategy, and records the dose of each route. Trials
//! where a strategy finds no route are skipped for that strategy only.
//! The first strategy is the reference: the report tests whether its mean
//! dose is greater than that of each other strategy.

use crate::config::{MonteCarloConfig, SubjectId};
use crate::errors::{AppError, AppResult};
use crate::network::{Metric, NodeId, WeightKey};
use crate::routing::{PathFinder, RouteAggregator};
use crate::statistics::{self, SummaryStatistics, TTestResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

/// A named routing strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    /// Label used in reports
    pub label: String,
    /// Weight minimised by the search
    pub weight_key: WeightKey,
    /// Subject whose dose is measured along the chosen route
    pub dose_subject: SubjectId,
}

impl Strategy {
    /// Strategy measuring the dose of the weight key's own subject
    pub fn new(label: impl Into<String>, weight_key: WeightKey) -> Self {
        let dose_subject = weight_key.subject.clone();
        Self {
            label: label.into(),
            weight_key,
            dose_subject,
        }
    }

    /// Measure the dose of another subject along this strategy's routes
    #[must_use]
    pub fn measured_for(mut self, subject: impl Into<SubjectId>) -> Self {
        self.dose_subject = subject.into();
        self
    }
}

/// Dose sample collected for one strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySample {
    /// Strategy label
    pub label: String,
    /// Weight key searched under
    pub weight_key: WeightKey,
    /// Subject whose dose was measured
    pub dose_subject: SubjectId,
    /// Route doses in trial order (µg)
    pub doses_ug: Vec<f64>,
    /// Trials skipped for lack of a route
    pub skipped: usize,
    /// Summary of `doses_ug`, absent when empty
    pub summary: Option<SummaryStatistics>,
}

impl StrategySample {
    /// Sample mean dose (µg)
    #[must_use]
    pub fn mean_rdd_ug(&self) -> Option<f64> {
        self.summary.map(|summary| summary.mean)
    }
}

/// Reference strategy tested against one alternative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyComparison {
    /// Reference label (sample A)
    pub reference: String,
    /// Alternative label (sample B)
    pub alternative: String,
    /// Test of mean(A) > mean(B); absent with fewer than two doses per side
    pub test: Option<TTestResult>,
    /// Whether the test rejects equal means at the configured level
    pub significant: bool,
}

/// Comparator output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparatorReport {
    /// Trials run
    pub trials: usize,
    /// Seed all trial RNGs derive from
    pub seed: u64,
    /// Significance level used
    pub significance: f64,
    /// Per-strategy samples, in strategy order
    pub samples: Vec<StrategySample>,
    /// Reference against every other strategy
    pub comparisons: Vec<StrategyComparison>,
}

/// Repeats route evaluation over random node pairs
pub struct MonteCarloComparator<'a, F: PathFinder> {
    aggregator: RouteAggregator<'a, F>,
    config: MonteCarloConfig,
}

impl<'a, F: PathFinder> MonteCarloComparator<'a, F> {
    /// Comparator over an aggregator's network
    pub const fn new(aggregator: RouteAggregator<'a, F>, config: MonteCarloConfig) -> Self {
        Self { aggregator, config }
    }

    /// Run every trial and test the reference strategy against the others
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for fewer than two strategies or nodes, a
    /// configuration error for unannotated weight keys, and any search error
    pub fn run(&self, strategies: &[Strategy]) -> AppResult<ComparatorReport> {
        if strategies.len() < 2 {
            return Err(AppError::invalid_input(
                "comparison needs at least two strategies",
            ));
        }
        let network = self.aggregator.network();
        for strategy in strategies {
            let dose_key = WeightKey::new(Metric::Rdd, strategy.dose_subject.clone());
            for key in [&strategy.weight_key, &dose_key] {
                if !network.has_weight(key) {
                    return Err(AppError::config(format!(
                        "Strategy '{}' uses unannotated weight '{key}'",
                        strategy.label
                    )));
                }
            }
        }
        let nodes = network.node_ids();
        if nodes.len() < 2 {
            return Err(AppError::invalid_input(
                "comparison needs at least two nodes",
            ));
        }

        let seed = self.config.seed.unwrap_or_else(rand::random);
        let start = Instant::now();
        info!(
            trials = self.config.trials,
            strategies = strategies.len(),
            seed,
            "Starting Monte-Carlo comparison"
        );

        // Per-trial seeds are drawn in order from a stream keyed by the run seed
        let mut master = StdRng::seed_from_u64(seed);
        let trial_seeds: Vec<u64> = (0..self.config.trials).map(|_| master.gen()).collect();
        let outcomes = trial_seeds
            .par_iter()
            .enumerate()
            .map(|(trial, &trial_seed)| self.run_trial(&nodes, strategies, trial_seed, trial))
            .collect::<AppResult<Vec<_>>>()?;

        let mut samples: Vec<StrategySample> = strategies
            .iter()
            .map(|strategy| StrategySample {
                label: strategy.label.clone(),
                weight_key: strategy.weight_key.clone(),
                dose_subject: strategy.dose_subject.clone(),
                doses_ug: Vec::with_capacity(outcomes.len()),
                skipped: 0,
                summary: None,
            })
            .collect();
        for outcome in outcomes {
            for (sample, dose) in samples.iter_mut().zip(outcome) {
                match dose {
                    Some(value) => sample.doses_ug.push(value),
                    None => sample.skipped += 1,
                }
            }
        }
        for sample in &mut samples {
            sample.summary = SummaryStatistics::from_sample(&sample.doses_ug);
            if sample.doses_ug.is_empty() {
                warn!(strategy = %sample.label, "No trial produced a route");
            }
        }

        let comparisons = self.compare_samples(&samples)?;
        info!(
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Monte-Carlo comparison finished"
        );

        Ok(ComparatorReport {
            trials: self.config.trials,
            seed,
            significance: self.config.significance,
            samples,
            comparisons,
        })
    }

    fn run_trial(
        &self,
        nodes: &[NodeId],
        strategies: &[Strategy],
        trial_seed: u64,
        trial: usize,
    ) -> AppResult<Vec<Option<f64>>> {
        let mut rng = StdRng::seed_from_u64(trial_seed);
        let origin_index = rng.gen_range(0..nodes.len());
        let mut destination_index = rng.gen_range(0..nodes.len() - 1);
        if destination_index >= origin_index {
            destination_index += 1;
        }
        let (origin, destination) = (nodes[origin_index], nodes[destination_index]);

        strategies
            .iter()
            .map(|strategy| {
                let Some(route) =
                    self.aggregator.evaluate(origin, destination, &strategy.weight_key)?
                else {
                    debug!(
                        trial,
                        origin,
                        destination,
                        strategy = %strategy.label,
                        "Trial skipped"
                    );
                    return Ok(None);
                };
                if route.subject == strategy.dose_subject {
                    return Ok(Some(route.rdd_ug));
                }
                let measured = self.aggregator.summarize(
                    route.route,
                    &strategy.weight_key,
                    &strategy.dose_subject,
                )?;
                Ok(Some(measured.rdd_ug))
            })
            .collect()
    }

    fn compare_samples(&self, samples: &[StrategySample]) -> AppResult<Vec<StrategyComparison>> {
        let Some((reference, others)) = samples.split_first() else {
            return Ok(Vec::new());
        };
        others
            .iter()
            .map(|other| {
                let test = if reference.doses_ug.len() >= 2 && other.doses_ug.len() >= 2 {
                    Some(statistics::one_sided_t_test(
                        &reference.doses_ug,
                        &other.doses_ug,
                        self.config.test,
                    )?)
                } else {
                    None
                };
                let significant = test.is_some_and(|t| t.is_significant(self.config.significance));
                debug!(
                    reference = %reference.label,
                    alternative = %other.label,
                    ?test,
                    significant,
                    "Strategies compared"
                );
                Ok(StrategyComparison {
                    reference: reference.label.clone(),
                    alternative: other.label.clone(),
                    test,
                    significant,
                })
            })
            .collect()
    }
}
