// ABOUTME: Sums dose, energy, time, cost and length along routes chosen under a weight key
// ABOUTME: Also replays a route with a route-scoped power history for history-aware dose
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::search::{PathFinder, Route};
use crate::config::{ScenarioConfig, SubjectId, SubjectProfile};
use crate::errors::{AppError, AppResult};
use crate::network::{ExposureField, Metric, NodeId, RoadNetwork, SegmentMetrics, WeightKey};
use crate::physiology::{HistorySession, SegmentInput, SegmentTraversal, SubjectModel};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Totals of every metric along one route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Weight key the route was chosen under
    pub weight_key: WeightKey,
    /// Subject whose metrics were summed
    pub subject: SubjectId,
    /// The route
    pub route: Route,
    /// Received deposition dose (µg)
    pub rdd_ug: f64,
    /// Mechanical energy (J)
    pub energy_j: f64,
    /// Travel time (s)
    pub travel_time_s: f64,
    /// Composite cost
    pub cost: f64,
    /// Distance (m)
    pub length_m: f64,
}

impl RouteSummary {
    /// Total of a single metric
    #[must_use]
    pub const fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Rdd => self.rdd_ug,
            Metric::Energy => self.energy_j,
            Metric::TravelTime => self.travel_time_s,
            Metric::Cost => self.cost,
        }
    }
}

/// Route walked segment by segment with a carried power history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaySummary {
    /// Per-edge evaluations, in route order
    pub segments: Vec<SegmentTraversal>,
    /// Dose with the power history carried along the route (µg)
    pub rdd_ug: f64,
    /// Dose with every edge evaluated in isolation (µg)
    pub rdd_without_history_ug: f64,
    /// Mechanical energy (J)
    pub energy_j: f64,
    /// Travel time (s)
    pub travel_time_s: f64,
}

/// Runs searches on an annotated network and aggregates their routes
pub struct RouteAggregator<'a, F: PathFinder> {
    network: &'a RoadNetwork,
    finder: F,
}

impl<'a, F: PathFinder> RouteAggregator<'a, F> {
    /// Bind an aggregator to an annotated network
    pub const fn new(network: &'a RoadNetwork, finder: F) -> Self {
        Self { network, finder }
    }

    /// Network being queried
    #[must_use]
    pub const fn network(&self) -> &'a RoadNetwork {
        self.network
    }

    /// Search under `key` and sum the key subject's metrics along the route.
    ///
    /// `Ok(None)` means the destination is unreachable.
    ///
    /// # Errors
    ///
    /// Propagates search errors (unannotated key, unknown node)
    pub fn evaluate(
        &self,
        origin: NodeId,
        destination: NodeId,
        key: &WeightKey,
    ) -> AppResult<Option<RouteSummary>> {
        let Some(route) = self.finder.find(self.network, origin, destination, key)? else {
            debug!(origin, destination, weight = %key, "No route found");
            return Ok(None);
        };
        self.summarize(route, key, &key.subject).map(Some)
    }

    /// Evaluate the same pair under several weight keys
    ///
    /// # Errors
    ///
    /// Returns the first search error encountered
    pub fn compare(
        &self,
        origin: NodeId,
        destination: NodeId,
        keys: &[WeightKey],
    ) -> AppResult<Vec<Option<RouteSummary>>> {
        keys.iter()
            .map(|key| self.evaluate(origin, destination, key))
            .collect()
    }

    /// Sum `subject`'s metrics along an existing route
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an edge not in the network and a
    /// configuration error if `subject` has no metrics on an edge
    pub fn summarize(
        &self,
        route: Route,
        weight_key: &WeightKey,
        subject: &SubjectId,
    ) -> AppResult<RouteSummary> {
        let mut totals = SegmentMetrics::default();
        let mut length_m = 0.0;
        for key in &route.edges {
            let edge = self
                .network
                .edge(key)
                .ok_or_else(|| AppError::not_found(format!("Edge {key}")))?;
            let observation = edge.observation(subject).ok_or_else(|| {
                AppError::config(format!("Subject '{subject}' has no metrics on edge {key}"))
            })?;
            for metric in Metric::ALL {
                totals.set(metric, totals.get(metric) + observation.mean.get(metric));
            }
            length_m += edge.length_m;
        }
        Ok(RouteSummary {
            weight_key: weight_key.clone(),
            subject: subject.clone(),
            route,
            rdd_ug: totals.rdd_ug,
            energy_j: totals.energy_j,
            travel_time_s: totals.travel_time_s,
            cost: totals.cost,
            length_m,
        })
    }

    /// Re-walk a route at the profile's nominal speed, carrying the power
    /// history from edge to edge according to `config.history`.
    ///
    /// # Errors
    ///
    /// Returns configuration errors for an invalid profile, and
    /// `NumericDomain` if a model rejects an edge's input
    pub fn replay(
        &self,
        route: &Route,
        subject: &SubjectId,
        profile: &SubjectProfile,
        config: &ScenarioConfig,
        exposure: &ExposureField,
    ) -> AppResult<ReplaySummary> {
        profile.validate(subject)?;
        let speed_mps = profile.nominal_speed_mps()?;
        let model = SubjectModel::new(profile, config)?;
        let mut session = HistorySession::from_config(&config.history);
        session.start_route();

        let mut replay = ReplaySummary {
            segments: Vec::with_capacity(route.edges.len()),
            rdd_ug: 0.0,
            rdd_without_history_ug: 0.0,
            energy_j: 0.0,
            travel_time_s: 0.0,
        };
        for key in &route.edges {
            let edge = self
                .network
                .edge(key)
                .ok_or_else(|| AppError::not_found(format!("Edge {key}")))?;
            let input = SegmentInput {
                length_m: edge.length_m,
                d_height_m: self.network.elevation_delta(key)?,
                duration_s: edge.length_m / speed_mps,
                exposure_ug_m3: exposure.concentration(key),
            };
            let carried = model.traverse(input, session.prior_power_sum())?;
            let isolated = model.traverse(input, 0.0)?;
            session.record(carried.rider_power_w);

            replay.rdd_ug += carried.dose_ug;
            replay.rdd_without_history_ug += isolated.dose_ug;
            replay.energy_j += carried.energy_j();
            replay.travel_time_s += input.duration_s;
            replay.segments.push(carried);
        }
        debug!(
            subject = %subject,
            edges = route.edges.len(),
            rdd_ug = replay.rdd_ug,
            rdd_without_history_ug = replay.rdd_without_history_ug,
            "Route replayed"
        );
        Ok(replay)
    }
}
