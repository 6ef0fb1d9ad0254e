// ABOUTME: Directed road multigraph keyed by external node ids, backed by petgraph
// ABOUTME: Nodes carry elevation and optional position; edges carry length and subject metrics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::accumulator::{EdgeObservation, SegmentMetrics};
use super::weights::WeightKey;
use crate::config::SubjectId;
use crate::constants::units::EARTH_RADIUS_M;
use crate::errors::{AppError, AppResult};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// External node identifier (e.g. an OSM node id)
pub type NodeId = u64;

/// Identity of an edge: endpoints plus the index among parallel edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    /// Start node
    pub origin: NodeId,
    /// End node
    pub destination: NodeId,
    /// Parallel-edge key, 0 for the first edge between the pair
    pub key: u32,
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.origin, self.destination, self.key)
    }
}

/// Junction of the road network
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadNode {
    /// External id
    pub id: NodeId,
    /// Elevation above sea level (m)
    pub elevation_m: f64,
    /// Latitude (degrees), when known
    pub latitude: Option<f64>,
    /// Longitude (degrees), when known
    pub longitude: Option<f64>,
}

/// Road segment between two junctions
#[derive(Debug, Clone, PartialEq)]
pub struct RoadEdge {
    /// Edge identity
    pub key: EdgeKey,
    /// Length (m)
    pub length_m: f64,
    metrics: BTreeMap<SubjectId, EdgeObservation>,
}

impl RoadEdge {
    /// Metrics recorded for a subject
    #[must_use]
    pub fn observation(&self, subject: &SubjectId) -> Option<&EdgeObservation> {
        self.metrics.get(subject)
    }

    /// Value of a weight key on this edge
    #[must_use]
    pub fn weight(&self, key: &WeightKey) -> Option<f64> {
        self.metrics
            .get(&key.subject)
            .map(|observation| observation.mean.get(key.metric))
    }

    /// All recorded observations, by subject
    pub fn observations(&self) -> impl Iterator<Item = (&SubjectId, &EdgeObservation)> {
        self.metrics.iter()
    }

    pub(crate) fn overwrite(&mut self, subject: &SubjectId, sample: SegmentMetrics) {
        self.metrics
            .insert(subject.clone(), EdgeObservation::single(sample));
    }

    pub(crate) fn accumulate(&mut self, subject: &SubjectId, sample: SegmentMetrics) {
        let merged = self
            .metrics
            .get(subject)
            .map_or_else(|| EdgeObservation::single(sample), |prior| prior.merge(sample));
        self.metrics.insert(subject.clone(), merged);
    }

    pub(crate) fn restore(&mut self, subject: SubjectId, observation: EdgeObservation) {
        self.metrics.insert(subject, observation);
    }
}

/// Directed road multigraph
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    graph: DiGraph<RoadNode, RoadEdge>,
    index: HashMap<NodeId, NodeIndex>,
    annotated: BTreeSet<SubjectId>,
}

impl RoadNetwork {
    /// Create an empty network
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with an elevation
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a duplicate id or a non-finite elevation
    pub fn add_node(&mut self, id: NodeId, elevation_m: f64) -> AppResult<()> {
        self.insert_node(RoadNode {
            id,
            elevation_m,
            latitude: None,
            longitude: None,
        })
    }

    /// Add a node with elevation and geographic position
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a duplicate id or non-finite values
    pub fn add_positioned_node(
        &mut self,
        id: NodeId,
        elevation_m: f64,
        latitude: f64,
        longitude: f64,
    ) -> AppResult<()> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(AppError::invalid_input(format!(
                "Node {id} has a non-finite position"
            )));
        }
        self.insert_node(RoadNode {
            id,
            elevation_m,
            latitude: Some(latitude),
            longitude: Some(longitude),
        })
    }

    fn insert_node(&mut self, node: RoadNode) -> AppResult<()> {
        if !node.elevation_m.is_finite() {
            return Err(AppError::invalid_input(format!(
                "Node {} has a non-finite elevation",
                node.id
            )));
        }
        if self.index.contains_key(&node.id) {
            return Err(AppError::invalid_input(format!(
                "Duplicate node id {}",
                node.id
            )));
        }
        let idx = self.graph.add_node(node);
        self.index.insert(node.id, idx);
        Ok(())
    }

    /// Add a directed edge; parallel edges receive increasing keys.
    ///
    /// Adding an edge invalidates earlier annotation, since the new edge
    /// carries no metrics yet.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown endpoint and `InvalidInput`
    /// for a non-positive or non-finite length
    pub fn add_edge(
        &mut self,
        origin: NodeId,
        destination: NodeId,
        length_m: f64,
    ) -> AppResult<EdgeKey> {
        if !length_m.is_finite() || length_m <= 0.0 {
            return Err(AppError::invalid_input(format!(
                "Edge {origin} -> {destination} has invalid length {length_m}"
            )));
        }
        let from = self.require(origin)?;
        let to = self.require(destination)?;
        let parallel = self
            .graph
            .edges(from)
            .filter(|edge| edge.target() == to)
            .count();
        let key = EdgeKey {
            origin,
            destination,
            key: u32::try_from(parallel)
                .map_err(|_| AppError::invalid_input("too many parallel edges"))?,
        };
        self.graph.add_edge(
            from,
            to,
            RoadEdge {
                key,
                length_m,
                metrics: BTreeMap::new(),
            },
        );
        self.annotated.clear();
        Ok(key)
    }

    fn require(&self, id: NodeId) -> AppResult<NodeIndex> {
        self.index
            .get(&id)
            .copied()
            .ok_or_else(|| AppError::not_found(format!("Node {id}")))
    }

    /// Number of nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges, parallel edges counted separately
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// External ids of every node, in insertion order
    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.graph.node_weights().map(|node| node.id).collect()
    }

    /// Look up a node
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&RoadNode> {
        self.index
            .get(&id)
            .and_then(|idx| self.graph.node_weight(*idx))
    }

    /// Look up an edge by key
    #[must_use]
    pub fn edge(&self, key: &EdgeKey) -> Option<&RoadEdge> {
        let from = *self.index.get(&key.origin)?;
        let to = *self.index.get(&key.destination)?;
        self.graph
            .edges(from)
            .find(|edge| edge.target() == to && edge.weight().key.key == key.key)
            .map(|edge| edge.weight())
    }

    /// Iterate every edge
    pub fn edges(&self) -> impl Iterator<Item = &RoadEdge> {
        self.graph.edge_weights()
    }

    /// Elevation gain from the edge's origin to its destination (m)
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if either endpoint is unknown
    pub fn elevation_delta(&self, key: &EdgeKey) -> AppResult<f64> {
        let start = self
            .node(key.origin)
            .ok_or_else(|| AppError::not_found(format!("Node {}", key.origin)))?;
        let end = self
            .node(key.destination)
            .ok_or_else(|| AppError::not_found(format!("Node {}", key.destination)))?;
        Ok(end.elevation_m - start.elevation_m)
    }

    /// Subjects whose metrics are present on every edge
    pub fn annotated_subjects(&self) -> impl Iterator<Item = &SubjectId> {
        self.annotated.iter()
    }

    /// Whether `key` can be used as a search weight
    #[must_use]
    pub fn has_weight(&self, key: &WeightKey) -> bool {
        self.annotated.contains(&key.subject)
    }

    /// Node whose position is nearest to the given point (great-circle distance).
    ///
    /// Returns `None` when no node carries a position.
    #[must_use]
    pub fn nearest_node(&self, latitude: f64, longitude: f64) -> Option<NodeId> {
        self.graph
            .node_weights()
            .filter_map(|node| {
                let (lat, lon) = (node.latitude?, node.longitude?);
                Some((node.id, great_circle_m(latitude, longitude, lat, lon)))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Underlying petgraph storage, for search collaborators
    #[must_use]
    pub const fn graph(&self) -> &DiGraph<RoadNode, RoadEdge> {
        &self.graph
    }

    /// Graph index of an external node id
    #[must_use]
    pub fn node_index(&self, id: NodeId) -> Option<NodeIndex> {
        self.index.get(&id).copied()
    }

    pub(crate) fn edge_indices(&self) -> Vec<EdgeIndex> {
        self.graph.edge_indices().collect()
    }

    pub(crate) fn edge_at(&self, idx: EdgeIndex) -> Option<&RoadEdge> {
        self.graph.edge_weight(idx)
    }

    pub(crate) fn edge_at_mut(&mut self, idx: EdgeIndex) -> Option<&mut RoadEdge> {
        self.graph.edge_weight_mut(idx)
    }

    pub(crate) fn mark_annotated(&mut self, subject: SubjectId) {
        self.annotated.insert(subject);
    }
}

/// Great-circle distance between two points (m), haversine formula
#[must_use]
pub fn great_circle_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = phi2 - phi1;
    let d_lambda = (lon2 - lon1).to_radians();
    let h = (d_phi / 2.0)
        .sin()
        .powi(2)
        .mul_add(1.0, phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2));
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}
