// ABOUTME: Path-finding seam and the default petgraph-backed shortest-path search
// ABOUTME: Returns `None` for unreachable destinations rather than an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use crate::network::{EdgeKey, NodeId, RoadEdge, RoadNetwork, WeightKey};
use petgraph::algo::astar;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

/// Ordered edge sequence from origin to destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Visited nodes, origin first
    pub nodes: Vec<NodeId>,
    /// Traversed edges, in order
    pub edges: Vec<EdgeKey>,
}

impl Route {
    /// Origin node
    #[must_use]
    pub fn origin(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    /// Destination node
    #[must_use]
    pub fn destination(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// `true` when origin and destination coincide
    #[must_use]
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Shortest-path collaborator.
///
/// Implementations must be `Send + Sync` so one finder can serve parallel
/// comparator trials.
pub trait PathFinder: Send + Sync {
    /// Short identifier for logs
    fn name(&self) -> &'static str;

    /// Route minimising the summed `key` weight, or `None` if unreachable
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `key` has not been annotated, and
    /// `ResourceNotFound` for unknown nodes
    fn find(
        &self,
        network: &RoadNetwork,
        origin: NodeId,
        destination: NodeId,
        key: &WeightKey,
    ) -> AppResult<Option<Route>>;
}

/// Dijkstra search (A* with a zero heuristic) over petgraph storage
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraSearch;

impl PathFinder for DijkstraSearch {
    fn name(&self) -> &'static str {
        "dijkstra"
    }

    fn find(
        &self,
        network: &RoadNetwork,
        origin: NodeId,
        destination: NodeId,
        key: &WeightKey,
    ) -> AppResult<Option<Route>> {
        if !network.has_weight(key) {
            return Err(AppError::config(format!(
                "Weight key '{key}' is not annotated on this network"
            )));
        }
        let start = locate(network, origin)?;
        let goal = locate(network, destination)?;

        let weight = |edge: &RoadEdge| edge.weight(key).unwrap_or(f64::INFINITY);
        let Some((_, path)) = astar(
            network.graph(),
            start,
            |node| node == goal,
            |edge| weight(edge.weight()),
            |_| 0.0,
        ) else {
            return Ok(None);
        };

        let graph = network.graph();
        let mut nodes = Vec::with_capacity(path.len());
        let mut edges = Vec::with_capacity(path.len().saturating_sub(1));
        for (i, idx) in path.iter().enumerate() {
            nodes.push(graph[*idx].id);
            if let Some(next) = path.get(i + 1) {
                let cheapest = graph
                    .edges(*idx)
                    .filter(|edge| edge.target() == *next)
                    .min_by(|a, b| weight(a.weight()).total_cmp(&weight(b.weight())))
                    .ok_or_else(|| AppError::internal("search returned a non-adjacent step"))?;
                edges.push(cheapest.weight().key);
            }
        }
        Ok(Some(Route { nodes, edges }))
    }
}

fn locate(network: &RoadNetwork, id: NodeId) -> AppResult<NodeIndex> {
    network
        .node_index(id)
        .ok_or_else(|| AppError::not_found(format!("Node {id}")))
}
