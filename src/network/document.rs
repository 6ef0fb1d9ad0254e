// ABOUTME: Serde document form of the road network for persistence collaborators
// ABOUTME: Annotated metrics are flattened onto edges as `{metric}_{subject}` attributes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::accumulator::{EdgeObservation, SegmentMetrics};
use super::graph::{NodeId, RoadNetwork};
use super::weights::{Metric, WeightKey};
use crate::config::SubjectId;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::debug;

const OBSERVATIONS_PREFIX: &str = "observations_";

/// Node entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// External id
    pub id: NodeId,
    /// Elevation (m)
    pub elevation: f64,
    /// Latitude (degrees)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    /// Longitude (degrees)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

/// Edge entry; annotation metrics and any foreign attributes are flattened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Start node
    pub origin: NodeId,
    /// End node
    pub destination: NodeId,
    /// Parallel-edge key; assigned in document order when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<u32>,
    /// Length (m)
    pub length: f64,
    /// `{metric}_{subject}` values, `observations_{subject}` counts, and
    /// attributes this crate does not interpret
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

/// Whole-network document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDocument {
    /// Subjects annotated on every edge. When absent, the set is inferred
    /// from the edge attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotated: Option<BTreeSet<SubjectId>>,
    /// Nodes
    pub nodes: Vec<NodeRecord>,
    /// Edges
    pub edges: Vec<EdgeRecord>,
}

impl NetworkDocument {
    /// Read a JSON document from disk
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file cannot be read, or a
    /// serialization error for malformed JSON
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write the document to disk as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns a storage or serialization error
    pub fn to_path(&self, path: impl AsRef<Path>) -> AppResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

impl RoadNetwork {
    /// Build a network from its document form, restoring any annotations.
    ///
    /// With an explicit `annotated` list, those subjects must carry all four
    /// metrics on every edge. Without one, a subject counts as annotated only
    /// when all four of its metrics are present on every edge. Attributes
    /// shaped like `{metric}_{subject}` for undeclared subjects are kept when
    /// numeric and otherwise skipped as foreign.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for shape errors (duplicate nodes, unknown
    /// endpoints, bad lengths, mismatched parallel keys, malformed or missing
    /// metrics of a declared subject)
    pub fn from_document(document: &NetworkDocument) -> AppResult<Self> {
        let mut network = Self::new();
        for node in &document.nodes {
            match (node.lat, node.lon) {
                (Some(lat), Some(lon)) => {
                    network.add_positioned_node(node.id, node.elevation, lat, lon)?;
                }
                (None, None) => network.add_node(node.id, node.elevation)?,
                _ => {
                    return Err(AppError::invalid_input(format!(
                        "Node {} has only one of lat/lon",
                        node.id
                    )))
                }
            }
        }

        let declared = document.annotated.as_ref();
        let mut edges = Vec::with_capacity(document.edges.len());
        for record in &document.edges {
            let key = network.add_edge(record.origin, record.destination, record.length)?;
            if let Some(expected) = record.key {
                if expected != key.key {
                    return Err(AppError::invalid_input(format!(
                        "Edge {} -> {} declares key {expected} but is parallel edge {}",
                        record.origin, record.destination, key.key
                    )));
                }
            }
            let observations = read_observations(record, declared)?;
            if let Some(missing) = declared
                .into_iter()
                .flatten()
                .find(|subject| !observations.contains_key(*subject))
            {
                return Err(AppError::invalid_input(format!(
                    "Edge {key} lacks metrics for annotated subject '{missing}'"
                )));
            }
            edges.push(observations);
        }

        // Edge indices follow insertion order, which is document order.
        let mut complete: Option<BTreeSet<SubjectId>> = None;
        for (idx, observations) in network.edge_indices().into_iter().zip(edges) {
            let subjects: BTreeSet<SubjectId> = observations.keys().cloned().collect();
            complete = Some(match complete {
                None => subjects,
                Some(previous) => previous.intersection(&subjects).cloned().collect(),
            });
            if let Some(edge) = network.edge_at_mut(idx) {
                for (subject, observation) in observations {
                    edge.restore(subject, observation);
                }
            }
        }
        let annotated = declared.cloned().or(complete).unwrap_or_default();
        for subject in annotated {
            network.mark_annotated(subject);
        }

        debug!(
            nodes = network.node_count(),
            edges = network.edge_count(),
            "Network loaded from document"
        );
        Ok(network)
    }

    /// Document form of the network including every recorded metric
    #[must_use]
    pub fn to_document(&self) -> NetworkDocument {
        let nodes = self
            .graph()
            .node_weights()
            .map(|node| NodeRecord {
                id: node.id,
                elevation: node.elevation_m,
                lat: node.latitude,
                lon: node.longitude,
            })
            .collect();

        let edges = self
            .edges()
            .map(|edge| {
                let mut attributes = BTreeMap::new();
                for (subject, observation) in edge.observations() {
                    for metric in Metric::ALL {
                        attributes.insert(
                            WeightKey::new(metric, subject.clone()).to_string(),
                            Value::from(observation.mean.get(metric)),
                        );
                    }
                    attributes.insert(
                        format!("{OBSERVATIONS_PREFIX}{subject}"),
                        Value::from(observation.count),
                    );
                }
                EdgeRecord {
                    origin: edge.key.origin,
                    destination: edge.key.destination,
                    key: Some(edge.key.key),
                    length: edge.length_m,
                    attributes,
                }
            })
            .collect();

        NetworkDocument {
            annotated: Some(self.annotated_subjects().cloned().collect()),
            nodes,
            edges,
        }
    }
}

type PartialObservation = (SegmentMetrics, BTreeSet<Metric>, u64);

fn read_observations(
    record: &EdgeRecord,
    declared: Option<&BTreeSet<SubjectId>>,
) -> AppResult<BTreeMap<SubjectId, EdgeObservation>> {
    let is_declared = |subject: &SubjectId| declared.is_some_and(|set| set.contains(subject));
    let mut partial: BTreeMap<SubjectId, PartialObservation> = BTreeMap::new();

    for (name, value) in &record.attributes {
        if let Some(subject) = name.strip_prefix(OBSERVATIONS_PREFIX) {
            let subject = SubjectId::new(subject);
            let Some(count) = value.as_u64() else {
                if is_declared(&subject) {
                    return Err(AppError::invalid_input(format!(
                        "Attribute '{name}' must be a non-negative integer"
                    )));
                }
                debug!(attribute = %name, "Skipping non-integer observation count");
                continue;
            };
            partial
                .entry(subject)
                .or_insert_with(|| (SegmentMetrics::default(), BTreeSet::new(), 1))
                .2 = count;
            continue;
        }
        // Foreign attributes (street names, OSM ids) are ignored.
        let Ok(key) = name.parse::<WeightKey>() else {
            continue;
        };
        let Some(number) = value.as_f64().filter(|number| number.is_finite()) else {
            if is_declared(&key.subject) {
                return Err(AppError::invalid_input(format!(
                    "Attribute '{name}' must be a finite number"
                )));
            }
            debug!(attribute = %name, "Skipping non-numeric attribute");
            continue;
        };
        let entry = partial
            .entry(key.subject)
            .or_insert_with(|| (SegmentMetrics::default(), BTreeSet::new(), 1));
        entry.0.set(key.metric, number);
        entry.1.insert(key.metric);
    }

    Ok(partial
        .into_iter()
        .filter(|(_, (_, seen, _))| seen.len() == Metric::ALL.len())
        .map(|(subject, (mean, _, count))| (subject, EdgeObservation { count, mean }))
        .collect())
}
