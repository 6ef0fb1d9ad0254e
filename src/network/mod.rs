// ABOUTME: Road network storage and the per-subject edge annotation engine
// ABOUTME: Directed multigraph with elevation-carrying nodes and metric-carrying edges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Road network
//!
//! - [`graph`]: petgraph-backed directed multigraph keyed by external node ids
//! - [`weights`]: metric names and the `{metric}_{subject}` weight keys
//! - [`accumulator`]: per-edge observation count and running mean
//! - [`exposure`]: concentration assigned to each edge during annotation
//! - [`annotation`]: the pass writing energy, dose, time and cost onto edges
//! - [`document`]: serde document form for persistence collaborators

/// Per-edge observation accumulator
pub mod accumulator;
/// Annotation engine
pub mod annotation;
/// Serialisable network document
pub mod document;
/// Exposure field over edges
pub mod exposure;
/// Graph storage
pub mod graph;
/// Metric names and weight keys
pub mod weights;

pub use accumulator::{EdgeObservation, SegmentMetrics};
pub use annotation::{AnnotationEngine, AnnotationMode, AnnotationReport};
pub use document::{EdgeRecord, NetworkDocument, NodeRecord};
pub use exposure::ExposureField;
pub use graph::{EdgeKey, NodeId, RoadEdge, RoadNetwork, RoadNode};
pub use weights::{Metric, WeightKey};
