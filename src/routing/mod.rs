// ABOUTME: Route search over the annotated network and per-route metric aggregation
// ABOUTME: Search is a pluggable collaborator; aggregation sums every metric along a route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Routing
//!
//! The network must be fully annotated before any query; queries take the
//! network by shared reference, so they cannot overlap an annotation pass.

/// Route-level aggregation and replay
pub mod aggregate;
/// Path-finding collaborator
pub mod search;

pub use aggregate::{ReplaySummary, RouteAggregator, RouteSummary};
pub use search::{DijkstraSearch, PathFinder, Route};
