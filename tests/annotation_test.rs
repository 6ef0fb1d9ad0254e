// ABOUTME: Integration tests for the graph annotation engine
// ABOUTME: Covers idempotence, running-mean accumulation, exposure fields and fail-fast validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

mod common;

use common::{diamond, single_subject, subject_profile, three_edge_chain, twin_subjects};
use cycle_exposure::config::{ProfileSet, ScenarioConfig, SubjectId};
use cycle_exposure::errors::ErrorCode;
use cycle_exposure::network::{
    AnnotationEngine, AnnotationMode, EdgeKey, ExposureField, Metric, RoadNetwork, WeightKey,
};
use std::collections::HashMap;

fn annotated_chain() -> RoadNetwork {
    let mut network = three_edge_chain();
    AnnotationEngine::new(&ScenarioConfig::default())
        .annotate(&mut network, &single_subject())
        .unwrap();
    network
}

#[test]
fn test_every_edge_receives_every_metric() {
    let network = annotated_chain();
    let subject = SubjectId::new("A");
    for edge in network.edges() {
        let observation = edge.observation(&subject).expect("edge annotated");
        assert_eq!(observation.count, 1);
        for metric in Metric::ALL {
            let value = edge.weight(&WeightKey::new(metric, "A")).unwrap();
            assert!(value.is_finite() && value >= 0.0, "{metric} = {value}");
        }
    }
    assert!(network.has_weight(&"rdd_A".parse().unwrap()));
    assert!(!network.has_weight(&"rdd_B".parse().unwrap()));
}

#[test]
fn test_report_describes_the_pass() {
    let mut network = three_edge_chain();
    let report = AnnotationEngine::new(&ScenarioConfig::default())
        .annotate(&mut network, &twin_subjects())
        .unwrap();
    assert_eq!(report.edges, 3);
    assert_eq!(report.subjects, vec![SubjectId::new("A"), SubjectId::new("B")]);
    assert_eq!(report.mode, AnnotationMode::Overwrite);
}

#[test]
fn test_overwrite_annotation_is_idempotent() {
    let mut network = annotated_chain();
    let first = network.to_document();
    AnnotationEngine::new(&ScenarioConfig::default())
        .annotate(&mut network, &single_subject())
        .unwrap();
    assert_eq!(network.to_document(), first);
}

#[test]
fn test_running_mean_counts_repeated_samples() {
    let mut network = annotated_chain();
    let before: Vec<_> = network
        .edges()
        .map(|edge| *edge.observation(&SubjectId::new("A")).unwrap())
        .collect();

    AnnotationEngine::new(&ScenarioConfig::default())
        .with_mode(AnnotationMode::RunningMean)
        .annotate(&mut network, &single_subject())
        .unwrap();

    for (edge, prior) in network.edges().zip(before) {
        let observation = edge.observation(&SubjectId::new("A")).unwrap();
        assert_eq!(observation.count, 2);
        assert_eq!(observation.mean, prior.mean);
    }
}

#[test]
fn test_running_mean_averages_distinct_samples() {
    let config = ScenarioConfig::default();
    let mut network = three_edge_chain();
    AnnotationEngine::new(&config)
        .with_exposure(ExposureField::uniform(10.0).unwrap())
        .annotate(&mut network, &single_subject())
        .unwrap();
    let low: Vec<f64> = rdd_values(&network);

    AnnotationEngine::new(&config)
        .with_mode(AnnotationMode::RunningMean)
        .with_exposure(ExposureField::uniform(30.0).unwrap())
        .annotate(&mut network, &single_subject())
        .unwrap();

    // Dose is linear in exposure, so the mean of 10 and 30 µg/m³ is twice the first sample
    for (mean, first) in rdd_values(&network).into_iter().zip(low) {
        assert!((mean - 2.0 * first).abs() < 1e-9 * first.max(1.0));
    }
}

fn rdd_values(network: &RoadNetwork) -> Vec<f64> {
    let key: WeightKey = "rdd_A".parse().unwrap();
    network.edges().map(|edge| edge.weight(&key).unwrap()).collect()
}

#[test]
fn test_parallel_edges_are_annotated_independently() {
    let mut network = three_edge_chain();
    let second = network.add_edge(1, 2, 140.0).unwrap();
    assert_eq!(second.key, 1);

    AnnotationEngine::new(&ScenarioConfig::default())
        .annotate(&mut network, &single_subject())
        .unwrap();

    let key: WeightKey = "travel_time_A".parse().unwrap();
    let first = network
        .edge(&EdgeKey { origin: 1, destination: 2, key: 0 })
        .unwrap();
    let parallel = network.edge(&second).unwrap();
    assert!(parallel.weight(&key).unwrap() > first.weight(&key).unwrap());
}

#[test]
fn test_per_edge_exposure_field() {
    let mut network = diamond();
    let dirty = EdgeKey { origin: 1, destination: 2, key: 0 };
    let field = ExposureField::per_edge(HashMap::from([(dirty, 50.0)]), 10.0).unwrap();
    AnnotationEngine::new(&ScenarioConfig::default())
        .with_exposure(field)
        .annotate(&mut network, &single_subject())
        .unwrap();

    // Both edges are flat and 300 m long; only the concentration differs
    let key: WeightKey = "rdd_A".parse().unwrap();
    let dirty_rdd = network.edge(&dirty).unwrap().weight(&key).unwrap();
    let clean_rdd = network
        .edge(&EdgeKey { origin: 2, destination: 4, key: 0 })
        .unwrap()
        .weight(&key)
        .unwrap();
    assert!((dirty_rdd - 5.0 * clean_rdd).abs() < 1e-9);
}

#[test]
fn test_negative_exposure_is_rejected() {
    assert!(ExposureField::uniform(-1.0).is_err());
    assert!(ExposureField::per_edge(HashMap::new(), f64::NAN).is_err());
}

#[test]
fn test_composite_cost_follows_dose_and_time() {
    let network = annotated_chain();
    let config = ScenarioConfig::default();
    for edge in network.edges() {
        let metrics = edge.observation(&SubjectId::new("A")).unwrap().mean;
        let expected = 0.05 * metrics.rdd_ug * metrics.rdd_ug + 0.5 * metrics.travel_time_s / 60.0;
        assert!((metrics.cost - expected).abs() < 1e-12);
        let expected = config.cost.evaluate(metrics.rdd_ug, metrics.travel_time_s);
        assert!((expected - metrics.cost).abs() < 1e-15);
    }
}

#[test]
fn test_profile_without_speed_fails_before_annotation() {
    let mut profile = subject_profile();
    profile.speed_kph = None;
    let mut network = three_edge_chain();
    let before = network.to_document();

    let error = AnnotationEngine::new(&ScenarioConfig::default())
        .annotate(&mut network, &ProfileSet::new().with("A", profile))
        .unwrap_err();

    assert!(error.code.is_configuration(), "unexpected code {:?}", error.code);
    assert_eq!(network.to_document(), before);
}

#[test]
fn test_invalid_profile_fails_fast() {
    let mut profile = subject_profile();
    profile.hr_max = 60.0;
    let mut network = three_edge_chain();
    let profiles = ProfileSet::new().with("A", subject_profile()).with("Z", profile);

    let error = AnnotationEngine::new(&ScenarioConfig::default())
        .annotate(&mut network, &profiles)
        .unwrap_err();

    assert!(error.code.is_configuration());
    assert!(network.annotated_subjects().next().is_none());
}

#[test]
fn test_empty_profile_set_is_rejected() {
    let mut network = three_edge_chain();
    assert!(AnnotationEngine::new(&ScenarioConfig::default())
        .annotate(&mut network, &ProfileSet::new())
        .is_err());
}

#[test]
fn test_negative_prior_power_is_rejected() {
    let mut network = three_edge_chain();
    let error = AnnotationEngine::new(&ScenarioConfig::default())
        .with_prior_power(-5.0)
        .annotate(&mut network, &single_subject())
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
}

#[test]
fn test_supplied_prior_power_never_lowers_dose() {
    let mut plain = three_edge_chain();
    let mut tired = three_edge_chain();
    let config = ScenarioConfig::default();
    AnnotationEngine::new(&config)
        .annotate(&mut plain, &single_subject())
        .unwrap();
    AnnotationEngine::new(&config)
        .with_prior_power(50_000.0)
        .annotate(&mut tired, &single_subject())
        .unwrap();

    for (a, b) in rdd_values(&plain).into_iter().zip(rdd_values(&tired)) {
        assert!(b >= a);
    }
}

#[test]
fn test_adding_an_edge_invalidates_annotation() {
    let mut network = annotated_chain();
    assert!(network.has_weight(&"rdd_A".parse().unwrap()));
    network.add_edge(4, 1, 300.0).unwrap();
    assert!(!network.has_weight(&"rdd_A".parse().unwrap()));
}

// === Graph shape ===

#[test]
fn test_non_positive_edge_length_is_rejected() {
    let mut network = annotated_chain();
    for length in [0.0, -0.0, -25.0] {
        let error = network.add_edge(1, 3, length).unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidInput, "length {length}");
    }
    assert_eq!(network.edge_count(), 3);
    // A rejected edge leaves the existing annotation usable
    assert!(network.has_weight(&"rdd_A".parse().unwrap()));
}

#[test]
fn test_non_finite_graph_input_is_rejected() {
    let mut network = RoadNetwork::new();
    network.add_node(1, 0.0).unwrap();
    network.add_node(2, 0.0).unwrap();
    for length in [f64::NAN, f64::INFINITY] {
        let error = network.add_edge(1, 2, length).unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidInput);
    }
    assert_eq!(network.edge_count(), 0);

    let error = network.add_node(3, f64::NAN).unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert!(network.add_positioned_node(4, 10.0, 51.5, f64::INFINITY).is_err());
    assert_eq!(network.node_count(), 2);
}
