// ABOUTME: Integration tests for trajectory segmentation and dose evaluation
// ABOUTME: Covers timestamp checks, concentration capping, start-point exposure and history effects
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

mod common;

use common::{commute, init_test_logging, point, subject_profile};
use cycle_exposure::config::{HistoryConfig, ScenarioConfig, SubjectId, TrajectoryConfig};
use cycle_exposure::errors::ErrorCode;
use cycle_exposure::physiology::HistoryReset;
use cycle_exposure::reporting::SummaryRow;
use cycle_exposure::trajectory::{segments, TrajectoryEvaluator, TrajectoryPoint};

fn evaluator(config: &ScenarioConfig) -> TrajectoryEvaluator {
    TrajectoryEvaluator::new(SubjectId::new("A"), &subject_profile(), config).unwrap()
}

fn with_pm(points: &[TrajectoryPoint], pm25: f64) -> Vec<TrajectoryPoint> {
    points.iter().map(|p| TrajectoryPoint { pm25, ..*p }).collect()
}

// === Segmentation ===

#[test]
fn test_segments_pair_consecutive_points() {
    let points = commute(12, 15.0);
    let inputs = segments(&points, Some(85.0)).unwrap();
    assert_eq!(inputs.len(), 11);
    for input in &inputs {
        assert_eq!(input.duration_s, 10.0);
        // 0.0004° of latitude is roughly 44.5 m
        assert!((input.length_m - 44.5).abs() < 0.5, "length {}", input.length_m);
        assert_eq!(input.exposure_ug_m3, 15.0);
    }
    assert_eq!(inputs[0].d_height_m, 1.5);
}

#[test]
fn test_single_point_has_no_segments() {
    let points = commute(1, 15.0);
    assert!(segments(&points, None).unwrap().is_empty());
    assert!(segments(&[], None).unwrap().is_empty());
}

#[test]
fn test_non_increasing_timestamps_are_rejected() {
    let points = vec![
        point(0, 51.5, -0.12, 10.0, 12.0),
        point(10, 51.5004, -0.12, 10.0, 12.0),
        point(10, 51.5008, -0.12, 10.0, 12.0),
    ];
    let error = segments(&points, None).unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);

    let backwards = vec![point(20, 51.5, -0.12, 10.0, 12.0), point(5, 51.5004, -0.12, 10.0, 12.0)];
    assert!(segments(&backwards, None).is_err());
}

#[test]
fn test_invalid_samples_are_rejected() {
    let negative = vec![point(0, 51.5, -0.12, 10.0, -1.0), point(10, 51.5004, -0.12, 10.0, 5.0)];
    assert!(segments(&negative, None).is_err());

    let unpositioned = vec![
        point(0, f64::NAN, -0.12, 10.0, 5.0),
        point(10, 51.5004, -0.12, 10.0, 5.0),
    ];
    assert!(segments(&unpositioned, None).is_err());
}

#[test]
fn test_exposure_comes_from_segment_start() {
    let points = vec![
        point(0, 51.5, -0.12, 10.0, 0.0),
        point(10, 51.5004, -0.12, 10.0, 40.0),
        point(20, 51.5008, -0.12, 10.0, 40.0),
    ];
    let inputs = segments(&points, None).unwrap();
    assert_eq!(inputs[0].exposure_ug_m3, 0.0);
    assert_eq!(inputs[1].exposure_ug_m3, 40.0);

    let dose = evaluator(&ScenarioConfig::default()).evaluate(&points).unwrap();
    assert_eq!(dose.segments[0].dose_ug, 0.0);
    assert!(dose.segments[1].dose_ug > 0.0);
}

#[test]
fn test_stationary_segment_is_kept() {
    let points = vec![
        point(0, 51.5, -0.12, 10.0, 20.0),
        point(30, 51.5, -0.12, 10.0, 20.0),
    ];
    let dose = evaluator(&ScenarioConfig::default()).evaluate(&points).unwrap();
    assert_eq!(dose.segments.len(), 1);
    assert_eq!(dose.segments[0].velocity_mps, 0.0);
    assert_eq!(dose.segments[0].rider_power_w, 0.0);
    assert!(dose.segments[0].dose_ug > 0.0);
}

// === Concentration cap ===

#[test]
fn test_concentrations_above_cap_are_clamped() {
    let config = ScenarioConfig::default();
    let base = commute(20, 0.0);
    let capped = evaluator(&config).evaluate(&with_pm(&base, 200.0)).unwrap();
    let at_cap = evaluator(&config).evaluate(&with_pm(&base, 85.0)).unwrap();
    assert_eq!(capped.total_rdd_ug, at_cap.total_rdd_ug);
}

#[test]
fn test_disabled_cap_keeps_raw_concentration() {
    let config = ScenarioConfig {
        trajectory: TrajectoryConfig {
            concentration_cap: None,
        },
        ..ScenarioConfig::default()
    };
    let base = commute(20, 0.0);
    let raw = evaluator(&config).evaluate(&with_pm(&base, 200.0)).unwrap();
    let at_cap = evaluator(&config).evaluate(&with_pm(&base, 85.0)).unwrap();
    assert!(raw.total_rdd_ug > at_cap.total_rdd_ug);
}

// === History ===

#[test]
fn test_power_history_never_lowers_dose() {
    init_test_logging();
    let dose = evaluator(&ScenarioConfig::default())
        .evaluate(&commute(40, 18.0))
        .unwrap();

    assert_eq!(dose.segments.len(), 39);
    assert!(dose.total_rdd_ug >= dose.total_rdd_without_history_ug);
    let effect = dose.history_effect_percent().unwrap();
    assert!(effect <= 0.0, "effect {effect}");
    assert!(dose.energy_j() > 0.0);

    let expected: f64 = dose.segments.iter().map(|s| s.dose_ug).sum();
    assert!((dose.total_rdd_ug - expected).abs() < 1e-9);
}

#[test]
fn test_zero_exposure_has_no_history_effect() {
    let dose = evaluator(&ScenarioConfig::default())
        .evaluate(&commute(10, 0.0))
        .unwrap();
    assert_eq!(dose.total_rdd_ug, 0.0);
    assert!(dose.history_effect_percent().is_none());
}

#[test]
fn test_history_policy_across_trajectories() {
    let rides = vec![commute(30, 20.0), commute(30, 20.0)];

    let per_route = evaluator(&ScenarioConfig::default()).evaluate_all(&rides).unwrap();
    assert_eq!(per_route[0], per_route[1]);

    let never = ScenarioConfig {
        history: HistoryConfig {
            window: 1000,
            reset: HistoryReset::Never,
        },
        ..ScenarioConfig::default()
    };
    let carried = evaluator(&never).evaluate_all(&rides).unwrap();
    assert!(carried[1].total_rdd_ug >= carried[0].total_rdd_ug);
    assert!(carried[1].segments[0].prior_power_sum_w > 0.0);
}

#[test]
fn test_invalid_profile_is_rejected() {
    let mut profile = subject_profile();
    profile.rise_time_s = 0.0;
    let error =
        TrajectoryEvaluator::new(SubjectId::new("A"), &profile, &ScenarioConfig::default())
            .unwrap_err();
    assert!(error.code.is_configuration());
}

#[test]
fn test_summary_row_from_trajectory() {
    let dose = evaluator(&ScenarioConfig::default())
        .evaluate(&commute(25, 12.0))
        .unwrap();
    let row = SummaryRow::from_trajectory(SubjectId::new("A"), "commute.json", &dose).unwrap();
    assert_eq!(row.count, 24);
    assert_eq!(row.label, "commute.json");
    assert!((row.total - dose.total_rdd_ug).abs() < 1e-9);
}
