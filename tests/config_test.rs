// ABOUTME: Tests for scenario configuration, environment overrides and subject profile loading
// ABOUTME: Environment tests run serially since they mutate process-wide variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use cycle_exposure::config::{ConfigError, ProfileSet, ScenarioConfig, Sex, SubjectId};
use cycle_exposure::constants::env_config;
use cycle_exposure::errors::{AppError, ErrorCode};
use cycle_exposure::physiology::{HistoryReset, RespiratoryRegion};
use cycle_exposure::statistics::TTestKind;
use serial_test::serial;
use std::env;
use std::io::Write;

const ALL_KEYS: [&str; 9] = [
    env_config::AMBIENT_PM25,
    env_config::MMD_UM,
    env_config::HISTORY_WINDOW,
    env_config::HISTORY_RESET,
    env_config::TRIALS,
    env_config::SEED,
    env_config::COST_DOSE_WEIGHT,
    env_config::COST_TIME_WEIGHT,
    env_config::CONCENTRATION_CAP,
];

fn clear_env() {
    for key in ALL_KEYS {
        env::remove_var(key);
    }
}

// === Scenario defaults ===

#[test]
fn test_default_scenario_is_valid() {
    let config = ScenarioConfig::default();
    config.validate().unwrap();
    assert_eq!(config.exposure.ambient_pm25, 10.0);
    assert_eq!(config.deposition.mmd_um, 0.53);
    assert_eq!(config.deposition.region, RespiratoryRegion::Total);
    assert_eq!(config.history.window, 20);
    assert_eq!(config.history.reset, HistoryReset::PerRoute);
    assert_eq!(config.trajectory.concentration_cap, Some(85.0));
    assert_eq!(config.monte_carlo.test, TTestKind::Student);
    assert!(config.monte_carlo.seed.is_none());
}

#[test]
fn test_invalid_physics_is_rejected() {
    let mut config = ScenarioConfig::default();
    config.physics.mechanical_efficiency = 1.2;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidRange(_))));

    let mut config = ScenarioConfig::default();
    config.physics.gravity = f64::NAN;
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_scenario_sections_are_rejected() {
    let mut config = ScenarioConfig::default();
    config.monte_carlo.significance = 1.0;
    assert!(config.validate().is_err());

    let mut config = ScenarioConfig::default();
    config.cost.time_weight = -0.5;
    assert!(config.validate().is_err());

    let mut config = ScenarioConfig::default();
    config.trajectory.concentration_cap = Some(0.0);
    assert!(config.validate().is_err());

    let mut config = ScenarioConfig::default();
    config.history.window = 0;
    assert!(config.validate().is_err());
    config.history.reset = HistoryReset::PerEdge;
    config.validate().unwrap();
}

#[test]
fn test_scenario_json_fills_missing_sections() {
    let config = ScenarioConfig::from_json(
        r#"{
            "cost": { "dose_weight": 0.1 },
            "history": { "reset": "never" },
            "monte_carlo": { "trials": 50, "seed": 42, "test": "welch" }
        }"#,
    )
    .unwrap();
    assert_eq!(config.cost.dose_weight, 0.1);
    assert_eq!(config.cost.time_weight, 0.5);
    assert_eq!(config.history.reset, HistoryReset::Never);
    assert_eq!(config.history.window, 20);
    assert_eq!(config.monte_carlo.trials, 50);
    assert_eq!(config.monte_carlo.seed, Some(42));
    assert_eq!(config.monte_carlo.test, TTestKind::Welch);
    assert_eq!(config.physics, ScenarioConfig::default().physics);
}

#[test]
fn test_malformed_scenario_json_is_a_parse_error() {
    assert!(matches!(
        ScenarioConfig::from_json("{ not json"),
        Err(ConfigError::Parse(_))
    ));
}

// === Environment overrides ===

#[test]
#[serial]
fn test_environment_overrides() {
    clear_env();
    env::set_var(env_config::AMBIENT_PM25, "22.5");
    env::set_var(env_config::HISTORY_RESET, "per-edge");
    env::set_var(env_config::SEED, "17");
    env::set_var(env_config::CONCENTRATION_CAP, "none");

    let config = ScenarioConfig::from_env().unwrap();
    assert_eq!(config.exposure.ambient_pm25, 22.5);
    assert_eq!(config.history.reset, HistoryReset::PerEdge);
    assert_eq!(config.monte_carlo.seed, Some(17));
    assert_eq!(config.trajectory.concentration_cap, None);
    assert_eq!(config.cost, ScenarioConfig::default().cost);

    clear_env();
}

#[test]
#[serial]
fn test_environment_cap_value() {
    clear_env();
    env::set_var(env_config::CONCENTRATION_CAP, " 120 ");
    let config = ScenarioConfig::from_env().unwrap();
    assert_eq!(config.trajectory.concentration_cap, Some(120.0));
    clear_env();
}

#[test]
#[serial]
fn test_unparseable_environment_value_fails() {
    clear_env();
    env::set_var(env_config::TRIALS, "many");
    assert!(matches!(
        ScenarioConfig::from_env(),
        Err(ConfigError::Parse(_))
    ));

    clear_env();
    env::set_var(env_config::HISTORY_RESET, "sometimes");
    assert!(ScenarioConfig::from_env().is_err());
    clear_env();
}

#[test]
#[serial]
fn test_out_of_range_environment_value_fails_validation() {
    clear_env();
    env::set_var(env_config::AMBIENT_PM25, "-3");
    assert!(matches!(
        ScenarioConfig::from_env(),
        Err(ConfigError::InvalidRange(_))
    ));
    clear_env();
}

// === Subject profiles ===

const PROFILES_JSON: &str = r#"{
    "A": { "hr_0": 70, "m": 80, "Tr": 24, "hr_max": 180, "c": 0.2, "kf": 3e-5, "sex": "M", "v": 15 },
    "B": { "hr_0": 65, "m": 62, "Tr": 30, "hr_max": 190, "c": 0.25, "kf": 2e-5, "sex": "F" }
}"#;

#[test]
fn test_profiles_parse_source_field_names() {
    let profiles = ProfileSet::from_json(PROFILES_JSON).unwrap();
    assert_eq!(profiles.len(), 2);

    let a = profiles.get(&SubjectId::new("A")).unwrap();
    assert_eq!(a.resting_hr, 70.0);
    assert_eq!(a.rise_time_s, 24.0);
    assert_eq!(a.memory_weight, 3e-5);
    assert_eq!(a.sex, Sex::Male);
    assert!((a.nominal_speed_mps().unwrap() - 15.0 / 3.6).abs() < 1e-12);

    let b = profiles.get(&SubjectId::new("B")).unwrap();
    assert_eq!(b.sex, Sex::Female);
    assert!(b.speed_kph.is_none());
    assert!(matches!(b.nominal_speed_mps(), Err(ConfigError::MissingField(_))));
}

#[test]
fn test_routing_requires_nominal_speed() {
    let profiles = ProfileSet::from_json(PROFILES_JSON).unwrap();
    profiles.validate().unwrap();
    assert!(matches!(
        profiles.validate_for_routing(),
        Err(ConfigError::InvalidProfile { ref subject, .. }) if subject == "B"
    ));
}

#[test]
fn test_config_errors_carry_subject_details() {
    let profiles = ProfileSet::from_json(PROFILES_JSON).unwrap();
    let error = AppError::from(profiles.validate_for_routing().unwrap_err());
    assert_eq!(error.code, ErrorCode::ConfigInvalid);
    assert_eq!(error.details["subject"], "B");

    let unknown = AppError::from(profiles.get(&SubjectId::new("Z")).unwrap_err());
    assert_eq!(unknown.code, ErrorCode::ResourceNotFound);
    assert_eq!(unknown.details["subject"], "Z");

    let missing = AppError::from(ConfigError::MissingField("speed"));
    assert_eq!(missing.code, ErrorCode::ConfigMissing);
    assert!(missing.details.is_null());
    assert!(missing.code.is_configuration());
}

#[test]
fn test_missing_profile_field_fails_to_parse() {
    let json = r#"{ "A": { "hr_0": 70, "m": 80, "hr_max": 180, "c": 0.2, "kf": 3e-5, "sex": "M" } }"#;
    assert!(matches!(ProfileSet::from_json(json), Err(ConfigError::Parse(_))));
}

#[test]
fn test_implausible_profile_is_rejected() {
    let json = r#"{ "A": { "hr_0": 190, "m": 80, "Tr": 24, "hr_max": 180, "c": 0.2, "kf": 3e-5, "sex": "M" } }"#;
    assert!(matches!(
        ProfileSet::from_json(json),
        Err(ConfigError::InvalidProfile { .. })
    ));
}

#[test]
fn test_unknown_subject_lookup() {
    let profiles = ProfileSet::from_json(PROFILES_JSON).unwrap();
    assert!(matches!(
        profiles.get(&SubjectId::new("Z")),
        Err(ConfigError::UnknownSubject(_))
    ));
}

#[test]
fn test_profiles_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PROFILES_JSON.as_bytes()).unwrap();
    let profiles = ProfileSet::from_path(file.path()).unwrap();
    assert_eq!(profiles.iter().map(|(id, _)| id.as_str()).collect::<Vec<_>>(), ["A", "B"]);

    assert!(ProfileSet::from_path("/definitely/not/here.json").is_err());
}
