// ABOUTME: Shared fixtures for integration tests: subject profiles, small networks and trajectories
// ABOUTME: Keeps network construction and scenario setup out of the individual test files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `cycle_exposure`

use chrono::{DateTime, Duration, TimeZone, Utc};
use cycle_exposure::config::{ProfileSet, Sex, SubjectProfile};
use cycle_exposure::network::RoadNetwork;
use cycle_exposure::trajectory::TrajectoryPoint;
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("warn")
            .with_test_writer()
            .try_init();
    });
}

/// Nominal cruising speed used by the routing fixtures (km/h)
pub const NOMINAL_SPEED_KPH: f64 = 15.0;

/// Reference subject: hr0 70, m 80, Tr 24, hrMax 180, c 0.2, kf 3e-5, male
pub fn subject_profile() -> SubjectProfile {
    SubjectProfile {
        resting_hr: 70.0,
        mass_kg: 80.0,
        rise_time_s: 24.0,
        hr_max: 180.0,
        gain: 0.2,
        memory_weight: 3e-5,
        sex: Sex::Male,
        speed_kph: Some(NOMINAL_SPEED_KPH),
    }
}

/// Profile set holding the reference subject under id `A`
pub fn single_subject() -> ProfileSet {
    ProfileSet::new().with("A", subject_profile())
}

/// Two physiologically identical subjects `A` and `B`
pub fn twin_subjects() -> ProfileSet {
    ProfileSet::new()
        .with("A", subject_profile())
        .with("B", subject_profile())
}

/// Chain 1 → 2 → 3 → 4 with lengths [100, 200, 150] m and climbs [5, -3, 0] m
pub fn three_edge_chain() -> RoadNetwork {
    let mut network = RoadNetwork::new();
    network.add_node(1, 10.0).unwrap();
    network.add_node(2, 15.0).unwrap();
    network.add_node(3, 12.0).unwrap();
    network.add_node(4, 12.0).unwrap();
    network.add_edge(1, 2, 100.0).unwrap();
    network.add_edge(2, 3, 200.0).unwrap();
    network.add_edge(3, 4, 150.0).unwrap();
    network
}

/// Diamond with a short route 1 → 2 → 4 and a longer route 1 → 3 → 4
pub fn diamond() -> RoadNetwork {
    let mut network = RoadNetwork::new();
    for id in 1..=4 {
        network.add_node(id, 20.0).unwrap();
    }
    network.add_edge(1, 2, 300.0).unwrap();
    network.add_edge(2, 4, 300.0).unwrap();
    network.add_edge(1, 3, 450.0).unwrap();
    network.add_edge(3, 4, 450.0).unwrap();
    network
}

/// Bidirectional `size × size` grid with rolling terrain and positioned nodes
pub fn grid(size: u64) -> RoadNetwork {
    let mut network = RoadNetwork::new();
    let id = |row: u64, col: u64| row * size + col;
    for row in 0..size {
        for col in 0..size {
            let elevation = ((row * 7 + col * 3) % 11) as f64 * 2.5;
            let latitude = 51.5 + row as f64 * 0.001;
            let longitude = -0.12 + col as f64 * 0.0015;
            network
                .add_positioned_node(id(row, col), elevation, latitude, longitude)
                .unwrap();
        }
    }
    for row in 0..size {
        for col in 0..size {
            let length = 80.0 + ((row + 2 * col) % 5) as f64 * 30.0;
            if col + 1 < size {
                network.add_edge(id(row, col), id(row, col + 1), length).unwrap();
                network.add_edge(id(row, col + 1), id(row, col), length).unwrap();
            }
            if row + 1 < size {
                network.add_edge(id(row, col), id(row + 1, col), length + 20.0).unwrap();
                network.add_edge(id(row + 1, col), id(row, col), length + 20.0).unwrap();
            }
        }
    }
    network
}

/// Fixed start time for trajectory fixtures
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 14, 8, 0, 0).unwrap()
}

/// Point `seconds` after [`start_time`]
pub fn point(
    seconds: i64,
    latitude: f64,
    longitude: f64,
    altitude_m: f64,
    pm25: f64,
) -> TrajectoryPoint {
    TrajectoryPoint {
        timestamp: start_time() + Duration::seconds(seconds),
        latitude,
        longitude,
        altitude_m,
        pm25,
    }
}

/// Northbound commute sampled every 10 s, climbing then descending
pub fn commute(samples: usize, pm25: f64) -> Vec<TrajectoryPoint> {
    (0..samples)
        .map(|i| {
            let altitude = if i < samples / 2 {
                i as f64 * 1.5
            } else {
                (samples - i) as f64 * 1.5
            };
            point(i as i64 * 10, 51.5 + i as f64 * 0.0004, -0.12, altitude, pm25)
        })
        .collect()
}
