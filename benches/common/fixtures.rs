// ABOUTME: Benchmark fixtures generating grid road networks and subject profiles
// ABOUTME: Provides deterministic data generation for reproducible performance measurements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Benchmark fixtures for networks and subject profiles.

use cycle_exposure::config::{ProfileSet, Sex, SubjectProfile};
use cycle_exposure::network::RoadNetwork;

/// Predefined grid sizes for benchmark scenarios
#[derive(Debug, Clone, Copy)]
pub enum NetworkSize {
    /// 10 × 10 grid (360 directed edges)
    Small,
    /// 30 × 30 grid (3 480 directed edges)
    Medium,
}

impl NetworkSize {
    #[must_use]
    pub const fn side(self) -> u64 {
        match self {
            Self::Small => 10,
            Self::Medium => 30,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
        }
    }
}

/// Bidirectional grid with rolling terrain and positioned nodes
///
/// # Panics
///
/// Never for the sizes above; node ids are unique by construction
#[allow(clippy::cast_precision_loss, clippy::unwrap_used)]
#[must_use]
pub fn grid_network(size: NetworkSize) -> RoadNetwork {
    let side = size.side();
    let id = |row: u64, col: u64| row * side + col;
    let mut network = RoadNetwork::new();
    for row in 0..side {
        for col in 0..side {
            let elevation = ((row * 13 + col * 7) % 17) as f64 * 1.8;
            network
                .add_positioned_node(
                    id(row, col),
                    elevation,
                    48.85 + row as f64 * 0.0009,
                    2.35 + col as f64 * 0.0013,
                )
                .unwrap();
        }
    }
    for row in 0..side {
        for col in 0..side {
            let length = 60.0 + ((row * 3 + col * 5) % 9) as f64 * 20.0;
            if col + 1 < side {
                network.add_edge(id(row, col), id(row, col + 1), length).unwrap();
                network.add_edge(id(row, col + 1), id(row, col), length).unwrap();
            }
            if row + 1 < side {
                network.add_edge(id(row, col), id(row + 1, col), length).unwrap();
                network.add_edge(id(row + 1, col), id(row, col), length).unwrap();
            }
        }
    }
    network
}

/// `count` subjects with varied physiology, ids `S0`, `S1`, ...
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn profiles(count: usize) -> ProfileSet {
    (0..count).fold(ProfileSet::new(), |set, index| {
        let offset = index as f64;
        set.with(
            format!("S{index}"),
            SubjectProfile {
                resting_hr: 60.0 + offset * 2.0,
                mass_kg: 70.0 + offset * 3.0,
                rise_time_s: 20.0 + offset,
                hr_max: 185.0 - offset,
                gain: 0.15 + offset * 0.01,
                memory_weight: 3e-5,
                sex: if index % 2 == 0 { Sex::Male } else { Sex::Female },
                speed_kph: Some(14.0 + offset),
            },
        )
    })
}
