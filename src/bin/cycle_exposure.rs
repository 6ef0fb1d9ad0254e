// ABOUTME: Command-line tool for network annotation, route evaluation and strategy comparison
// ABOUTME: Reads JSON networks, profiles and trajectories; writes JSON results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Annotate a network for every subject in a profile file
//! cycle-exposure annotate --network graph.json --profiles subjects.json --output annotated.json
//!
//! # Least-dose and fastest routes for subject A between two nodes
//! cycle-exposure route --network annotated.json --origin 1 --destination 42 \
//!     --weight rdd_A --weight travel_time_A
//!
//! # Compare two strategies over 500 random trips
//! cycle-exposure compare --network annotated.json \
//!     --strategy fastest=travel_time_A --strategy cleanest=rdd_A --seed 7
//!
//! # Dose along a recorded commute
//! cycle-exposure trajectory --profiles subjects.json --subject A --input commute.json
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use cycle_exposure::comparator::{MonteCarloComparator, Strategy};
use cycle_exposure::config::{MonteCarloConfig, ProfileSet, ScenarioConfig, SubjectId};
use cycle_exposure::logging::LoggingConfig;
use cycle_exposure::network::{
    AnnotationEngine, AnnotationMode, ExposureField, NetworkDocument, NodeId, RoadNetwork,
    WeightKey,
};
use cycle_exposure::reporting::{SummaryLog, SummaryRow};
use cycle_exposure::routing::{DijkstraSearch, RouteAggregator};
use cycle_exposure::statistics::TTestKind;
use cycle_exposure::trajectory::{TrajectoryEvaluator, TrajectoryPoint};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "cycle-exposure",
    about = "Cyclist inhaled-dose estimation and exposure-aware routing",
    long_about = "Annotate road networks with per-subject dose, energy and time, search routes \
                  under those weights, and compare routing strategies statistically."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Scenario JSON file (defaults plus EXPOSURE_* environment overrides when omitted)
    #[arg(long, global = true)]
    scenario: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Write per-subject metrics onto every edge of a network
    Annotate {
        /// Input network document
        #[arg(long)]
        network: PathBuf,

        /// Subject profiles
        #[arg(long)]
        profiles: PathBuf,

        /// Output network document
        #[arg(long)]
        output: PathBuf,

        /// Merge into a running mean instead of overwriting
        #[arg(long)]
        running_mean: bool,

        /// Fixed prior power sum (W) used in place of an empty history
        #[arg(long)]
        prior_power: Option<f64>,
    },

    /// Evaluate routes between two nodes under one or more weight keys
    Route {
        /// Annotated network document
        #[arg(long)]
        network: PathBuf,

        /// Origin node id
        #[arg(long, required_unless_present = "from")]
        origin: Option<NodeId>,

        /// Destination node id
        #[arg(long, required_unless_present = "to")]
        destination: Option<NodeId>,

        /// Origin as "lat,lon"; snapped to the nearest node
        #[arg(long, conflicts_with = "origin")]
        from: Option<String>,

        /// Destination as "lat,lon"; snapped to the nearest node
        #[arg(long, conflicts_with = "destination")]
        to: Option<String>,

        /// Weight keys such as `rdd_A` or `travel_time_B`
        #[arg(long = "weight", required = true)]
        weights: Vec<String>,

        /// Profiles for replaying each route with a carried power history
        #[arg(long)]
        profiles: Option<PathBuf>,
    },

    /// Monte-Carlo comparison of routing strategies
    Compare {
        /// Annotated network document
        #[arg(long)]
        network: PathBuf,

        /// Strategies as `label=weight_key`; the first is the reference
        #[arg(long = "strategy", required = true, num_args = 1)]
        strategies: Vec<String>,

        /// Number of trials (overrides the scenario)
        #[arg(long)]
        trials: Option<usize>,

        /// RNG seed (overrides the scenario)
        #[arg(long)]
        seed: Option<u64>,

        /// Use Welch's unequal-variance test
        #[arg(long)]
        welch: bool,

        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write per-strategy summary rows here
        #[arg(long)]
        summary_log: Option<PathBuf>,
    },

    /// Dose along recorded trajectories
    Trajectory {
        /// Subject profiles
        #[arg(long)]
        profiles: PathBuf,

        /// Subject to evaluate
        #[arg(long)]
        subject: String,

        /// Trajectory JSON files (arrays of points)
        #[arg(long = "input", required = true)]
        inputs: Vec<PathBuf>,

        /// Write per-trajectory summary rows here
        #[arg(long)]
        summary_log: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging = logging.with_level("debug");
    }
    logging.init()?;

    let scenario = load_scenario(cli.scenario.as_deref())?;

    match cli.command {
        Command::Annotate {
            network,
            profiles,
            output,
            running_mean,
            prior_power,
        } => annotate(
            &scenario,
            &network,
            &profiles,
            &output,
            running_mean,
            prior_power,
        ),
        Command::Route {
            network,
            origin,
            destination,
            from,
            to,
            weights,
            profiles,
        } => {
            let network = load_network(&network)?;
            let origin = resolve_node(&network, origin, from.as_deref())?;
            let destination = resolve_node(&network, destination, to.as_deref())?;
            route(&scenario, &network, origin, destination, &weights, profiles.as_deref())
        }
        Command::Compare {
            network,
            strategies,
            trials,
            seed,
            welch,
            output,
            summary_log,
        } => {
            let mut config = scenario.monte_carlo;
            if let Some(trials) = trials {
                config.trials = trials;
            }
            if seed.is_some() {
                config.seed = seed;
            }
            if welch {
                config.test = TTestKind::Welch;
            }
            compare(
                &load_network(&network)?,
                &strategies,
                config,
                output.as_deref(),
                summary_log.as_deref(),
            )
        }
        Command::Trajectory {
            profiles,
            subject,
            inputs,
            summary_log,
        } => trajectory(&scenario, &profiles, &subject, &inputs, summary_log.as_deref()),
    }
}

fn load_scenario(path: Option<&Path>) -> Result<ScenarioConfig> {
    let config = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading scenario {}", path.display()))?;
            ScenarioConfig::from_json(&raw)?
        }
        None => ScenarioConfig::from_env()?,
    };
    Ok(config)
}

fn load_network(path: &Path) -> Result<RoadNetwork> {
    let document = NetworkDocument::from_path(path)
        .with_context(|| format!("loading network {}", path.display()))?;
    Ok(RoadNetwork::from_document(&document)?)
}

fn resolve_node(network: &RoadNetwork, id: Option<NodeId>, point: Option<&str>) -> Result<NodeId> {
    if let Some(id) = id {
        return Ok(id);
    }
    let point = point.ok_or_else(|| anyhow!("either a node id or a lat,lon point is required"))?;
    let (lat, lon) = point
        .split_once(',')
        .ok_or_else(|| anyhow!("expected 'lat,lon', got '{point}'"))?;
    let (lat, lon) = (lat.trim().parse::<f64>()?, lon.trim().parse::<f64>()?);
    network
        .nearest_node(lat, lon)
        .ok_or_else(|| anyhow!("network nodes carry no coordinates"))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn annotate(
    scenario: &ScenarioConfig,
    network_path: &Path,
    profiles_path: &Path,
    output: &Path,
    running_mean: bool,
    prior_power: Option<f64>,
) -> Result<()> {
    let mut network = load_network(network_path)?;
    let profiles = ProfileSet::from_path(profiles_path)?;

    let mut engine = AnnotationEngine::new(scenario).with_exposure(ExposureField::uniform(
        scenario.exposure.ambient_pm25,
    )?);
    if running_mean {
        engine = engine.with_mode(AnnotationMode::RunningMean);
    }
    if let Some(prior) = prior_power {
        engine = engine.with_prior_power(prior);
    }

    let report = engine.annotate(&mut network, &profiles)?;
    network.to_document().to_path(output)?;
    info!(output = %output.display(), "Annotated network written");
    print_json(&report)
}

fn route(
    scenario: &ScenarioConfig,
    network: &RoadNetwork,
    origin: NodeId,
    destination: NodeId,
    weights: &[String],
    profiles: Option<&Path>,
) -> Result<()> {
    let keys = weights
        .iter()
        .map(|raw| raw.parse::<WeightKey>())
        .collect::<Result<Vec<_>, _>>()?;
    let aggregator = RouteAggregator::new(network, DijkstraSearch);
    let summaries = aggregator.compare(origin, destination, &keys)?;
    print_json(&summaries)?;

    if let Some(path) = profiles {
        let profiles = ProfileSet::from_path(path)?;
        let exposure = ExposureField::uniform(scenario.exposure.ambient_pm25)?;
        let mut log = SummaryLog::new();
        for summary in summaries.iter().flatten() {
            let profile = profiles.get(&summary.subject)?;
            let replay = aggregator.replay(
                &summary.route,
                &summary.subject,
                profile,
                scenario,
                &exposure,
            )?;
            info!(
                weight = %summary.weight_key,
                static_rdd_ug = summary.rdd_ug,
                replay_rdd_ug = replay.rdd_ug,
                "Route replayed with carried power history"
            );
            log.extend(SummaryRow::from_replay(
                summary.subject.clone(),
                summary.weight_key.to_string(),
                &replay,
            ));
        }
        print_json(&log)?;
    }
    Ok(())
}

fn parse_strategy(raw: &str) -> Result<Strategy> {
    let (label, key) = raw
        .split_once('=')
        .map_or((raw, raw), |(label, key)| (label.trim(), key.trim()));
    Ok(Strategy::new(label, key.parse::<WeightKey>()?))
}

fn compare(
    network: &RoadNetwork,
    strategies: &[String],
    config: MonteCarloConfig,
    output: Option<&Path>,
    summary_log: Option<&Path>,
) -> Result<()> {
    let strategies = strategies
        .iter()
        .map(String::as_str)
        .map(parse_strategy)
        .collect::<Result<Vec<_>>>()?;
    let comparator =
        MonteCarloComparator::new(RouteAggregator::new(network, DijkstraSearch), config);
    let report = comparator.run(&strategies)?;

    for sample in &report.samples {
        info!(
            strategy = %sample.label,
            routes = sample.doses_ug.len(),
            skipped = sample.skipped,
            mean_rdd_ug = ?sample.mean_rdd_ug(),
            "Strategy sample"
        );
    }
    if let Some(path) = summary_log {
        SummaryLog::from_comparator(&report).to_path(path)?;
    }
    match output {
        Some(path) => {
            fs::write(path, serde_json::to_string_pretty(&report)?)?;
            Ok(())
        }
        None => print_json(&report),
    }
}

fn trajectory(
    scenario: &ScenarioConfig,
    profiles_path: &Path,
    subject: &str,
    inputs: &[PathBuf],
    summary_log: Option<&Path>,
) -> Result<()> {
    let profiles = ProfileSet::from_path(profiles_path)?;
    let subject = SubjectId::new(subject);
    let evaluator = TrajectoryEvaluator::new(subject.clone(), profiles.get(&subject)?, scenario)?;

    let mut trajectories = Vec::with_capacity(inputs.len());
    for path in inputs {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading trajectory {}", path.display()))?;
        let points: Vec<TrajectoryPoint> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing trajectory {}", path.display()))?;
        trajectories.push(points);
    }
    let doses = evaluator.evaluate_all(&trajectories)?;

    let mut log = SummaryLog::new();
    for (path, dose) in inputs.iter().zip(&doses) {
        let label = path
            .file_stem()
            .map_or_else(|| path.display().to_string(), |stem| stem.to_string_lossy().into_owned());
        log.extend(SummaryRow::from_trajectory(subject.clone(), label, dose));
    }
    if let Some(path) = summary_log {
        log.to_path(path)?;
    }
    print_json(&log)
}
