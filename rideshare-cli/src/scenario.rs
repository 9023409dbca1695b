//! `match` command: run the pipeline over a scenario read from disk.

use std::collections::HashSet;
use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rideshare_core::{Coordinate, RideRequest, Vehicle};
use rideshare_sim::{SimulationParams, SimulationResult};
use serde::{Deserialize, Serialize};

use crate::fs::{self, PathKind};
use crate::{
    ARG_SCENARIO, CliError, DEFAULT_SEED, ENV_MATCH_SCENARIO, build_pipeline, emit_result,
    validate_output,
};

/// CLI arguments for the `match` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load ride requests and vehicles from a JSON scenario of the \
                 form {\"requests\": [...], \"vehicles\": [...]}, then cluster, \
                 match and route them exactly as `simulate` does.",
    about = "Simulate pooled matching over a scenario file"
)]
#[ortho_config(prefix = "RIDESHARE")]
pub(crate) struct MatchArgs {
    /// Path to the JSON scenario.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) scenario: Option<Utf8PathBuf>,
    /// Furthest a vehicle may travel to a cluster, in kilometres.
    #[arg(long, value_name = "km")]
    #[serde(default)]
    pub(crate) max_detour_km: Option<f64>,
    /// Requests older than this are left out of clustering.
    #[arg(long, value_name = "minutes")]
    #[serde(default)]
    pub(crate) time_window_minutes: Option<f64>,
    /// Reference instant in milliseconds; defaults to the newest request.
    #[arg(long, value_name = "ms")]
    #[serde(default)]
    pub(crate) now_ms: Option<u64>,
    /// Seed for the matcher.
    #[arg(long, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Write the JSON result here instead of standard output.
    #[arg(long, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl MatchArgs {
    pub(crate) fn into_config(self) -> Result<MatchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        MatchConfig::try_from(merged)
    }
}

/// Resolved `match` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MatchConfig {
    pub(crate) scenario: Utf8PathBuf,
    pub(crate) params: SimulationParams,
    pub(crate) seed: u64,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl MatchConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        match fs::path_kind(&self.scenario) {
            Ok(PathKind::File) => Ok(()),
            Ok(PathKind::Missing) => Err(CliError::MissingSourceFile {
                field: ARG_SCENARIO,
                path: self.scenario.clone(),
            }),
            Ok(PathKind::Directory | PathKind::Other) => Err(CliError::SourcePathNotFile {
                field: ARG_SCENARIO,
                path: self.scenario.clone(),
            }),
            Err(source) => Err(CliError::InspectPath {
                field: ARG_SCENARIO,
                path: self.scenario.clone(),
                source,
            }),
        }
    }
}

impl TryFrom<MatchArgs> for MatchConfig {
    type Error = CliError;

    fn try_from(args: MatchArgs) -> Result<Self, Self::Error> {
        let scenario = args.scenario.ok_or(CliError::MissingArgument {
            field: ARG_SCENARIO,
            env: ENV_MATCH_SCENARIO,
        })?;
        let defaults = SimulationParams::default();
        let params = SimulationParams {
            max_detour_km: args.max_detour_km.unwrap_or(defaults.max_detour_km),
            time_window_minutes: args
                .time_window_minutes
                .unwrap_or(defaults.time_window_minutes),
            now_ms: args.now_ms,
            ..defaults
        };
        Ok(Self {
            scenario,
            params,
            seed: args.seed.unwrap_or(DEFAULT_SEED),
            output: args.output,
        })
    }
}

/// Requests and vehicles supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Scenario {
    pub(crate) requests: Vec<RideRequest>,
    pub(crate) vehicles: Vec<Vehicle>,
}

/// On-disk form of a [`Scenario`] before validation.
#[derive(Debug, Deserialize)]
struct ScenarioFile {
    #[serde(default)]
    requests: Vec<RideRequest>,
    #[serde(default)]
    vehicles: Vec<ScenarioVehicle>,
}

/// On-disk vehicle. Free seats default to the full capacity.
#[derive(Debug, Deserialize)]
struct ScenarioVehicle {
    id: u64,
    location: Coordinate,
    capacity: u32,
    #[serde(default)]
    available_seats: Option<u32>,
    #[serde(default)]
    current_route: Vec<Coordinate>,
}

impl ScenarioFile {
    /// Reject duplicate identifiers and unusable vehicles, clamping free
    /// seats into `0..=capacity`.
    fn validated(self, path: &Utf8Path) -> Result<Scenario, CliError> {
        ensure_unique(self.requests.iter().map(|r| r.id), "request", path)?;
        ensure_unique(self.vehicles.iter().map(|v| v.id), "vehicle", path)?;
        let vehicles = self
            .vehicles
            .into_iter()
            .map(|raw| {
                let seats = raw.available_seats.unwrap_or(raw.capacity);
                let mut vehicle =
                    Vehicle::with_available_seats(raw.id, raw.location, raw.capacity, seats)
                        .map_err(|source| CliError::InvalidVehicle {
                            path: path.to_path_buf(),
                            source,
                        })?;
                vehicle.current_route = raw.current_route;
                Ok(vehicle)
            })
            .collect::<Result<Vec<_>, CliError>>()?;
        Ok(Scenario {
            requests: self.requests,
            vehicles,
        })
    }
}

fn ensure_unique(
    ids: impl Iterator<Item = u64>,
    kind: &'static str,
    path: &Utf8Path,
) -> Result<(), CliError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CliError::DuplicateId {
                path: path.to_path_buf(),
                kind,
                id,
            });
        }
    }
    Ok(())
}

/// Load and validate a JSON-encoded [`Scenario`].
pub(crate) fn load_scenario(path: &Utf8Path) -> Result<Scenario, CliError> {
    let file = fs::open_utf8_file(path).map_err(|source| CliError::OpenScenario {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let scenario: ScenarioFile =
        serde_json::from_reader(reader).map_err(|source| CliError::ParseScenario {
            path: path.to_path_buf(),
            source,
        })?;
    scenario.validated(path)
}

pub(crate) fn run_match(args: MatchArgs, stdout: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    run_match_with(&config, stdout)
}

pub(crate) fn run_match_with(config: &MatchConfig, stdout: &mut dyn Write) -> Result<(), CliError> {
    config.validate_sources()?;
    validate_output(config.output.as_deref())?;
    let result = execute_match(config)?;
    emit_result(&result, config.output.as_deref(), stdout)
}

fn execute_match(config: &MatchConfig) -> Result<SimulationResult, CliError> {
    let scenario = load_scenario(&config.scenario)?;
    let pipeline = build_pipeline(config.seed, None);
    Ok(pipeline.run_with_inputs(scenario.requests, scenario.vehicles, &config.params)?)
}
