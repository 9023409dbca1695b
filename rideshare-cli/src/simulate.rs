//! `simulate` command: synthetic demand and supply over a fixed city box.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rideshare_sim::{SimulationParams, SimulationResult};
use serde::{Deserialize, Serialize};

use crate::{CliError, DEFAULT_SEED, build_pipeline, emit_result, validate_output};

/// CLI arguments for the `simulate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Generate passengers and vehicles inside the default city \
                 bounds, cluster the requests, pool them onto vehicles with \
                 the genetic matcher and report the routed result. Every \
                 option can also come from a configuration file or a \
                 RIDESHARE_CMDS_SIMULATE_* environment variable.",
    about = "Simulate pooled matching over a synthetic city"
)]
#[ortho_config(prefix = "RIDESHARE")]
pub(crate) struct SimulateArgs {
    /// Ride requests to generate.
    #[arg(long, value_name = "count")]
    #[serde(default)]
    pub(crate) passengers: Option<usize>,
    /// Vehicles to generate.
    #[arg(long, value_name = "count")]
    #[serde(default)]
    pub(crate) vehicles: Option<usize>,
    /// Seats per generated vehicle.
    #[arg(long, value_name = "seats")]
    #[serde(default)]
    pub(crate) vehicle_capacity: Option<u32>,
    /// Furthest a vehicle may travel to a cluster, in kilometres.
    #[arg(long, value_name = "km")]
    #[serde(default)]
    pub(crate) max_detour_km: Option<f64>,
    /// Requests older than this are left out of clustering.
    #[arg(long, value_name = "minutes")]
    #[serde(default)]
    pub(crate) time_window_minutes: Option<f64>,
    /// Seed shared by the data generator and the matcher.
    #[arg(long, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Write the JSON result here instead of standard output.
    #[arg(long, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl SimulateArgs {
    pub(crate) fn into_config(self) -> Result<SimulateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(SimulateConfig::from(merged))
    }
}

/// Resolved `simulate` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SimulateConfig {
    pub(crate) params: SimulationParams,
    pub(crate) vehicle_capacity: Option<u32>,
    pub(crate) seed: u64,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl From<SimulateArgs> for SimulateConfig {
    fn from(args: SimulateArgs) -> Self {
        let defaults = SimulationParams::default();
        let params = SimulationParams {
            passenger_count: args.passengers.unwrap_or(defaults.passenger_count),
            vehicle_count: args.vehicles.unwrap_or(defaults.vehicle_count),
            max_detour_km: args.max_detour_km.unwrap_or(defaults.max_detour_km),
            time_window_minutes: args
                .time_window_minutes
                .unwrap_or(defaults.time_window_minutes),
            ..defaults
        };
        Self {
            params,
            vehicle_capacity: args.vehicle_capacity,
            seed: args.seed.unwrap_or(DEFAULT_SEED),
            output: args.output,
        }
    }
}

pub(crate) fn run_simulate(args: SimulateArgs, stdout: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    run_simulate_with(&config, stdout)
}

pub(crate) fn run_simulate_with(
    config: &SimulateConfig,
    stdout: &mut dyn Write,
) -> Result<(), CliError> {
    validate_output(config.output.as_deref())?;
    let result = execute_simulate(config)?;
    emit_result(&result, config.output.as_deref(), stdout)
}

fn execute_simulate(config: &SimulateConfig) -> Result<SimulationResult, CliError> {
    let pipeline = build_pipeline(config.seed, config.vehicle_capacity);
    Ok(pipeline.run(&config.params)?)
}
