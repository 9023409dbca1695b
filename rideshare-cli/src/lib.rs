//! Command-line interface for the ride-share pooling simulation.
//!
//! `rideshare simulate` generates a synthetic city and runs the whole
//! pipeline over it; `rideshare match` runs the same pipeline over requests
//! and vehicles read from a JSON scenario file. Both emit the
//! [`SimulationResult`](rideshare_sim::SimulationResult) as pretty JSON.
#![forbid(unsafe_code)]

use std::io::Write;

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use rideshare_cluster::SpatioTemporalClusterer;
use rideshare_sim::{
    SimulationOrchestrator, SimulationResult, StraightLineRouter, UniformDataAdapter,
    UniformDataAdapterConfig,
};
use rideshare_solver_ga::{GeneticMatcher, GeneticMatcherConfig};

mod error;
mod fs;
mod scenario;
mod simulate;

pub use error::CliError;

use fs::PathKind;
use scenario::MatchArgs;
use simulate::SimulateArgs;

pub(crate) const ARG_SCENARIO: &str = "scenario";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ENV_MATCH_SCENARIO: &str = "RIDESHARE_CMDS_MATCH_SCENARIO";
pub(crate) const DEFAULT_SEED: u64 = 42;

/// Run the rideshare CLI with the current process arguments and environment.
///
/// # Errors
/// Returns a [`CliError`] when arguments or configuration are invalid, when a
/// scenario cannot be read, or when the simulation or its output fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Simulate(args) => simulate::run_simulate(args, &mut stdout),
        Command::Match(args) => scenario::run_match(args, &mut stdout),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "rideshare",
    about = "Cluster ride requests and pool them onto vehicles",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a synthetic city and simulate pooled matching over it.
    Simulate(SimulateArgs),
    /// Simulate pooled matching over requests and vehicles from a file.
    Match(MatchArgs),
}

/// The concrete pipeline both subcommands drive.
pub(crate) type Pipeline = SimulationOrchestrator<
    UniformDataAdapter,
    StraightLineRouter,
    SpatioTemporalClusterer,
    GeneticMatcher,
>;

/// Wire the baseline collaborators, seeding every random source with `seed`.
pub(crate) fn build_pipeline(seed: u64, vehicle_capacity: Option<u32>) -> Pipeline {
    let defaults = UniformDataAdapterConfig::default();
    let data = UniformDataAdapter::new(UniformDataAdapterConfig {
        seed,
        vehicle_capacity: vehicle_capacity.unwrap_or(defaults.vehicle_capacity),
        ..defaults
    });
    let matcher = GeneticMatcher::with_config(GeneticMatcherConfig {
        seed,
        ..GeneticMatcherConfig::default()
    });
    SimulationOrchestrator::new(
        data,
        StraightLineRouter,
        SpatioTemporalClusterer::new(),
        matcher,
    )
}

/// Reject an output path that names an existing directory.
pub(crate) fn validate_output(path: Option<&Utf8Path>) -> Result<(), CliError> {
    let Some(target) = path else {
        return Ok(());
    };
    match fs::path_kind(target) {
        Ok(PathKind::Directory) => Err(CliError::OutputPathIsDirectory {
            path: target.to_path_buf(),
        }),
        Ok(_) => Ok(()),
        Err(source) => Err(CliError::InspectPath {
            field: ARG_OUTPUT,
            path: target.to_path_buf(),
            source,
        }),
    }
}

/// Write `result` to `output` when given, otherwise to `fallback`.
pub(crate) fn emit_result(
    result: &SimulationResult,
    output: Option<&Utf8Path>,
    fallback: &mut dyn Write,
) -> Result<(), CliError> {
    match output {
        Some(path) => {
            let mut file = fs::create_utf8_file(path).map_err(CliError::WriteOutput)?;
            write_result(&mut file, result)
        }
        None => write_result(fallback, result),
    }
}

fn write_result(writer: &mut dyn Write, result: &SimulationResult) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(result).map_err(CliError::SerializeResult)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    writer.flush().map_err(CliError::WriteOutput)
}

#[cfg(test)]
mod tests;
