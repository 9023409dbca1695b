//! Error types emitted by the rideshare CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use rideshare_core::VehicleError;
use rideshare_sim::SimulationError;
use thiserror::Error;

/// Errors emitted by the rideshare CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Name of the missing option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Option naming the path.
        field: &'static str,
        /// Path that was not found.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Option naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectPath {
        /// Option naming the path.
        field: &'static str,
        /// Path being inspected.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The output path names an existing directory.
    #[error("output path {path:?} is a directory")]
    OutputPathIsDirectory {
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// Opening the scenario file failed.
    #[error("failed to open scenario at {path:?}: {source}")]
    OpenScenario {
        /// Scenario path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Scenario JSON could not be decoded.
    #[error("failed to parse scenario JSON at {path:?}: {source}")]
    ParseScenario {
        /// Scenario path.
        path: Utf8PathBuf,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// A scenario vehicle is unusable.
    #[error("scenario {path:?} contains an invalid vehicle: {source}")]
    InvalidVehicle {
        /// Scenario path.
        path: Utf8PathBuf,
        /// Validation failure.
        #[source]
        source: VehicleError,
    },
    /// Two scenario entries share an identifier.
    #[error("scenario {path:?} lists {kind} {id} more than once")]
    DuplicateId {
        /// Scenario path.
        path: Utf8PathBuf,
        /// Either `request` or `vehicle`.
        kind: &'static str,
        /// Repeated identifier.
        id: u64,
    },
    /// The simulation pipeline failed.
    #[error("simulation failed: {0}")]
    Simulation(#[from] SimulationError),
    /// Serializing the simulation result failed.
    #[error("failed to serialize simulation result: {0}")]
    SerializeResult(#[source] serde_json::Error),
    /// Writing the simulation result failed.
    #[error("failed to write simulation result: {0}")]
    WriteOutput(#[source] std::io::Error),
}
