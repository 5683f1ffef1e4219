//! Error types emitted by the Gapmap CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use gapmap_core::ParseCategoryError;
use gapmap_scorer::ScoringError;
use thiserror::Error;

/// Errors emitted by the Gapmap CLI.
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
        /// Flag name without leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// The category name is not one the engine scores.
    #[error(transparent)]
    InvalidCategory(#[from] ParseCategoryError),
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        /// Cargo feature that would enable the action.
        feature: &'static str,
        /// Action that was attempted.
        action: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the path.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the path.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the path.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the scoring override file failed.
    #[error("failed to open scoring configuration at {path:?}: {source}")]
    OpenScoringConfig {
        /// Path of the override file.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The scoring override file is not valid JSON.
    #[error("failed to parse scoring configuration JSON at {path:?}: {source}")]
    ParseScoringConfig {
        /// Path of the override file.
        path: Utf8PathBuf,
        /// Decoding error.
        #[source]
        source: serde_json::Error,
    },
    /// Opening the SQLite grid store failed.
    #[cfg(feature = "store-sqlite")]
    #[error(transparent)]
    OpenStore(#[from] gapmap_core::SqliteGridStoreError),
    /// Aggregation, scoring or configuration validation failed.
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
