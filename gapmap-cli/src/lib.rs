//! Command-line interface for the Gapmap opportunity engine.
//!
//! `gapmap score` ranks every grid in a SQLite database for one category;
//! `gapmap explain` lists the posts and competitors behind one grid. Both
//! print pretty JSON and accept values from flags, `GAPMAP_*` environment
//! variables or configuration files.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use serde::Serialize;

mod error;
mod explain;
mod fs;
mod score;
mod store;

pub use error::CliError;

use explain::{ExplainArgs, run_explain};
use score::{ScoreArgs, run_score};

pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_CATEGORY: &str = "category";
pub(crate) const ARG_TOP: &str = "top";
pub(crate) const ARG_SCORING_CONFIG: &str = "scoring-config";
pub(crate) const ARG_GRID_ID: &str = "grid-id";
pub(crate) const ARG_LIMIT: &str = "limit";
pub(crate) const ENV_SCORE_DATABASE: &str = "GAPMAP_CMDS_SCORE_DATABASE";
pub(crate) const ENV_SCORE_CATEGORY: &str = "GAPMAP_CMDS_SCORE_CATEGORY";
pub(crate) const ENV_EXPLAIN_DATABASE: &str = "GAPMAP_CMDS_EXPLAIN_DATABASE";
pub(crate) const ENV_EXPLAIN_GRID_ID: &str = "GAPMAP_CMDS_EXPLAIN_GRID_ID";
pub(crate) const ENV_EXPLAIN_CATEGORY: &str = "GAPMAP_CMDS_EXPLAIN_CATEGORY";

/// Run the Gapmap CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments or configuration are invalid, an input
/// file is missing, the store cannot be read or output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Score(args) => run_score(args),
        Command::Explain(args) => run_explain(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "gapmap",
    about = "Find underserved grid cells for a business category",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank grids by Gap Opportunity Score.
    Score(ScoreArgs),
    /// Show the posts and competitors behind a grid's score.
    Explain(ExplainArgs),
}

fn write_json<T: Serialize + ?Sized>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
