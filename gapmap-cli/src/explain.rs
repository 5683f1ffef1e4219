//! Explain command implementation for the Gapmap CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use gapmap_core::Category;
use gapmap_scorer::{Competitor, Explainer, TopPost};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::fs::require_existing;
use crate::store::{SqliteStoreOpener, StoreOpener};
use crate::{
    ARG_CATEGORY, ARG_DATABASE, ARG_GRID_ID, ARG_LIMIT, CliError, ENV_EXPLAIN_CATEGORY,
    ENV_EXPLAIN_DATABASE, ENV_EXPLAIN_GRID_ID, write_json,
};

/// Posts and competitors listed when `--limit` is not given.
pub(crate) const DEFAULT_EXPLAIN_LIMIT: usize = 5;

/// CLI arguments for the `explain` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "explain",
    long_about = "List the most engaging posts and the best rated competing \
                 businesses for one grid, with each competitor's distance \
                 from the grid centre.",
    about = "Show the evidence behind a grid's score"
)]
#[ortho_config(prefix = "GAPMAP")]
pub(crate) struct ExplainArgs {
    /// Path to the SQLite grid database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Grid to explain.
    #[arg(long = ARG_GRID_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) grid_id: Option<String>,
    /// Business category of the competitors (Gym or Cafe).
    #[arg(long = ARG_CATEGORY, value_name = "name")]
    #[serde(default)]
    pub(crate) category: Option<String>,
    /// Maximum posts and competitors to list.
    #[arg(long = ARG_LIMIT, value_name = "n")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

impl ExplainArgs {
    pub(crate) fn into_config(self) -> Result<ExplainConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ExplainConfig::try_from(merged)
    }
}

/// Resolved `explain` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExplainConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) grid_id: String,
    pub(crate) category: Category,
    pub(crate) limit: usize,
}

impl TryFrom<ExplainArgs> for ExplainConfig {
    type Error = CliError;

    fn try_from(args: ExplainArgs) -> Result<Self, Self::Error> {
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_EXPLAIN_DATABASE,
        })?;
        let grid_id = args.grid_id.ok_or(CliError::MissingArgument {
            field: ARG_GRID_ID,
            env: ENV_EXPLAIN_GRID_ID,
        })?;
        let category = args
            .category
            .ok_or(CliError::MissingArgument {
                field: ARG_CATEGORY,
                env: ENV_EXPLAIN_CATEGORY,
            })?
            .parse::<Category>()?;
        Ok(Self {
            database,
            grid_id,
            category,
            limit: args.limit.unwrap_or(DEFAULT_EXPLAIN_LIMIT),
        })
    }
}

/// Evidence printed for one grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct GridExplanation {
    pub(crate) grid_id: String,
    pub(crate) category: Category,
    pub(crate) top_posts: Vec<TopPost>,
    pub(crate) competitors: Vec<Competitor>,
}

pub(crate) fn run_explain(args: ExplainArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_explain_with(args, &SqliteStoreOpener, &mut stdout)
}

pub(crate) fn run_explain_with(
    args: ExplainArgs,
    opener: &dyn StoreOpener,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.database, ARG_DATABASE)?;
    let store = opener.open(&config.database)?;
    let explainer = Explainer::new(store.as_ref());
    let explanation = GridExplanation {
        top_posts: explainer.get_top_posts(&config.grid_id, config.category, config.limit),
        competitors: explainer.get_competitors(&config.grid_id, config.category, config.limit),
        grid_id: config.grid_id,
        category: config.category,
    };
    write_json(writer, &explanation)
}
