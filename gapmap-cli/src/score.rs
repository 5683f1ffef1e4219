//! Score command implementation for the Gapmap CLI.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use gapmap_core::Category;
use gapmap_scorer::{GapScorer, GridScore, ScoringConfig, rank_by_opportunity, score_category};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::fs::{open_utf8_file, require_existing};
use crate::store::{SqliteStoreOpener, StoreOpener};
use crate::{
    ARG_CATEGORY, ARG_DATABASE, ARG_SCORING_CONFIG, ARG_TOP, CliError, ENV_SCORE_CATEGORY,
    ENV_SCORE_DATABASE, write_json,
};

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "score",
    long_about = "Aggregate every grid in the database for one category, \
                 normalise the counts against the busiest grid and print \
                 the grids ranked by Gap Opportunity Score. Values can come \
                 from CLI flags, configuration files, or environment \
                 variables.",
    about = "Rank grids by opportunity for a category"
)]
#[ortho_config(prefix = "GAPMAP")]
pub(crate) struct ScoreArgs {
    /// Path to the SQLite grid database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Business category to score (Gym or Cafe).
    #[arg(long = ARG_CATEGORY, value_name = "name")]
    #[serde(default)]
    pub(crate) category: Option<String>,
    /// Print only the best `n` grids.
    #[arg(long = ARG_TOP, value_name = "n")]
    #[serde(default)]
    pub(crate) top: Option<usize>,
    /// JSON file overriding scoring weights and thresholds.
    #[arg(long = ARG_SCORING_CONFIG, value_name = "path")]
    #[serde(default)]
    pub(crate) scoring_config: Option<Utf8PathBuf>,
}

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScoreConfig {
    /// Path to the SQLite grid database.
    pub(crate) database: Utf8PathBuf,
    /// Category to score.
    pub(crate) category: Category,
    /// Optional cap on printed rows.
    pub(crate) top: Option<usize>,
    /// Optional scoring override file.
    pub(crate) scoring_config: Option<Utf8PathBuf>,
}

impl ScoreConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.database, ARG_DATABASE)?;
        if let Some(path) = &self.scoring_config {
            require_existing(path, ARG_SCORING_CONFIG)?;
        }
        Ok(())
    }
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_SCORE_DATABASE,
        })?;
        let category = args
            .category
            .ok_or(CliError::MissingArgument {
                field: ARG_CATEGORY,
                env: ENV_SCORE_CATEGORY,
            })?
            .parse::<Category>()?;
        Ok(Self {
            database,
            category,
            top: args.top,
            scoring_config: args.scoring_config,
        })
    }
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_score_with(args, &SqliteStoreOpener, &mut stdout)
}

pub(crate) fn run_score_with(
    args: ScoreArgs,
    opener: &dyn StoreOpener,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let rows = execute_score(args, opener)?;
    write_json(writer, &rows)
}

fn execute_score(args: ScoreArgs, opener: &dyn StoreOpener) -> Result<Vec<GridScore>, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let scoring = match &config.scoring_config {
        Some(path) => load_scoring_config(path)?,
        None => ScoringConfig::default(),
    };
    let scorer = GapScorer::new(scoring)?;
    let store = opener.open(&config.database)?;
    let rows = score_category(store.as_ref(), config.category, &scorer)?;
    let mut ranked = rank_by_opportunity(rows);
    if let Some(top) = config.top {
        ranked.truncate(top);
    }
    Ok(ranked)
}

/// Loads JSON scoring overrides; omitted fields keep their defaults.
pub(crate) fn load_scoring_config(path: &Utf8Path) -> Result<ScoringConfig, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenScoringConfig {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseScoringConfig {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ScoreConfig, CliError> {
    let merged = ScoreArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ScoreConfig::try_from(merged)
}
