//! Batch scoring of every grid in one category.
#![forbid(unsafe_code)]

use std::cmp::Ordering;

use gapmap_core::{Category, GridRawMetrics, GridStore, NormalizedFeatures, ScoreResult};
use serde::Serialize;

use crate::{Aggregator, GapScorer, ScoringError, generate_rationale, normalize_metrics};

/// One scored grid together with the inputs that produced its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridScore {
    /// Category the grid was scored for.
    pub category: Category,
    /// GOS, confidence and opportunity level.
    #[serde(flatten)]
    pub score: ScoreResult,
    /// Raw counts read from the store.
    pub raw: GridRawMetrics,
    /// Counts rescaled against the category basis.
    pub features: NormalizedFeatures,
    /// One-sentence explanation of the score.
    pub rationale: String,
}

/// Aggregate, normalise, score and explain every grid for `category`.
///
/// The basis is computed over the whole grid set before any grid is scored.
/// Rows keep the aggregation order, lexicographic by grid id.
///
/// # Errors
/// Propagates [`ScoringError`] from aggregation; any store failure aborts
/// the whole pass.
///
/// # Examples
/// ```
/// use gapmap_core::{Category, test_support::sample_dataset};
/// use gapmap_scorer::{GapScorer, score_category};
///
/// let rows = score_category(&sample_dataset(), Category::Gym, &GapScorer::default())?;
/// assert_eq!(rows.len(), 3);
/// # Ok::<(), gapmap_scorer::ScoringError>(())
/// ```
pub fn score_category<S: GridStore>(
    store: S,
    category: Category,
    scorer: &GapScorer,
) -> Result<Vec<GridScore>, ScoringError> {
    let (metrics, basis) = Aggregator::new(store)
        .aggregate_all_grids(category)?
        .into_parts();
    let rows: Vec<GridScore> = metrics
        .into_iter()
        .map(|raw| {
            let features = normalize_metrics(&raw, &basis);
            let score = scorer.score_grid(&raw.grid_id, &raw, &features);
            let rationale = generate_rationale(&raw, score.gos);
            GridScore {
                category,
                score,
                raw,
                features,
                rationale,
            }
        })
        .collect();
    log::info!("scored {} grids for {category}", rows.len());
    Ok(rows)
}

/// Order rows from best to worst opportunity.
///
/// Sorts by GOS descending, then confidence descending, then grid id.
#[must_use]
pub fn rank_by_opportunity(mut rows: Vec<GridScore>) -> Vec<GridScore> {
    rows.sort_by(opportunity_order);
    rows
}

fn opportunity_order(left: &GridScore, right: &GridScore) -> Ordering {
    right
        .score
        .gos
        .total_cmp(&left.score.gos)
        .then_with(|| right.score.confidence.total_cmp(&left.score.confidence))
        .then_with(|| left.score.grid_id.cmp(&right.score.grid_id))
}
