//! Error types raised while aggregating and scoring grids.
#![forbid(unsafe_code)]

use gapmap_core::{Category, StoreError};
use thiserror::Error;

/// Errors raised by the aggregation pass or scorer configuration.
///
/// Scoring itself never fails; only store reads and invalid configuration
/// surface here.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// Listing the grid identifiers failed.
    #[error("failed to list grids")]
    ListGrids {
        /// Source error from the store.
        #[source]
        source: StoreError,
    },
    /// Reading the counts for one grid failed.
    #[error("failed to aggregate {category} metrics for grid {grid_id}")]
    GridMetrics {
        /// Grid being aggregated.
        grid_id: String,
        /// Category being aggregated.
        category: Category,
        /// Source error from the store.
        #[source]
        source: StoreError,
    },
    /// A scoring configuration value was unusable.
    #[error("invalid scoring configuration: `{field}` {problem}")]
    InvalidConfig {
        /// Offending configuration field.
        field: &'static str,
        /// What is wrong with it.
        problem: &'static str,
    },
}
