//! Facade crate for the Gapmap opportunity engine.
//!
//! This crate re-exports the core domain types and the scoring pipeline, and
//! exposes the SQLite grid store behind the `store-sqlite` feature.

#![forbid(unsafe_code)]

pub use gapmap_core::{
    Business, Category, DemandChannel, Grid, GridRawMetrics, GridStore, NormalizationBasis,
    NormalizedFeatures, OpportunityLevel, PostSource, PostType, ScoreResult, SocialPost,
    StoreError, haversine_km,
};

#[cfg(feature = "store-sqlite")]
pub use gapmap_core::{SqliteGridStore, SqliteGridStoreError};

pub use gapmap_scorer::{
    Aggregator, Competitor, Explainer, GapScorer, GridScore, ScoringConfig, ScoringError, TopPost,
    compute_max_values, generate_rationale, normalize_metrics, rank_by_opportunity,
    score_category,
};
