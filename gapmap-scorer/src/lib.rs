//! Gap Opportunity Score pipeline.
//!
//! The crate turns store records into ranked opportunity scores in four
//! steps:
//! - the [`Aggregator`] counts competing businesses and classified posts per
//!   grid through a [`GridStore`](gapmap_core::GridStore);
//! - the normaliser ([`compute_max_values`], [`normalize_metrics`]) rescales
//!   those counts against the cross-grid maxima;
//! - the [`GapScorer`] combines features into a GOS, a confidence value and
//!   an [`OpportunityLevel`](gapmap_core::OpportunityLevel) using an explicit
//!   [`ScoringConfig`];
//! - the [`Explainer`] and [`generate_rationale`] describe why a grid scored
//!   as it did.
//!
//! [`score_category`] runs the whole pass for one category.
//!
//! # Examples
//!
//! ```
//! use gapmap_core::{Category, test_support::sample_dataset};
//! use gapmap_scorer::{GapScorer, rank_by_opportunity, score_category};
//!
//! let store = sample_dataset();
//! let rows = score_category(&store, Category::Gym, &GapScorer::default())?;
//! let ranked = rank_by_opportunity(rows);
//! assert_eq!(ranked.first().map(|row| row.score.grid_id.as_str()), Some("grid_a"));
//! # Ok::<(), gapmap_scorer::ScoringError>(())
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod aggregator;
mod config;
mod error;
mod explainer;
mod normalizer;
mod pipeline;
mod scorer;

pub use aggregator::{AggregatedGrids, Aggregator};
pub use config::ScoringConfig;
pub use error::ScoringError;
pub use explainer::{
    Competitor, Explainer, MODERATE_RATIONALE_THRESHOLD, POST_PREVIEW_CHARS,
    STRONG_RATIONALE_THRESHOLD, TopPost, generate_rationale,
};
pub use normalizer::{compute_max_values, normalize_metrics};
pub use pipeline::{GridScore, rank_by_opportunity, score_category};
pub use scorer::GapScorer;

#[cfg(test)]
mod tests;
