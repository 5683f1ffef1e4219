//! Core domain types for the Gapmap engine.
//!
//! The crate defines the records the opportunity pipeline reads (grids,
//! businesses, social posts), the value types it produces (raw metrics,
//! normalisation basis, normalised features, scores) and the [`GridStore`]
//! trait through which those records are read. A SQLite-backed store is
//! available behind the `store-sqlite` feature.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod category;
mod distance;
mod grid;
mod metrics;
pub mod store;
pub mod test_support;

pub use category::{Category, DemandChannel, ParseCategoryError, PostSource, PostType};
pub use distance::{EARTH_RADIUS_KM, haversine_km};
pub use grid::{Business, Grid, SocialPost};
pub use metrics::{
    GridRawMetrics, NormalizationBasis, NormalizedFeatures, OpportunityLevel, ScoreResult,
};
pub use store::{GridStore, StoreError};

#[cfg(feature = "store-sqlite")]
pub use store::{SqliteGridStore, SqliteGridStoreError};
