//! Value types flowing through the aggregation and scoring pipeline.
//!
//! Raw counts become normalised features through a shared
//! [`NormalizationBasis`]; features and counts together yield a
//! [`ScoreResult`]. None of these types are mutated once built.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Raw per-grid counts for one category.
///
/// Missing fields deserialise as zero so partially populated payloads never
/// fail to load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridRawMetrics {
    /// Grid the counts belong to.
    pub grid_id: String,
    /// Competing businesses located in the grid.
    pub business_count: u32,
    /// Posts classified as mentions.
    pub instagram_volume: u32,
    /// Posts classified as demand or complaint.
    pub reddit_mentions: u32,
}

impl GridRawMetrics {
    /// Construct metrics for a grid.
    #[must_use]
    pub fn new(
        grid_id: impl Into<String>,
        business_count: u32,
        instagram_volume: u32,
        reddit_mentions: u32,
    ) -> Self {
        Self {
            grid_id: grid_id.into(),
            business_count,
            instagram_volume,
            reddit_mentions,
        }
    }

    /// Metrics for a grid with no matching records.
    #[must_use]
    pub fn empty(grid_id: impl Into<String>) -> Self {
        Self::new(grid_id, 0, 0, 0)
    }
}

/// Per-category maxima used to rescale raw counts.
///
/// Every field is at least `1.0`, so dividing by it is always safe.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct NormalizationBasis {
    max_business_count: f64,
    max_instagram_volume: f64,
    max_reddit_mentions: f64,
}

impl NormalizationBasis {
    /// Lowest value any maximum may take.
    pub const FLOOR: f64 = 1.0;

    /// Build a basis from observed maxima, flooring each at [`Self::FLOOR`].
    ///
    /// # Examples
    /// ```
    /// use gapmap_core::NormalizationBasis;
    ///
    /// let basis = NormalizationBasis::from_maxima(4, 0, 50);
    /// assert_eq!(basis.max_business_count(), 4.0);
    /// assert_eq!(basis.max_instagram_volume(), 1.0);
    /// ```
    #[must_use]
    pub fn from_maxima(business: u32, instagram: u32, reddit: u32) -> Self {
        Self {
            max_business_count: f64::from(business).max(Self::FLOOR),
            max_instagram_volume: f64::from(instagram).max(Self::FLOOR),
            max_reddit_mentions: f64::from(reddit).max(Self::FLOOR),
        }
    }

    /// Largest business count across the grid set.
    #[must_use]
    pub const fn max_business_count(&self) -> f64 {
        self.max_business_count
    }

    /// Largest Instagram volume across the grid set.
    #[must_use]
    pub const fn max_instagram_volume(&self) -> f64 {
        self.max_instagram_volume
    }

    /// Largest Reddit mention count across the grid set.
    #[must_use]
    pub const fn max_reddit_mentions(&self) -> f64 {
        self.max_reddit_mentions
    }
}

impl Default for NormalizationBasis {
    fn default() -> Self {
        Self::from_maxima(0, 0, 0)
    }
}

/// Raw counts rescaled into `0.0..=1.0`.
///
/// Missing fields deserialise as `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NormalizedFeatures {
    /// Business count relative to the busiest grid.
    pub supply_norm: f64,
    /// Instagram volume relative to the loudest grid.
    pub demand_instagram_norm: f64,
    /// Reddit mentions relative to the loudest grid.
    pub demand_reddit_norm: f64,
}

/// Opportunity bucket derived from the GOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OpportunityLevel {
    /// Strong gap between supply and demand.
    High,
    /// Some unmet demand.
    Medium,
    /// Saturated or quiet grid.
    Low,
}

impl OpportunityLevel {
    /// Return the lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for OpportunityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score, confidence and label for one grid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoreResult {
    /// Scored grid.
    pub grid_id: String,
    /// Gap Opportunity Score in `0.0..=1.0`, rounded to three decimals.
    pub gos: f64,
    /// Data-volume confidence in `0.0..=1.0`, rounded to three decimals.
    pub confidence: f64,
    /// Bucket derived from `gos`.
    pub opportunity_level: OpportunityLevel,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn basis_floors_zero_maxima() {
        let basis = NormalizationBasis::from_maxima(0, 0, 0);
        assert_eq!(basis, NormalizationBasis::default());
        assert_eq!(basis.max_business_count(), 1.0);
        assert_eq!(basis.max_instagram_volume(), 1.0);
        assert_eq!(basis.max_reddit_mentions(), 1.0);
    }

    #[rstest]
    fn basis_keeps_positive_maxima() {
        let basis = NormalizationBasis::from_maxima(4, 38, 50);
        assert_eq!(basis.max_business_count(), 4.0);
        assert_eq!(basis.max_instagram_volume(), 38.0);
        assert_eq!(basis.max_reddit_mentions(), 50.0);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn partial_payloads_default_to_zero() {
        let metrics: GridRawMetrics =
            serde_json::from_str(r#"{"grid_id":"g1"}"#).expect("decode metrics");
        assert_eq!(metrics, GridRawMetrics::empty("g1"));

        let features: NormalizedFeatures = serde_json::from_str("{}").expect("decode features");
        assert_eq!(features, NormalizedFeatures::default());
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn opportunity_level_serialises_lowercase() {
        let json = serde_json::to_string(&OpportunityLevel::Medium).expect("encode level");
        assert_eq!(json, "\"medium\"");
    }
}
